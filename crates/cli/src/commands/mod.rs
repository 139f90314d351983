pub mod chat;
pub mod doctor;
pub mod entries;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use metodo_config::AppConfig;
use metodo_library::EntryRepository;
use metodo_notion::NotionClient;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load_with(path).map_err(|e| format!("Failed to load config: {e}"))?)
}

/// A repository over the configured database; needs only Notion credentials.
pub fn repository(config: &AppConfig) -> Result<EntryRepository, Box<dyn std::error::Error>> {
    let database_id = config
        .notion
        .database_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or("NOTION_DATABASE_ID is not set")?;
    let client = NotionClient::from_config(&config.notion)?;
    Ok(EntryRepository::new(Arc::new(client), database_id))
}
