//! `metodo chat`: one message to the assistant, reply on stdout.

use std::path::Path;

use super::{CommandResult, load_config};

pub async fn run(config_path: Option<&Path>, message: &str, include_library: bool) -> CommandResult {
    let config = load_config(config_path)?;
    let state = metodo_gateway::build_state(&config)?;

    let reply = state.assistant.chat(message, include_library).await?;
    println!("{reply}");
    Ok(())
}
