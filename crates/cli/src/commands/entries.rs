//! `metodo list`, `metodo show`, `metodo search`: read the knowledge base.

use std::path::Path;

use metodo_core::entry::Entry;

use super::{CommandResult, load_config, repository};

pub async fn list(config_path: Option<&Path>, tipo: Option<&str>, limit: u32) -> CommandResult {
    let config = load_config(config_path)?;
    let entries = repository(&config)?.list(tipo, limit).await?;

    print_entries(&entries);
    println!("\n{} entr{}", entries.len(), plural(entries.len()));
    Ok(())
}

pub async fn show(config_path: Option<&Path>, id: &str) -> CommandResult {
    let config = load_config(config_path)?;
    let entry = repository(&config)?.get(id).await?;

    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

pub async fn search(config_path: Option<&Path>, text: &str) -> CommandResult {
    if text.is_empty() {
        return Err("search text must not be empty".into());
    }
    let config = load_config(config_path)?;
    let results = repository(&config)?.search(text).await?;

    print_entries(&results);
    println!("\n{} match{}", results.len(), if results.len() == 1 { "" } else { "es" });
    Ok(())
}

fn print_entries(entries: &[Entry]) {
    for entry in entries {
        println!("{}", format_row(entry));
    }
}

fn format_row(entry: &Entry) -> String {
    let tipo = entry.tipo.as_deref().unwrap_or("-");
    let mut row = format!("{}  {:<12}  {}", entry.id, tipo, entry.titulo);
    if !entry.tags.is_empty() {
        row.push_str(&format!("  [{}]", entry.tags.join(", ")));
    }
    row
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_shows_type_title_and_tags() {
        let entry = Entry {
            id: "p1".into(),
            titulo: "EJEMPLO uno".into(),
            tipo: Some("Análisis".into()),
            tags: vec!["ruptura".into(), "inversion".into()],
            fecha: None,
            contenido: None,
            url: String::new(),
            created_time: String::new(),
            last_edited_time: String::new(),
        };
        assert_eq!(
            format_row(&entry),
            "p1  Análisis      EJEMPLO uno  [ruptura, inversion]"
        );
    }

    #[test]
    fn row_without_type_uses_dash() {
        let entry = Entry {
            id: "p2".into(),
            titulo: "Nota".into(),
            tipo: None,
            tags: vec![],
            fecha: None,
            contenido: None,
            url: String::new(),
            created_time: String::new(),
            last_edited_time: String::new(),
        };
        assert_eq!(format_row(&entry), "p2  -             Nota");
    }
}
