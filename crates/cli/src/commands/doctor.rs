//! `metodo doctor`: Diagnose configuration and connectivity.

use std::path::Path;

use metodo_config::AppConfig;

use super::{CommandResult, repository};

pub async fn run(config_path: Option<&Path>) -> CommandResult {
    println!("Metodo Doctor");
    println!("=============\n");

    let mut issues = 0;

    // Check config
    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(&default_path);
    if path.exists() {
        println!("  ✅ Config file found at {}", path.display());
    } else {
        println!("  ⚠️  No config file at {}, using defaults and environment", path.display());
    }

    let config = match AppConfig::load_with(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return Ok(());
        }
    };

    // Check credentials
    let missing = config.missing_credentials();
    if missing.is_empty() {
        println!("  ✅ Credentials configured");
    } else {
        for name in &missing {
            println!("  ❌ {name} is not set");
        }
        issues += missing.len();
    }

    // Check Notion
    match repository(&config) {
        Ok(repo) => match repo.list(None, 1).await {
            Ok(_) => println!("  ✅ Notion database reachable"),
            Err(e) => {
                println!("  ❌ Notion query failed: {e}");
                issues += 1;
            }
        },
        Err(_) => println!("  ⏭️  Skipping Notion check"),
    }

    // Check LLM provider
    match metodo_providers::build_from_config(&config.llm) {
        Ok(provider) => match provider.health_check().await {
            Ok(true) => println!("  ✅ {} reachable (model {})", provider.name(), config.llm.model),
            Ok(false) => {
                println!("  ❌ {} rejected the API key", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ {} unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        Err(e) => println!("  ⏭️  Skipping LLM check: {e}"),
    }

    // Check frontend
    if config.gateway.frontend_dir.join("index.html").is_file() {
        println!("  ✅ Frontend found in {}", config.gateway.frontend_dir.display());
    } else {
        println!(
            "  ⚠️  No frontend in {}, /app will not be served",
            config.gateway.frontend_dir.display()
        );
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
