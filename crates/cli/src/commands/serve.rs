//! `metodo serve`: Start the HTTP API server.

use std::path::Path;

use tracing::{info, warn};

use super::{CommandResult, load_config};

pub async fn run(config_path: Option<&Path>, port_override: Option<u16>) -> CommandResult {
    let mut config = load_config(config_path)?;

    if let Some(port) = port_override {
        info!(port, "Port overridden from the command line");
        config.gateway.port = port;
    }

    println!("Metodo API");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {} via {}", config.llm.model, config.llm.provider);
    println!("   Frontend:  {}", config.gateway.frontend_dir.display());

    if let Err(e) = metodo_gateway::start(config).await {
        warn!(error = %e, "Gateway stopped");
        return Err(e);
    }

    Ok(())
}
