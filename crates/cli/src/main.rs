//! Metodo CLI: the main entry point.
//!
//! Commands:
//! - `serve`  : Start the HTTP API server
//! - `doctor` : Diagnose configuration and connectivity
//! - `list`   : List entries in the knowledge base
//! - `show`   : Print one entry with its content
//! - `search` : Search entries by text
//! - `chat`   : Send one message to the assistant

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "metodo",
    about = "Metodo: joke-analysis knowledge base with a writing assistant",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a config file (default: ~/.metodo/config.toml)
    #[arg(short, long, global = true, env = "METODO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and connectivity
    Doctor,

    /// List entries
    List {
        /// Only entries of this type (e.g. Nota, Análisis)
        #[arg(short, long)]
        tipo: Option<String>,

        /// Maximum number of entries (1-100)
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },

    /// Show one entry with its content
    Show {
        /// Entry id
        id: String,
    },

    /// Search entries by text
    Search {
        /// Text to look for
        text: String,
    },

    /// Send a single message to the assistant
    Chat {
        /// The message
        message: String,

        /// Do not include library context
        #[arg(long)]
        no_library: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::List { tipo, limit } => {
            commands::entries::list(config_path, tipo.as_deref(), limit).await?
        }
        Commands::Show { id } => commands::entries::show(config_path, &id).await?,
        Commands::Search { text } => commands::entries::search(config_path, &text).await?,
        Commands::Chat {
            message,
            no_library,
        } => commands::chat::run(config_path, &message, !no_library).await?,
    }

    Ok(())
}
