//! RunCoach CLI: the main entry point.
//!
//! Commands:
//! - `serve`  : Start the HTTP API used by the web frontend
//! - `chat`   : Interactive chat or single-message mode
//! - `ingest` : Build (or rebuild) the knowledge index
//! - `search` : Query the knowledge base directly
//! - `doctor` : Diagnose configuration and knowledge base health

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "runcoach",
    about = "RunCoach — AI running coach with a searchable knowledge base",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.runcoach/config.toml
    #[arg(short, long, global = true, env = "RUNCOACH_CONFIG")]
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

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with the coach
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Build the knowledge index from the documents directory
    Ingest {
        /// Rebuild the index from scratch, replacing the existing one
        #[arg(short, long)]
        force: bool,
    },

    /// Search the knowledge base without asking the model
    Search {
        /// What to look for
        query: String,

        /// Number of chunks to return
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Diagnose configuration and knowledge base health
    Doctor,
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
        Commands::Serve { port, host } => commands::serve::run(config_path, port, host).await?,
        Commands::Chat { message } => commands::chat::run(config_path, message).await?,
        Commands::Ingest { force } => commands::ingest::run(config_path, force).await?,
        Commands::Search { query, k } => commands::search::run(config_path, &query, k).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["runcoach", "serve", "--port", "8000", "-v", "--config", "/tmp/rc.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rc.toml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(8000), host: None }));
    }

    #[test]
    fn parses_search_and_ingest() {
        let cli = Cli::try_parse_from(["runcoach", "search", "long run pace", "-k", "5"]).unwrap();
        match cli.command {
            Commands::Search { query, k } => {
                assert_eq!(query, "long run pace");
                assert_eq!(k, Some(5));
            }
            _ => panic!("expected search"),
        }

        let cli = Cli::try_parse_from(["runcoach", "ingest", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Ingest { force: true }));
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["runcoach", "search"]).is_err());
    }
}
