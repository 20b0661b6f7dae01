//! Pipewright CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive conversation with knowledge and tools
//! - `ask`    — Answer a single message and exit
//! - `tools`  — Show the tools offered to the model
//! - `init`   — Write the default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "pipewright",
    about = "Pipewright — composable LLM pipelines with knowledge and tools",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively
    Chat {
        #[command(flatten)]
        session: commands::SessionArgs,
    },

    /// Answer one message and exit
    Ask {
        /// The message to send
        #[arg(short, long)]
        message: String,

        #[command(flatten)]
        session: commands::SessionArgs,
    },

    /// Print the specification of every tool
    Tools {
        /// Directory the tools would operate in (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
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
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { session } => commands::chat::run(session).await?,
        Commands::Ask { message, session } => commands::ask::run(message, session).await?,
        Commands::Tools { dir } => commands::tools::run(dir)?,
        Commands::Init { force } => commands::init::run(force)?,
    }

    Ok(())
}
