//! Subcommand implementations and the session wiring they share.

pub mod ask;
pub mod chat;
pub mod init;
pub mod tools;

use async_trait::async_trait;
use clap::Args;
use pipewright_agent::{AutoApprove, ConsentGate, Session};
use pipewright_config::AppConfig;
use pipewright_core::knowledge::RetrievalPolicy;
use pipewright_core::tool::Tool;
use pipewright_knowledge::{EmbeddingVectorStore, split_paragraphs};
use pipewright_providers::build_from_config;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;

/// Options shared by `chat` and `ask`.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Text file to load as knowledge (repeatable; paragraphs become fragments)
    #[arg(short, long = "knowledge", value_name = "FILE")]
    pub knowledge: Vec<PathBuf>,

    /// Do not offer tools to the model
    #[arg(long)]
    pub no_tools: bool,
}

/// Line-oriented access to stdin, shared by the chat loop and consent prompts.
pub struct Terminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Terminal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        })
    }

    /// The next line, or `None` at end of input.
    pub async fn read_line(&self) -> std::io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

/// Asks on the terminal before running a tool that modifies files.
pub struct TerminalConsent {
    terminal: Arc<Terminal>,
}

#[async_trait]
impl ConsentGate for TerminalConsent {
    async fn approve(&self, tool: &dyn Tool, input: &str) -> bool {
        eprint!("  Allow {}({input})? [y/N] ", tool.name());
        let _ = std::io::stderr().flush();

        match self.terminal.read_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Build a session from configuration plus command-line options.
pub async fn build_session(
    config: &AppConfig,
    args: &SessionArgs,
    terminal: Arc<Terminal>,
) -> Result<Session, Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY      = 'sk-...'   (provider = \"openai\")");
        eprintln!("    GEMINI_API_KEY      = '...'      (provider = \"gemini\")");
        eprintln!("    PIPEWRIGHT_API_KEY  = '...'      (any provider)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let backend = build_from_config(config)?;
    let mut session = Session::new(backend.language_model.clone());

    if config.tools.enabled && !args.no_tools {
        session = session.with_tools(pipewright_tools::shell_toolbox(&config.tools.working_dir));
        session = if config.tools.auto_approve {
            session.with_consent(Arc::new(AutoApprove))
        } else {
            session.with_consent(Arc::new(TerminalConsent { terminal }))
        };
    }

    let files: Vec<&PathBuf> = config.knowledge.files.iter().chain(&args.knowledge).collect();
    if !files.is_empty() {
        let policy = if config.knowledge.avoid_repeats {
            RetrievalPolicy::AvoidRepeats
        } else {
            RetrievalPolicy::AllowRepeats
        };
        let store = EmbeddingVectorStore::new(backend.embedder.clone()).with_policy(policy);
        session = session.with_knowledge(Box::new(store), config.knowledge.min_similarity);

        for path in files {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("Failed to read knowledge file {}: {e}", path.display()))?;
            let fragments = split_paragraphs(&text);
            info!(file = %path.display(), fragments = fragments.len(), "Loading knowledge");
            session.learn(&fragments).await?;
        }
    }

    Ok(session)
}
