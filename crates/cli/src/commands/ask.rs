//! `pipewright ask` — answer a single message.

use pipewright_config::AppConfig;

use super::{SessionArgs, Terminal, build_session};

pub async fn run(message: String, args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let mut session = build_session(&config, &args, Terminal::new()).await?;

    eprint!("  Thinking...");
    let outcome = session.turn(&message).await?;
    eprint!("\r              \r");

    if let Some(tool) = &outcome.tool {
        eprintln!("  [tool] {}({})", tool.tool_name, tool.input);
    }
    println!("{}", outcome.answer);
    Ok(())
}
