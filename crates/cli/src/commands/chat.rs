//! `pipewright chat` — interactive conversation.

use pipewright_config::AppConfig;
use std::io::Write;

use super::{SessionArgs, Terminal, build_session};

const EXIT_COMMANDS: [&str; 5] = ["exit", "quit", "/exit", "/quit", ":q"];

pub async fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let terminal = Terminal::new();
    let mut session = build_session(&config, &args, terminal.clone()).await?;

    let tools = if config.tools.enabled && !args.no_tools {
        format!("shell tools in {}", config.tools.working_dir.display())
    } else {
        "disabled".to_string()
    };

    println!();
    println!("  Pipewright — Interactive Mode");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model.as_deref().unwrap_or("(provider default)"));
    println!("  Tools:     {tools}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = terminal.read_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&line) {
            break;
        }

        eprint!("  ...");
        match session.turn(line).await {
            Ok(outcome) => {
                eprint!("\r     \r");
                if let Some(text) = &outcome.knowledge {
                    eprintln!("  [knowledge] {}", first_line(text));
                }
                if let Some(tool) = &outcome.tool {
                    eprintln!("  [tool] {}({})", tool.tool_name, tool.input);
                }
                println!();
                for line in outcome.answer.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
