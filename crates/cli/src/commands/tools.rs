//! `pipewright tools` — show what the model is offered.

use pipewright_config::AppConfig;
use std::path::PathBuf;

pub fn run(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let dir = dir.unwrap_or(config.tools.working_dir);
    let registry = pipewright_tools::shell_toolbox(&dir);

    println!("Tools operating in {}:\n", dir.display());
    for tool in registry.iter() {
        let consent = if tool.requires_consent() { "asks first" } else { "runs freely" };
        println!("{}\n- Consent: {consent}\n", tool.specification());
    }
    Ok(())
}
