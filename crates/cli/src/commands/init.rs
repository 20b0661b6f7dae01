//! `pipewright init` — write the default configuration file.

use pipewright_config::AppConfig;

pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!("Config file already exists: {}", config_path.display());
        println!("Run with --force to overwrite it.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("Wrote {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set OPENAI_API_KEY (or GEMINI_API_KEY with provider = \"gemini\")");
    println!("  2. Run `pipewright chat`");
    Ok(())
}
