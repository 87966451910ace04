//! Management commands: config

use anyhow::Result;
use std::path::PathBuf;
use watchdog_config::GlobalConfig;

/// Render a config as TOML with the registry password masked
pub fn render_config(config: &GlobalConfig) -> Result<String> {
    let mut shown = config.clone();
    if shown.docker.password.is_some() {
        shown.docker.password = Some("<redacted>".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

/// Show the global configuration, optionally writing defaults first
pub async fn config(init: bool) -> Result<()> {
    let config_path = GlobalConfig::config_path()?;
    config_at(&config_path, init)
}

/// Show (and with `init`, create) the configuration stored at `path`
pub fn config_at(path: &PathBuf, init: bool) -> Result<()> {
    if init && !path.exists() {
        GlobalConfig::default().save_to(path)?;
        println!("Created default config at {:?}", path);
    }

    if path.exists() {
        let config = GlobalConfig::load_from(path)?;
        println!("# Config file: {:?}\n", path);
        println!("{}", render_config(&config)?);
    } else {
        println!("# Config file: {:?} (not created yet)\n", path);
        println!("# Default configuration:");
        println!("{}", render_config(&GlobalConfig::default())?);
        println!("\n# Run 'watchdog config --init' to create the config file.");
    }

    Ok(())
}
