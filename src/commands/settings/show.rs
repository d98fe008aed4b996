use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::{Config, SETTING_KEYS};

/// Print every setting with its current value
pub async fn show_command(config: &Config) -> Result<()> {
    info!("Showing settings");

    match config.path() {
        Some(path) if path.exists() => println!("{} {}", "Config file:".bold(), path.display()),
        Some(path) => println!("{} {} (not saved yet)", "Config file:".bold(), path.display()),
        None => println!("{} (defaults)", "Config file:".bold()),
    }
    println!();

    let width = SETTING_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in SETTING_KEYS {
        let value = config.get_setting(key)?;
        let value = if value.is_empty() {
            "(not set)".dimmed().to_string()
        } else {
            value
        };
        println!("  {}  {}", format!("{:<width$}", key, width = width).cyan(), value);
    }

    Ok(())
}
