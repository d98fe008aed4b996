use anyhow::Result;
use log::info;

use crate::config::Config;

/// Print the value of a single setting
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `name` - Setting name (e.g. `retry.max_attempts`)
pub async fn get_command(config: &Config, name: String) -> Result<()> {
    info!("Getting setting: {}", name);

    let value = config.get_setting(&name)?;
    println!("{}", value);

    Ok(())
}
