use anyhow::Result;
use log::info;

use crate::config::Config;

/// Update a setting and persist the configuration
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `name` - Setting name
/// * `value` - New value; an empty string clears optional settings
///
/// # Returns
/// * `Ok(())` - Setting saved
/// * `Err(anyhow::Error)` - Unknown setting, invalid value or save failure
pub async fn set_command(mut config: Config, name: String, value: String) -> Result<()> {
    info!("Setting {} = {}", name, value);

    config.set_setting(&name, &value)?;
    config.save()?;

    println!("Set {} to {}", name, config.get_setting(&name)?);
    Ok(())
}
