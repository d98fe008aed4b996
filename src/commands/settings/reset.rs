use anyhow::Result;
use log::info;

use crate::config::Config;
use crate::ui::prompts::prompt_confirmation;

/// Reset a setting to its default value
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `name` - Setting name
pub async fn reset_command(mut config: Config, name: String) -> Result<()> {
    info!("Resetting setting: {}", name);

    config.reset_setting(&name)?;
    config.save()?;

    println!("Reset {} to {}", name, config.get_setting(&name)?);
    Ok(())
}

/// Reset all settings to default values
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `force` - Skip confirmation prompt
///
/// # Returns
/// * `Ok(())` - Settings reset, or the user cancelled
/// * `Err(anyhow::Error)` - Configuration error
pub async fn reset_all_command(mut config: Config, force: bool) -> Result<()> {
    info!("Resetting all settings to defaults");

    if !force && !prompt_confirmation("Reset all settings to their default values?", false)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    config.reset_all();
    config.save()?;

    println!("All settings have been reset to default values.");
    Ok(())
}
