use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::config::Config;
use crate::store::{GroupingOutcome, ObjectiveStore};
use crate::ui::with_spinner;

/// List every area with its functional groupings
pub async fn list_command(config: &Config) -> Result<()> {
    let store = ObjectiveStore::from_config(config)?;
    let catalog = with_spinner("Loading areas", store.load_catalog()).await?;

    if catalog.is_empty() {
        println!("No areas available. Check the '{}' worksheet.", store.options().catalog_sheet);
        return Ok(());
    }

    for area in catalog.areas() {
        println!("{}", area.bold());
        for grouping in catalog.groupings_for(&area) {
            println!("  • {}", grouping);
        }
    }

    Ok(())
}

/// Register a functional grouping under an area
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `area` - Area name, stored as given (trimmed)
/// * `grouping` - New grouping name
pub async fn add_command(config: &Config, area: String, grouping: String) -> Result<()> {
    info!("Adding grouping '{}' under '{}'", grouping, area);

    let store = ObjectiveStore::from_config(config)?;
    let outcome = with_spinner("Saving grouping", store.add_grouping(&area, &grouping)).await?;

    match outcome {
        GroupingOutcome::Added => println!(
            "{} Grouping '{}' added under '{}'",
            "✓".green(),
            grouping.trim(),
            area.trim()
        ),
        GroupingOutcome::AlreadyExists => println!(
            "{} Grouping '{}' already exists under '{}'",
            "⚠".yellow(),
            grouping.trim(),
            area.trim()
        ),
    }

    Ok(())
}
