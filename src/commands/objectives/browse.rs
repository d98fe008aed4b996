use anyhow::Result;

use crate::commands::now_in_zone;
use crate::config::Config;
use crate::export::{filtered_file_name, filtered_workbook, write_export};
use crate::store::ObjectiveStore;
use crate::tui::run_browser;
use crate::ui::with_spinner;

/// Open the full-screen objectives browser
pub async fn browse_command(config: &Config) -> Result<()> {
    let store = ObjectiveStore::from_config(config)?;
    let table = with_spinner("Loading objectives", store.load_objectives()).await?;

    if table.is_empty() {
        println!("No objectives have been recorded yet.");
        return Ok(());
    }

    let dir = config.export_dir();
    run_browser(table, |display| {
        let bytes = filtered_workbook(display)?;
        write_export(&dir, &filtered_file_name(&now_in_zone(config)?), &bytes)
    })
}
