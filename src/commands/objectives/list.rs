use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::cli::commands::ListArgs;
use crate::commands::now_in_zone;
use crate::config::Config;
use crate::export::{filtered_file_name, filtered_workbook, try_open_file, write_export};
use crate::model::ObjectiveTable;
use crate::report::{DisplayTable, ObjectiveFilter, Summary};
use crate::store::ObjectiveStore;
use crate::ui::output::{print_summary, print_table};
use crate::ui::with_spinner;

/// Metrics over every stored objective, plus the rows the filter keeps
fn report_view(table: &ObjectiveTable, filter: &ObjectiveFilter) -> (Summary, ObjectiveTable) {
    (Summary::from_table(table), filter.apply(table))
}

/// Print stored objectives, optionally filtered, and export them on request
pub async fn list_command(config: &Config, args: ListArgs) -> Result<()> {
    let store = ObjectiveStore::from_config(config)?;
    let table = with_spinner("Loading objectives", store.load_objectives()).await?;

    if table.is_empty() {
        println!("No objectives have been recorded yet.");
        return Ok(());
    }

    let filter = ObjectiveFilter {
        area: args.area,
        status: args.status,
        responsible: args.responsible,
    };
    let (summary, filtered) = report_view(&table, &filter);
    info!("Listing {} of {} objectives", filtered.len(), table.len());

    print_summary(&summary);
    println!();

    if filtered.is_empty() {
        println!("No objectives match the selected filters.");
        return Ok(());
    }

    let display = DisplayTable::project(&filtered);
    print_table(&display);

    if args.export {
        let dir = args.output.unwrap_or_else(|| config.export_dir());
        let bytes = filtered_workbook(&display)?;
        let path = write_export(&dir, &filtered_file_name(&now_in_zone(config)?), &bytes)?;
        println!();
        println!("{} Excel file written to {}", "✓".green(), path.display());
        if config.settings.open_exports {
            try_open_file(&path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectiveRecord;

    fn record(area: &str, responsible: &str) -> ObjectiveRecord {
        ObjectiveRecord {
            timestamp: "2024-03-01 10:00:00".into(),
            area: area.into(),
            objective: "Mejorar".into(),
            responsible: responsible.into(),
            status: "ACTIVO".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_covers_all_objectives_while_rows_are_filtered() {
        let table = ObjectiveTable::with_all_columns(vec![
            record("HACIENDA", "Ana"),
            record("URBANISMO", "Luis"),
            record("HACIENDA", "Marta"),
        ]);
        let filter = ObjectiveFilter {
            area: Some("URBANISMO".into()),
            ..ObjectiveFilter::default()
        };

        let (summary, filtered) = report_view(&table, &filter);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.areas, 2);
        assert_eq!(summary.responsibles, 3);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records[0].responsible, "Luis");
    }
}
