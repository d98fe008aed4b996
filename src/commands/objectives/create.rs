use anyhow::{Result, bail};
use chrono::Utc;
use colored::Colorize;
use log::{debug, info};
use std::path::PathBuf;

use crate::cli::commands::CreateArgs;
use crate::commands::{choose, now_in_zone};
use crate::config::Config;
use crate::export::{form_file_name, form_workbook, try_open_file, write_export};
use crate::form::FormState;
use crate::model::AreaCatalog;
use crate::store::{GroupingOutcome, ObjectiveStore};
use crate::submit::{SubmitTarget, submit_form};
use crate::ui::output::{print_form, print_submit_report};
use crate::ui::prompts::{
    FormAction, prompt_confirmation, prompt_entry, prompt_entry_index, prompt_form_action,
    select_from, text_input,
};
use crate::ui::with_spinner;

/// Area and grouping the current form is filed under
struct Selection {
    area: String,
    grouping: String,
}

fn select_area(catalog: &AreaCatalog, area: Option<&str>, grouping: Option<&str>) -> Result<Selection> {
    let area = choose("Area", area, &catalog.areas())?;
    let groupings = catalog.groupings_for(&area);
    if groupings.is_empty() {
        bail!("Area '{}' has no functional groupings", area);
    }
    let grouping = choose("Grouping", grouping, &groupings)?;
    Ok(Selection { area, grouping })
}

/// Store the complete entries and print the outcome
async fn submit_entries(
    config: &Config,
    store: &ObjectiveStore,
    form: &mut FormState,
    selection: &Selection,
) -> Result<()> {
    let target = SubmitTarget {
        area: &selection.area,
        grouping: &selection.grouping,
        timestamp: config.format_timestamp(Utc::now())?,
        status: &config.settings.default_status,
    };
    let report = with_spinner("Saving objectives", submit_form(store, form, target)).await?;
    print_submit_report(&report);
    Ok(())
}

/// Write the non-blank entries to a timestamped workbook in the export dir
fn export_form(config: &Config, form: &FormState, selection: &Selection) -> Result<PathBuf> {
    let rows = form.export_rows(&selection.area, &selection.grouping);
    let bytes = form_workbook(&rows)?;
    let name = form_file_name(&now_in_zone(config)?);
    write_export(&config.export_dir(), &name, &bytes)
}

/// Interactive objectives form
///
/// Loops over the form until the user quits. Submissions and downloads
/// can happen any number of times in one session.
pub async fn create_command(config: &Config, args: CreateArgs) -> Result<()> {
    let store = ObjectiveStore::from_config(config)?;
    let mut catalog = with_spinner("Loading areas", store.load_catalog()).await?;

    if catalog.is_empty() {
        bail!(
            "No areas available. Add rows to the '{}' worksheet or run `areas add`.",
            store.options().catalog_sheet
        );
    }

    let mut selection = select_area(&catalog, args.area.as_deref(), args.grouping.as_deref())?;
    let mut form = FormState::new();
    info!("Editing objectives for {} / {}", selection.area, selection.grouping);

    loop {
        print_form(&selection.area, &selection.grouping, &form);

        match prompt_form_action()? {
            FormAction::Edit => {
                let entries: Vec<_> = form.entries().collect();
                let index = prompt_entry_index(&entries)?;
                let (objective, indicator, responsible) = match form.entry(index) {
                    Some(entry) => prompt_entry(index + 1, entry)?,
                    None => continue,
                };
                form.set_entry(index, objective, indicator, responsible)?;
            }
            FormAction::Add => form.add_entry(),
            FormAction::RemoveLast => {
                if let Err(e) = form.remove_last() {
                    println!("{} {}", "⚠".yellow(), e);
                }
            }
            FormAction::Reset => {
                if prompt_confirmation("Clear every objective in the form?", false)? {
                    form.reset();
                }
            }
            FormAction::Submit => {
                if let Err(e) = submit_entries(config, &store, &mut form, &selection).await {
                    println!("{} {:#}", "✗".red(), e);
                }
            }
            FormAction::Export => match export_form(config, &form, &selection) {
                Ok(path) => {
                    println!("{} Excel file written to {}", "✓".green(), path.display());
                    if config.settings.open_exports {
                        try_open_file(&path);
                    }
                }
                Err(e) => println!("{} {:#}", "✗".red(), e),
            },
            FormAction::ChangeArea => match select_area(&catalog, None, None) {
                Ok(changed) => {
                    selection = changed;
                    debug!("Switched to {} / {}", selection.area, selection.grouping);
                }
                Err(e) => println!("{} {:#}", "✗".red(), e),
            },
            FormAction::NewGrouping => {
                let areas = catalog.areas();
                let area = select_from("Area", &areas, Some(selection.area.as_str()))?;
                let name = text_input("New functional grouping", None)?;
                if name.trim().is_empty() {
                    println!("{} The grouping name cannot be empty.", "⚠".yellow());
                    continue;
                }

                match with_spinner("Saving grouping", store.add_grouping(&area, &name)).await {
                    Ok(GroupingOutcome::Added) => {
                        println!("{} Grouping '{}' added under '{}'", "✓".green(), name.trim(), area);
                        match with_spinner("Reloading areas", store.load_catalog()).await {
                            Ok(reloaded) => catalog = reloaded,
                            Err(e) => println!("{} Could not reload areas: {:#}", "⚠".yellow(), e),
                        }
                        selection = Selection {
                            area,
                            grouping: name.trim().to_string(),
                        };
                    }
                    Ok(GroupingOutcome::AlreadyExists) => {
                        println!("{} That grouping already exists for this area.", "⚠".yellow());
                    }
                    Err(e) => println!("{} {:#}", "✗".red(), e),
                }
            }
            FormAction::Quit => {
                let unsaved = form.entries().any(|entry| !entry.is_blank());
                if !unsaved || prompt_confirmation("Discard the unsaved objectives?", false)? {
                    break;
                }
            }
        }
    }

    Ok(())
}
