use anyhow::{Result, bail};
use chrono::Utc;
use colored::Colorize;
use log::info;

use crate::cli::commands::SubmitArgs;
use crate::commands::{choose_strict, now_in_zone};
use crate::config::Config;
use crate::export::{form_file_name, form_workbook, try_open_file, write_export};
use crate::form::FormState;
use crate::store::ObjectiveStore;
use crate::submit::{SubmitTarget, submit_form};
use crate::ui::output::print_submit_report;
use crate::ui::with_spinner;

/// Build a form from parallel argument lists
pub fn form_from_args(
    objectives: &[String],
    indicators: &[String],
    responsibles: &[String],
) -> Result<FormState> {
    if objectives.len() != indicators.len() || objectives.len() != responsibles.len() {
        bail!(
            "Got {} objectives, {} indicators and {} responsibles; pass one of each per objective",
            objectives.len(),
            indicators.len(),
            responsibles.len()
        );
    }

    let mut form = FormState::new();
    for (i, ((objective, indicator), responsible)) in
        objectives.iter().zip(indicators).zip(responsibles).enumerate()
    {
        if i > 0 {
            form.add_entry();
        }
        form.set_entry(i, objective.as_str(), indicator.as_str(), responsible.as_str())?;
    }
    Ok(form)
}

/// Submit objectives passed on the command line without prompting
pub async fn submit_command(config: &Config, args: SubmitArgs) -> Result<()> {
    let store = ObjectiveStore::from_config(config)?;
    let catalog = with_spinner("Loading areas", store.load_catalog()).await?;

    let area = choose_strict("Area", &args.area, &catalog.areas())?;
    let grouping = choose_strict("Grouping", &args.grouping, &catalog.groupings_for(&area))?;
    info!("Submitting {} objectives for {} / {}", args.objectives.len(), area, grouping);

    let mut form = form_from_args(&args.objectives, &args.indicators, &args.responsibles)?;
    let export_rows = form.export_rows(&area, &grouping);

    let target = SubmitTarget {
        area: &area,
        grouping: &grouping,
        timestamp: config.format_timestamp(Utc::now())?,
        status: &config.settings.default_status,
    };
    let report = with_spinner("Saving objectives", submit_form(&store, &mut form, target)).await?;
    print_submit_report(&report);

    if args.download {
        let bytes = form_workbook(&export_rows)?;
        let name = form_file_name(&now_in_zone(config)?);
        let path = write_export(&config.export_dir(), &name, &bytes)?;
        println!("{} Excel file written to {}", "✓".green(), path.display());
        if config.settings.open_exports {
            try_open_file(&path);
        }
    }

    if !report.is_clean() {
        bail!("{} objectives could not be saved", report.failures.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_form_from_args_fills_every_slot() {
        let form = form_from_args(
            &strings(&["Reducir plazos", "Digitalizar"]),
            &strings(&["Días", "% trámites"]),
            &strings(&["Ana", "Luis"]),
        )
        .unwrap();

        assert_eq!(form.len(), 2);
        let second = form.entry(1).unwrap();
        assert_eq!(second.objective, "Digitalizar");
        assert_eq!(second.responsible, "Luis");
        assert_eq!(form.validate().complete.len(), 2);
    }

    #[test]
    fn test_form_from_args_rejects_mismatched_lengths() {
        let result = form_from_args(
            &strings(&["Reducir plazos", "Digitalizar"]),
            &strings(&["Días"]),
            &strings(&["Ana", "Luis"]),
        );
        assert!(result.is_err());
    }
}
