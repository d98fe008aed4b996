//! Turning a filled-in form into stored objectives

use anyhow::{Result, bail};
use log::{info, warn};

use crate::form::FormState;
use crate::model::{EntryBatchId, NewObjective};
use crate::store::ObjectiveStore;

/// Where a submission files its objectives
#[derive(Debug, Clone)]
pub struct SubmitTarget<'a> {
    pub area: &'a str,
    pub grouping: &'a str,
    pub timestamp: String,
    pub status: &'a str,
}

#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub batch_id: EntryBatchId,
    pub saved: usize,
    /// One message per objective that could not be stored
    pub failures: Vec<String>,
    /// 1-based positions skipped because only some fields were filled
    pub incomplete: Vec<usize>,
    /// Whether the form was cleared afterwards
    pub form_reset: bool,
}

impl SubmitReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Store every complete entry under one batch id and timestamp.
///
/// Errors when no entry is complete. The form is reset only when at least
/// one objective was saved and none failed.
pub async fn submit_form(
    store: &ObjectiveStore,
    form: &mut FormState,
    target: SubmitTarget<'_>,
) -> Result<SubmitReport> {
    let validation = form.validate();

    for position in &validation.incomplete {
        warn!("Objective {} is incomplete and will not be saved", position);
    }

    if validation.complete.is_empty() {
        bail!("There are no valid objectives to save. Fill in every field of at least one objective.");
    }

    let batch_id = EntryBatchId::generate();
    let mut saved = 0;
    let mut failures = Vec::new();

    info!(
        "Submitting {} objectives as batch {}",
        validation.complete.len(),
        batch_id
    );

    for entry in validation.complete {
        let objective = NewObjective {
            batch_id: batch_id.clone(),
            timestamp: target.timestamp.clone(),
            area: target.area.to_string(),
            grouping: target.grouping.to_string(),
            objective: entry.objective,
            indicator: entry.indicator,
            responsible: entry.responsible,
            status: target.status.to_string(),
        };

        match store.save_objective(&objective).await {
            Ok(()) => saved += 1,
            Err(e) => {
                warn!("Failed to save objective '{}': {:#}", objective.objective, e);
                failures.push(format!("Error saving objective '{}': {:#}", objective.objective, e));
            }
        }
    }

    let form_reset = saved > 0 && failures.is_empty();
    if form_reset {
        form.reset();
    }

    Ok(SubmitReport {
        batch_id,
        saved,
        failures,
        incomplete: validation.incomplete,
        form_reset,
    })
}
