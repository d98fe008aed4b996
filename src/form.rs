//! Session-scoped objective form
//!
//! Holds three index-aligned lists (objective, indicator, responsible) that
//! only ever change together. Nothing here touches the store.

use anyhow::{Result, bail};
use log::debug;

/// Borrowed view of one form slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormEntry<'a> {
    pub objective: &'a str,
    pub indicator: &'a str,
    pub responsible: &'a str,
}

impl FormEntry<'_> {
    pub fn is_blank(&self) -> bool {
        self.objective.trim().is_empty()
            && self.indicator.trim().is_empty()
            && self.responsible.trim().is_empty()
    }

    pub fn is_complete(&self) -> bool {
        !self.objective.trim().is_empty()
            && !self.indicator.trim().is_empty()
            && !self.responsible.trim().is_empty()
    }
}

/// Trimmed objective/indicator/responsible triple ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteEntry {
    pub objective: String,
    pub indicator: String,
    pub responsible: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub complete: Vec<CompleteEntry>,
    /// 1-based positions of entries with some but not all fields filled
    pub incomplete: Vec<usize>,
}

/// Row of the form download, one per entry with any content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub area: String,
    pub grouping: String,
    pub objective: String,
    pub indicator: String,
    pub responsible: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    objectives: Vec<String>,
    indicators: Vec<String>,
    responsibles: Vec<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            objectives: vec![String::new()],
            indicators: vec![String::new()],
            responsibles: vec![String::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    pub fn add_entry(&mut self) {
        self.objectives.push(String::new());
        self.indicators.push(String::new());
        self.responsibles.push(String::new());
        debug!("Added form entry, now {}", self.len());
    }

    pub fn remove_last(&mut self) -> Result<()> {
        if self.len() <= 1 {
            bail!("At least one objective must be kept");
        }
        self.objectives.pop();
        self.indicators.pop();
        self.responsibles.pop();
        debug!("Removed last form entry, now {}", self.len());
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Form reset");
    }

    pub fn set_objective(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.objectives[index] = text.into();
        Ok(())
    }

    pub fn set_indicator(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.indicators[index] = text.into();
        Ok(())
    }

    pub fn set_responsible(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.responsibles[index] = text.into();
        Ok(())
    }

    /// Fill a whole slot at once
    pub fn set_entry(
        &mut self,
        index: usize,
        objective: impl Into<String>,
        indicator: impl Into<String>,
        responsible: impl Into<String>,
    ) -> Result<()> {
        self.check_index(index)?;
        self.objectives[index] = objective.into();
        self.indicators[index] = indicator.into();
        self.responsibles[index] = responsible.into();
        Ok(())
    }

    pub fn entry(&self, index: usize) -> Option<FormEntry<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(FormEntry {
            objective: &self.objectives[index],
            indicator: &self.indicators[index],
            responsible: &self.responsibles[index],
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = FormEntry<'_>> {
        self.objectives
            .iter()
            .zip(&self.indicators)
            .zip(&self.responsibles)
            .map(|((objective, indicator), responsible)| FormEntry {
                objective,
                indicator,
                responsible,
            })
    }

    /// Split entries into complete triples and partially filled positions
    pub fn validate(&self) -> FormValidation {
        let mut validation = FormValidation::default();

        for (i, entry) in self.entries().enumerate() {
            if entry.is_complete() {
                validation.complete.push(CompleteEntry {
                    objective: entry.objective.trim().to_string(),
                    indicator: entry.indicator.trim().to_string(),
                    responsible: entry.responsible.trim().to_string(),
                });
            } else if !entry.is_blank() {
                validation.incomplete.push(i + 1);
            }
        }

        validation
    }

    pub fn export_rows(&self, area: &str, grouping: &str) -> Vec<ExportRow> {
        self.entries()
            .filter(|entry| !entry.is_blank())
            .map(|entry| ExportRow {
                area: area.to_string(),
                grouping: grouping.to_string(),
                objective: entry.objective.trim().to_string(),
                indicator: entry.indicator.trim().to_string(),
                responsible: entry.responsible.trim().to_string(),
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            bail!("Objective {} does not exist (form has {})", index + 1, self.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists_aligned(form: &FormState) -> bool {
        form.objectives.len() == form.indicators.len()
            && form.indicators.len() == form.responsibles.len()
    }

    #[test]
    fn test_new_form_has_one_blank_entry() {
        let form = FormState::new();
        assert_eq!(form.len(), 1);
        assert!(form.entry(0).unwrap().is_blank());
    }

    #[test]
    fn test_add_and_remove_keep_lists_aligned() {
        let mut form = FormState::new();
        form.add_entry();
        form.add_entry();
        assert_eq!(form.len(), 3);
        assert!(lists_aligned(&form));

        form.remove_last().unwrap();
        assert_eq!(form.len(), 2);
        assert!(lists_aligned(&form));
    }

    #[test]
    fn test_remove_last_refuses_single_entry() {
        let mut form = FormState::new();
        assert!(form.remove_last().is_err());
        assert_eq!(form.len(), 1);
        assert!(!form.is_empty());
    }

    #[test]
    fn test_reset_clears_to_single_blank_entry() {
        let mut form = FormState::new();
        form.set_entry(0, "a", "b", "c").unwrap();
        form.add_entry();
        form.set_objective(1, "x").unwrap();

        form.reset();

        assert_eq!(form, FormState::new());
        assert!(lists_aligned(&form));
    }

    #[test]
    fn test_set_out_of_range_is_error() {
        let mut form = FormState::new();
        assert!(form.set_indicator(1, "x").is_err());
        assert!(form.entry(1).is_none());
    }

    #[test]
    fn test_validate_splits_complete_and_incomplete() {
        let mut form = FormState::new();
        form.set_entry(0, " Mejorar atención ", "% satisfacción", "Ana").unwrap();
        form.add_entry();
        form.set_entry(1, "Reducir plazos", "", "Luis").unwrap();
        form.add_entry();
        form.add_entry();
        form.set_entry(3, "Digitalizar", "Trámites online", "Marta ").unwrap();

        let validation = form.validate();

        assert_eq!(validation.complete.len(), 2);
        assert_eq!(validation.complete[0].objective, "Mejorar atención");
        assert_eq!(validation.complete[1].responsible, "Marta");
        assert_eq!(validation.incomplete, vec![2]);
    }

    #[test]
    fn test_export_rows_skip_blank_entries() {
        let mut form = FormState::new();
        form.set_entry(0, "Mejorar", "", "").unwrap();
        form.add_entry();
        form.add_entry();
        form.set_entry(2, " Reducir ", "Días", "Luis").unwrap();

        let rows = form.export_rows("HACIENDA", "Contabilidad");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].objective, "Mejorar");
        assert_eq!(rows[0].indicator, "");
        assert_eq!(rows[1].objective, "Reducir");
        assert!(rows.iter().all(|r| r.area == "HACIENDA" && r.grouping == "Contabilidad"));
    }
}
