use anyhow::{Result, bail};
use dialoguer::{Input, Select};

use crate::form::FormEntry;

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection (index 0)
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

/// Pick one value from a list, preselecting `current` when present
pub fn select_from(prompt: &str, options: &[String], current: Option<&str>) -> Result<String> {
    if options.is_empty() {
        bail!("Nothing to choose for '{}'", prompt);
    }

    let default_index = current
        .and_then(|c| options.iter().position(|o| o == c))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(prompt)
        .items(options)
        .default(default_index)
        .interact()?;

    Ok(options[selection].clone())
}

/// Simple text input prompt with optional initial text; may be left empty
pub fn text_input(prompt: &str, initial: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);

    if let Some(text) = initial.filter(|t| !t.is_empty()) {
        input = input.with_initial_text(text);
    }

    Ok(input.interact_text()?)
}

/// Actions offered below the objectives form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Edit,
    Add,
    RemoveLast,
    Reset,
    Submit,
    Export,
    ChangeArea,
    NewGrouping,
    Quit,
}

impl FormAction {
    pub const ALL: [FormAction; 9] = [
        FormAction::Edit,
        FormAction::Add,
        FormAction::RemoveLast,
        FormAction::Reset,
        FormAction::Submit,
        FormAction::Export,
        FormAction::ChangeArea,
        FormAction::NewGrouping,
        FormAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormAction::Edit => "Edit an objective",
            FormAction::Add => "New objective",
            FormAction::RemoveLast => "Remove last",
            FormAction::Reset => "Reset",
            FormAction::Submit => "Submit objectives",
            FormAction::Export => "Download as Excel",
            FormAction::ChangeArea => "Change area / grouping",
            FormAction::NewGrouping => "Add a new functional grouping",
            FormAction::Quit => "Quit",
        }
    }
}

pub fn prompt_form_action() -> Result<FormAction> {
    let labels: Vec<&str> = FormAction::ALL.iter().map(|a| a.label()).collect();
    let selection = Select::new()
        .with_prompt("What next?")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(FormAction::ALL[selection])
}

/// Choose which objective slot to edit (returns a 0-based index)
pub fn prompt_entry_index(entries: &[FormEntry<'_>]) -> Result<usize> {
    if entries.len() == 1 {
        return Ok(0);
    }

    let items: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let preview = if e.objective.trim().is_empty() {
                "(empty)".to_string()
            } else {
                e.objective.trim().chars().take(50).collect()
            };
            format!("Objective {}: {}", i + 1, preview)
        })
        .collect();

    Ok(Select::new()
        .with_prompt("Which objective?")
        .items(&items)
        .default(items.len() - 1)
        .interact()?)
}

/// Edited objective, indicator and responsible for one slot
pub fn prompt_entry(position: usize, current: FormEntry<'_>) -> Result<(String, String, String)> {
    let objective = text_input(
        &format!("Objective {} description", position),
        Some(current.objective),
    )?;
    let indicator = text_input(&format!("Indicator {}", position), Some(current.indicator))?;
    let responsible = text_input(&format!("Responsible {}", position), Some(current.responsible))?;
    Ok((objective, indicator, responsible))
}
