//! Coloured console rendering of forms, reports and submission outcomes

use colored::Colorize;

use crate::form::FormState;
use crate::report::{DisplayTable, Summary};
use crate::submit::SubmitReport;

const MAX_CELL_WIDTH: usize = 40;

pub fn print_form(area: &str, grouping: &str, form: &FormState) {
    println!();
    println!("{} {}  {} {}", "Area:".bold(), area.cyan(), "Grouping:".bold(), grouping.cyan());
    for (i, entry) in form.entries().enumerate() {
        let marker = if entry.is_complete() {
            "✓".green()
        } else if entry.is_blank() {
            "·".dimmed()
        } else {
            "!".yellow()
        };
        println!("{} {}", marker, format!("Objective {}", i + 1).bold());
        println!("    {} {}", "Description:".dimmed(), placeholder(entry.objective));
        println!("    {} {}", "Indicator:  ".dimmed(), placeholder(entry.indicator));
        println!("    {} {}", "Responsible:".dimmed(), placeholder(entry.responsible));
    }
    println!();
}

fn placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        "-".dimmed().to_string()
    } else {
        value.trim().to_string()
    }
}

pub fn print_submit_report(report: &SubmitReport) {
    for position in &report.incomplete {
        println!(
            "{} Objective {} is incomplete. Fill in every field or leave it empty.",
            "⚠".yellow(),
            position
        );
    }
    if report.saved > 0 {
        println!(
            "{} {} objectives saved (ID: {})",
            "✓".green(),
            report.saved,
            report.batch_id.to_string().bold()
        );
    }
    if !report.failures.is_empty() {
        println!("{} Some objectives could not be saved:", "✗".red());
        for failure in &report.failures {
            println!("  • {}", failure);
        }
    }
}

pub fn print_summary(summary: &Summary) {
    println!(
        "{} {}   {} {}   {} {}   {} {}",
        "Objectives:".bold(),
        summary.total.to_string().cyan(),
        "Areas:".bold(),
        summary.areas.to_string().cyan(),
        "Responsibles:".bold(),
        summary.responsibles.to_string().cyan(),
        "Active:".bold(),
        summary.active.to_string().green()
    );
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Plain aligned table; long cells are shortened
pub fn print_table(display: &DisplayTable) {
    let widths: Vec<usize> = display
        .headers
        .iter()
        .enumerate()
        .map(|(c, header)| {
            display
                .rows
                .iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let cell = truncate(cell, *width);
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", render(&display.headers).bold());
    for row in &display.rows {
        println!("{}", render(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Agrupación", 20), "Agrupación");
        assert_eq!(truncate("Agrupación funcional", 8), "Agrupac…");
    }
}
