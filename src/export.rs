//! Excel downloads of the form contents and of filtered report views

use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::form::ExportRow;
use crate::report::DisplayTable;

pub const FORM_SHEET: &str = "Objetivos";
pub const FILTERED_SHEET: &str = "Objetivos_Filtrados";

/// Columns of the form download
pub const FORM_HEADERS: [&str; 5] = ["Área", "Agrupación", "Objetivo", "Indicador", "Responsable"];

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x1F4E79))
        .set_font_color(Color::White)
}

fn write_sheet(sheet: &mut Worksheet, name: &str, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let header_format = header_format();
    sheet.set_name(name)?;

    for (c, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, header, &header_format)?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, c as u16, cell)?;
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    Ok(())
}

/// Workbook bytes for the current form entries
pub fn form_workbook(rows: &[ExportRow]) -> Result<Vec<u8>> {
    if rows.is_empty() {
        bail!("There are no objectives to download");
    }

    let headers: Vec<String> = FORM_HEADERS.iter().map(|h| h.to_string()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.area.clone(),
                row.grouping.clone(),
                row.objective.clone(),
                row.indicator.clone(),
                row.responsible.clone(),
            ]
        })
        .collect();

    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), FORM_SHEET, &headers, &cells)?;
    workbook
        .save_to_buffer()
        .context("Failed to build the objectives workbook")
}

/// Workbook bytes for a filtered report view
pub fn filtered_workbook(display: &DisplayTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), FILTERED_SHEET, &display.headers, &display.rows)?;
    workbook
        .save_to_buffer()
        .context("Failed to build the filtered objectives workbook")
}

pub fn form_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("objetivos_productividad_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

pub fn filtered_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("objetivos_filtrados_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

/// Write export bytes under `dir`, creating it when needed
pub fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    log::info!("Excel file exported to: {}", path.display());
    Ok(path)
}

/// Try to open the exported file with the desktop spreadsheet application
pub fn try_open_file(path: &Path) {
    let result = if cfg!(target_os = "windows") {
        Command::new("cmd")
            .args(["/c", "start", ""])
            .arg(path)
            .spawn()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()
    } else {
        Command::new("libreoffice")
            .arg("--calc")
            .arg(path)
            .spawn()
            .or_else(|_| Command::new("xdg-open").arg(path).spawn())
    };

    match result {
        Ok(_) => log::info!("Opened Excel file: {}", path.display()),
        Err(e) => log::warn!(
            "Could not auto-open file: {}. Please open manually: {}",
            e,
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, Xlsx};
    use chrono::{TimeZone, Utc};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_form_workbook_has_five_columns_per_row() {
        let rows = vec![
            ExportRow {
                area: "HACIENDA".into(),
                grouping: "Contabilidad".into(),
                objective: "Reducir plazos".into(),
                indicator: "Días".into(),
                responsible: "Ana".into(),
            },
            ExportRow {
                area: "HACIENDA".into(),
                grouping: "Contabilidad".into(),
                objective: "Digitalizar".into(),
                indicator: "Trámites".into(),
                responsible: "Luis".into(),
            },
        ];

        let values = read_back(form_workbook(&rows).unwrap(), FORM_SHEET);

        assert_eq!(values.len(), 3);
        assert_eq!(values[0], FORM_HEADERS.to_vec());
        assert_eq!(values[2], vec!["HACIENDA", "Contabilidad", "Digitalizar", "Trámites", "Luis"]);
    }

    #[test]
    fn test_form_workbook_rejects_empty_form() {
        assert!(form_workbook(&[]).is_err());
    }

    #[test]
    fn test_filtered_workbook_uses_display_headers() {
        let display = DisplayTable {
            headers: vec!["Fecha".into(), "Objetivo".into()],
            rows: vec![vec!["01/03/2024 10:00".into(), "Mejorar".into()]],
        };

        let values = read_back(filtered_workbook(&display).unwrap(), FILTERED_SHEET);
        assert_eq!(values, vec![vec!["Fecha", "Objetivo"], vec!["01/03/2024 10:00", "Mejorar"]]);
    }

    #[test]
    fn test_file_names_carry_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(form_file_name(&now), "objetivos_productividad_20240506_070809.xlsx");
        assert_eq!(filtered_file_name(&now), "objetivos_filtrados_20240506_070809.xlsx");
    }
}
