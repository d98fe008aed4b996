//! Local `.xlsx` file used as the spreadsheet
//!
//! Reads go through calamine; every mutation rewrites the whole file with
//! rust_xlsxwriter, preserving worksheet order.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use calamine::{Reader, Xlsx, open_workbook};
use log::{debug, info};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::SheetBackend;
use crate::api::TransientFailure;

pub struct WorkbookBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

type SheetValues = Vec<(String, Vec<Vec<String>>)>;

impl WorkbookBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<SheetValues> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).map_err(|e| open_error(&self.path, e))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| anyhow!("Error reading sheet '{}': {}", name, e))?;
            sheets.push((name, range_to_values(&range)));
        }
        Ok(sheets)
    }

    fn write_all(&self, sheets: &SheetValues) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let mut workbook = Workbook::new();
        for (title, values) in sheets {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name(title)
                .with_context(|| format!("Invalid worksheet name '{}'", title))?;
            for (r, row) in values.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if !cell.is_empty() {
                        sheet.write_string(r as u32, c as u16, cell)?;
                    }
                }
            }
        }

        workbook
            .save(&self.path)
            .map_err(|e| save_error(&self.path, e))?;
        Ok(())
    }
}

/// IO and zip failures on open usually mean another program holds or is
/// still writing the file, so they surface as retryable errors.
fn open_error(path: &Path, error: calamine::XlsxError) -> anyhow::Error {
    let context = format!("Failed to open workbook: {}", path.display());
    match error {
        calamine::XlsxError::Io(e) => anyhow::Error::new(e).context(context),
        calamine::XlsxError::Zip(e) => anyhow::Error::new(TransientFailure(e.to_string())).context(context),
        other => anyhow!("{}: {}", context, other),
    }
}

fn save_error(path: &Path, error: rust_xlsxwriter::XlsxError) -> anyhow::Error {
    let context = format!("Failed to save workbook: {}", path.display());
    match error {
        rust_xlsxwriter::XlsxError::IoError(e) => anyhow::Error::new(e).context(context),
        other => anyhow::Error::new(other).context(context),
    }
}

/// Cell grid anchored at A1, whatever the range's first used cell is
fn range_to_values(range: &calamine::Range<calamine::Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut values: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(|cell| cell.to_string()));
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        values.push(cells);
    }
    values
}

#[async_trait]
impl SheetBackend for WorkbookBackend {
    fn describe(&self) -> String {
        format!("workbook {}", self.path.display())
    }

    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_iter().map(|(t, _)| t).collect())
    }

    async fn add_worksheet(&self, title: &str, _rows: u32, _cols: u32) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sheets = self.read_all()?;
        if sheets.iter().any(|(t, _)| t == title) {
            bail!("Worksheet '{}' already exists", title);
        }
        sheets.push((title.to_string(), Vec::new()));
        self.write_all(&sheets)?;
        info!("Created worksheet '{}' in {}", title, self.path.display());
        Ok(())
    }

    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        self.read_all()?
            .into_iter()
            .find(|(t, _)| t == title)
            .map(|(_, v)| v)
            .ok_or_else(|| anyhow!("Worksheet '{}' not found in {}", title, self.path.display()))
    }

    async fn append_row(&self, title: &str, row: &[String]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut sheets = self.read_all()?;
        let (_, values) = sheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .ok_or_else(|| anyhow!("Worksheet '{}' not found in {}", title, self.path.display()))?;
        values.push(row.to_vec());
        let row_count = values.len();
        self.write_all(&sheets)?;
        debug!("Appended row to '{}' ({} rows)", title, row_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RetryableError;
    use std::io;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("objectives-cli-wb-{}", uuid::Uuid::new_v4()))
            .join("objectives.xlsx")
    }

    #[test]
    fn test_locked_file_on_save_is_retryable() {
        let error = save_error(
            Path::new("objectives.xlsx"),
            rust_xlsxwriter::XlsxError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "locked by another program",
            )),
        );
        assert_eq!(RetryableError::classify(&error), RetryableError::Io);
    }

    #[tokio::test]
    async fn test_unreadable_workbook_is_retryable() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"half written").unwrap();

        let backend = WorkbookBackend::new(&path);
        let error = backend
            .append_row("estado", &["x".to_string()])
            .await
            .unwrap_err();
        assert!(RetryableError::classify(&error).should_retry());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_not_retryable() {
        let path = temp_path();
        let backend = WorkbookBackend::new(&path);
        backend.add_worksheet("estado", 10, 10).await.unwrap();

        let error = backend
            .append_row("otra", &["x".to_string()])
            .await
            .unwrap_err();
        assert!(!RetryableError::classify(&error).should_retry());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
