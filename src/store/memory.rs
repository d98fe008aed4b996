use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use super::SheetBackend;
use crate::api::TransientFailure;

#[derive(Debug, Default)]
struct Inner {
    sheets: Vec<(String, Vec<Vec<String>>)>,
    /// Requested rows x columns of worksheets created through the backend
    dimensions: HashMap<String, (u32, u32)>,
}

/// In-process spreadsheet, cheap to clone (shared state)
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
    pending_failures: Arc<AtomicU32>,
    append_calls: Arc<AtomicU32>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a worksheet
    pub fn with_sheet(self, title: &str, values: Vec<Vec<String>>) -> Self {
        self.lock().sheets.push((title.to_string(), values));
        self
    }

    /// Make the next `count` appends fail with a transient error
    pub fn fail_next_appends(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of append attempts seen, failed ones included
    pub fn append_calls(&self) -> u32 {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of a worksheet's values
    pub fn values(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.lock()
            .sheets
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, v)| v.clone())
    }

    /// Size requested when the worksheet was created
    pub fn dimensions(&self, title: &str) -> Option<(u32, u32)> {
        self.lock().dimensions.get(title).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SheetBackend for MemoryBackend {
    fn describe(&self) -> String {
        "in-memory spreadsheet".to_string()
    }

    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        Ok(self.lock().sheets.iter().map(|(t, _)| t.clone()).collect())
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<()> {
        let mut inner = self.lock();
        if inner.sheets.iter().any(|(t, _)| t == title) {
            bail!("Worksheet '{}' already exists", title);
        }
        inner.sheets.push((title.to_string(), Vec::new()));
        inner.dimensions.insert(title.to_string(), (rows, cols));
        debug!("Added in-memory worksheet '{}' ({}x{})", title, rows, cols);
        Ok(())
    }

    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        self.values(title)
            .ok_or_else(|| anyhow!("Worksheet '{}' not found", title))
    }

    async fn append_row(&self, title: &str, row: &[String]) -> Result<()> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);

        let pending = self.pending_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.pending_failures.store(pending - 1, Ordering::SeqCst);
            return Err(TransientFailure(format!("simulated failure appending to '{}'", title)).into());
        }

        let mut inner = self.lock();
        let (_, values) = inner
            .sheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .ok_or_else(|| anyhow!("Worksheet '{}' not found", title))?;
        values.push(row.to_vec());
        Ok(())
    }
}
