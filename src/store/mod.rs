//! Spreadsheet-backed persistence for objectives and reference data
//!
//! The store talks to a [`SheetBackend`], which only knows about worksheets
//! holding rows of strings. Provisioning, validation, cleaning and retry
//! live in [`ObjectiveStore`].

pub mod memory;
pub mod records;
pub mod sheets;
pub mod workbook;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::api::{RetryPolicy, SheetsClient};
use crate::config::{BackendKind, Config};
use crate::model::{
    AreaCatalog, AreaGrouping, CATALOG_HEADERS, COL_OBJECTIVE, COL_TIMESTAMP, NewObjective,
    OBJECTIVE_HEADERS, ObjectiveRecord, ObjectiveTable,
};

pub use memory::MemoryBackend;
pub use records::SheetRecords;
pub use sheets::SheetsBackend;
pub use workbook::WorkbookBackend;

/// Rows seeded into a freshly created area/grouping worksheet
pub const SAMPLE_CATALOG: [(&str, &str); 4] = [
    ("ALCALDÍA - OMAC", "Alcaldía"),
    ("RECURSOS HUMANOS", "Personal"),
    ("HACIENDA", "Contabilidad"),
    ("URBANISMO", "Licencias"),
];

/// Minimal worksheet operations a spreadsheet provider must offer
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Human-readable location, for logs and messages
    fn describe(&self) -> String;

    async fn worksheet_titles(&self) -> Result<Vec<String>>;

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<()>;

    /// All values of a worksheet, header row included
    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>>;

    async fn append_row(&self, title: &str, row: &[String]) -> Result<()>;
}

/// Build the backend selected in the configuration
pub fn backend_from_config(config: &Config) -> Result<Arc<dyn SheetBackend>> {
    match config.store.backend {
        BackendKind::Workbook => {
            let path = config.workbook_path()?;
            debug!("Using workbook backend at {}", path.display());
            Ok(Arc::new(WorkbookBackend::new(path)))
        }
        BackendKind::Sheets => {
            let spreadsheet_id = config
                .store
                .spreadsheet_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .context("store.spreadsheet_id must be set for the sheets backend")?;
            let token_var = &config.store.access_token_env;
            let token = std::env::var(token_var)
                .with_context(|| format!("{} environment variable not set", token_var))?;
            let client = SheetsClient::new(&config.store.api_base_url, spreadsheet_id, token)?;
            debug!("Using Google Sheets backend for {}", spreadsheet_id);
            Ok(Arc::new(SheetsBackend::new(client)))
        }
    }
}

/// Result of registering a new functional grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingOutcome {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub objectives_sheet: String,
    pub catalog_sheet: String,
    pub retry: RetryPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            objectives_sheet: "estado".to_string(),
            catalog_sheet: "Areas_Agrupaciones".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            objectives_sheet: config.worksheets.objectives.clone(),
            catalog_sheet: config.worksheets.catalog.clone(),
            retry: RetryPolicy::new(config.retry.to_retry_config()),
        }
    }
}

#[derive(Clone)]
pub struct ObjectiveStore {
    backend: Arc<dyn SheetBackend>,
    options: StoreOptions,
}

impl ObjectiveStore {
    pub fn new(backend: Arc<dyn SheetBackend>, options: StoreOptions) -> Self {
        Self { backend, options }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(backend_from_config(config)?, StoreOptions::from_config(config)))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    async fn has_worksheet(&self, title: &str) -> Result<bool> {
        let titles = self
            .backend
            .worksheet_titles()
            .await
            .with_context(|| format!("Failed to list worksheets of {}", self.backend.describe()))?;
        Ok(titles.iter().any(|t| t == title))
    }

    /// Create the area/grouping worksheet with sample data when it is missing
    pub async fn ensure_catalog_sheet(&self) -> Result<()> {
        let title = &self.options.catalog_sheet;
        if self.has_worksheet(title).await? {
            return Ok(());
        }

        warn!("Worksheet '{}' does not exist, creating it", title);
        self.backend.add_worksheet(title, 100, 5).await?;
        self.backend.append_row(title, &to_row(&CATALOG_HEADERS)).await?;
        for (area, grouping) in SAMPLE_CATALOG {
            self.backend.append_row(title, &to_row(&[area, grouping])).await?;
        }
        info!("Created worksheet '{}' with sample data", title);
        Ok(())
    }

    /// Create the objectives worksheet with its header row when it is missing
    pub async fn ensure_objectives_sheet(&self) -> Result<()> {
        let title = &self.options.objectives_sheet;
        if self.has_worksheet(title).await? {
            return Ok(());
        }

        warn!("Worksheet '{}' does not exist, creating it", title);
        self.backend.add_worksheet(title, 1000, 10).await?;
        self.backend.append_row(title, &to_row(&OBJECTIVE_HEADERS)).await?;
        info!("Created worksheet '{}' with headers", title);
        Ok(())
    }

    pub async fn load_catalog(&self) -> Result<AreaCatalog> {
        self.ensure_catalog_sheet().await?;

        let values = self
            .backend
            .read_values(&self.options.catalog_sheet)
            .await
            .with_context(|| format!("Failed to read worksheet '{}'", self.options.catalog_sheet))?;
        let sheet = SheetRecords::from_values(values);

        let entries = sheet
            .records
            .iter()
            .map(|r| {
                AreaGrouping::new(
                    r.get(CATALOG_HEADERS[0]).cloned().unwrap_or_default(),
                    r.get(CATALOG_HEADERS[1]).cloned().unwrap_or_default(),
                )
            })
            .collect();

        let catalog = AreaCatalog::new(entries);
        debug!("Loaded {} area/grouping pairs", catalog.entries().len());
        Ok(catalog)
    }

    pub async fn add_grouping(&self, area: &str, grouping: &str) -> Result<GroupingOutcome> {
        let (area, grouping) = (area.trim(), grouping.trim());
        if area.is_empty() || grouping.is_empty() {
            bail!("Area and grouping cannot be empty");
        }

        let catalog = self.load_catalog().await?;
        if catalog.contains(area, grouping) {
            info!("Grouping '{}' already exists under '{}'", grouping, area);
            return Ok(GroupingOutcome::AlreadyExists);
        }

        self.backend
            .append_row(&self.options.catalog_sheet, &to_row(&[area, grouping]))
            .await
            .context("Failed to save the new functional grouping")?;
        info!("Added grouping '{}' under '{}'", grouping, area);
        Ok(GroupingOutcome::Added)
    }

    /// Persist one objective; blank required fields are rejected before any write
    pub async fn save_objective(&self, objective: &NewObjective) -> Result<()> {
        if objective.objective.trim().is_empty()
            || objective.indicator.trim().is_empty()
            || objective.responsible.trim().is_empty()
        {
            bail!("All fields (objective, indicator, responsible) are required");
        }

        let title = self.options.objectives_sheet.as_str();
        let row = objective.to_row();
        let (store, row) = (self, &row);

        // Sheet lookup and append are retried together
        self.options
            .retry
            .execute(move || async move {
                store.ensure_objectives_sheet().await?;
                store.backend.append_row(title, row).await
            })
            .await
            .context("Failed to save objective")?;

        debug!("Saved objective for batch {}", objective.batch_id);
        Ok(())
    }

    /// Every stored objective, cleaned, newest first
    pub async fn load_objectives(&self) -> Result<ObjectiveTable> {
        self.ensure_objectives_sheet().await?;

        let values = self
            .backend
            .read_values(&self.options.objectives_sheet)
            .await
            .with_context(|| format!("Failed to read worksheet '{}'", self.options.objectives_sheet))?;
        let sheet = SheetRecords::from_values(values);

        let mut records: Vec<ObjectiveRecord> = sheet
            .records
            .iter()
            .map(ObjectiveRecord::from_record)
            .filter(|r| !r.objective.is_empty() && r.objective != "nan")
            .collect();

        if !sheet.has_header(COL_OBJECTIVE) {
            warn!("Worksheet '{}' has no '{}' column", self.options.objectives_sheet, COL_OBJECTIVE);
        }

        if sheet.has_header(COL_TIMESTAMP) {
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        debug!("Loaded {} objectives", records.len());
        Ok(ObjectiveTable::new(sheet.headers, records))
    }
}

fn to_row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RetryConfig;
    use crate::model::{ACTIVE_STATUS, EntryBatchId};
    use std::time::Duration;

    fn store_with(backend: MemoryBackend) -> ObjectiveStore {
        let options = StoreOptions {
            retry: RetryPolicy::new(RetryConfig::fixed(3, Duration::from_millis(1))),
            ..StoreOptions::default()
        };
        ObjectiveStore::new(Arc::new(backend), options)
    }

    fn objective(text: &str, timestamp: &str) -> NewObjective {
        NewObjective {
            batch_id: EntryBatchId::generate(),
            timestamp: timestamp.to_string(),
            area: "HACIENDA".to_string(),
            grouping: "Contabilidad".to_string(),
            objective: text.to_string(),
            indicator: "Días".to_string(),
            responsible: "Ana".to_string(),
            status: ACTIVE_STATUS.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_catalog_provisions_sample_sheet() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());

        let catalog = store.load_catalog().await.unwrap();

        assert_eq!(catalog.entries().len(), SAMPLE_CATALOG.len());
        let values = backend.values("Areas_Agrupaciones").unwrap();
        assert_eq!(values[0], vec!["Area", "Agrupacion_Funcional"]);
        assert_eq!(values.len(), 5);
        assert_eq!(backend.dimensions("Areas_Agrupaciones"), Some((100, 5)));
    }

    #[tokio::test]
    async fn test_ensure_objectives_sheet_creates_headers_once() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());

        store.ensure_objectives_sheet().await.unwrap();
        store.ensure_objectives_sheet().await.unwrap();

        assert_eq!(backend.dimensions("estado"), Some((1000, 10)));
        let values = backend.values("estado").unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], to_row(&OBJECTIVE_HEADERS));
    }

    #[tokio::test]
    async fn test_add_grouping_detects_duplicates_case_insensitively() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());

        let outcome = store.add_grouping(" hacienda ", "CONTABILIDAD").await.unwrap();
        assert_eq!(outcome, GroupingOutcome::AlreadyExists);

        let outcome = store.add_grouping("HACIENDA", " Tesorería ").await.unwrap();
        assert_eq!(outcome, GroupingOutcome::Added);
        let values = backend.values("Areas_Agrupaciones").unwrap();
        assert_eq!(values.last().unwrap(), &vec!["HACIENDA".to_string(), "Tesorería".to_string()]);

        assert!(store.add_grouping("HACIENDA", "  ").await.is_err());
    }

    #[tokio::test]
    async fn test_save_objective_rejects_blank_fields_without_writing() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());

        let mut blank = objective("Mejorar", "2024-01-01 09:00:00");
        blank.indicator = "   ".to_string();

        assert!(store.save_objective(&blank).await.is_err());
        assert_eq!(backend.append_calls(), 0);
        assert!(backend.values("estado").is_none());
    }

    #[tokio::test]
    async fn test_save_objective_creates_sheet_and_appends_in_order() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());

        store.save_objective(&objective("Primero", "2024-01-01 09:00:00")).await.unwrap();
        store.save_objective(&objective("Segundo", "2024-01-01 09:00:00")).await.unwrap();

        let values = backend.values("estado").unwrap();
        assert_eq!(values[0].len(), OBJECTIVE_HEADERS.len());
        assert_eq!(values[1][4], "Primero");
        assert_eq!(values[2][4], "Segundo");
        assert_eq!(values[2][8], "2024-01-01 09:00:00");
    }

    #[tokio::test]
    async fn test_save_objective_retries_transient_failures() {
        let backend = MemoryBackend::new();
        let store = store_with(backend.clone());
        store.ensure_objectives_sheet().await.unwrap();
        let before = backend.append_calls();

        backend.fail_next_appends(2);
        store.save_objective(&objective("Mejorar", "2024-01-01 09:00:00")).await.unwrap();
        assert_eq!(backend.append_calls() - before, 3);

        backend.fail_next_appends(3);
        assert!(store.save_objective(&objective("Otro", "2024-01-01 09:00:00")).await.is_err());
        assert_eq!(backend.values("estado").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_objectives_cleans_and_sorts() {
        let mut values = vec![to_row(&OBJECTIVE_HEADERS)];
        values.push(to_row(&["a1", "2024-01-01 10:00:00", "HACIENDA", "Contabilidad", " Antiguo ", "x", "Ana", "ACTIVO", ""]));
        values.push(to_row(&["a2", "2024-02-01 10:00:00", "URBANISMO", "Licencias", "Nuevo", "y", "Luis", "ACTIVO", ""]));
        values.push(to_row(&["a3", "2024-03-01 10:00:00", "URBANISMO", "Licencias", "nan", "y", "Luis", "ACTIVO", ""]));
        values.push(to_row(&["a4", "2024-03-01 10:00:00", "URBANISMO", "Licencias", "", "y", "Luis", "ACTIVO", ""]));
        values.push(to_row(&["", "", "", "", "", "", "", "", ""]));

        let backend = MemoryBackend::new().with_sheet("estado", values);
        let store = store_with(backend);

        let table = store.load_objectives().await.unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].objective, "Nuevo");
        assert_eq!(table.records[1].objective, "Antiguo");
        assert!(table.has_column("estado"));
    }
}
