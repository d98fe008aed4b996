//! Store operations against a real `.xlsx` file on disk

use calamine::{Reader, Xlsx, open_workbook};
use objectives_cli::api::{RetryConfig, RetryPolicy};
use objectives_cli::export::{filtered_workbook, write_export};
use objectives_cli::form::FormState;
use objectives_cli::report::DisplayTable;
use objectives_cli::store::{
    GroupingOutcome, ObjectiveStore, SAMPLE_CATALOG, StoreOptions, WorkbookBackend,
};
use objectives_cli::submit::{SubmitTarget, submit_form};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("objectives-cli-test-{}", uuid::Uuid::new_v4()))
}

fn workbook_store(path: &PathBuf) -> ObjectiveStore {
    ObjectiveStore::new(Arc::new(WorkbookBackend::new(path)), StoreOptions::default())
}

/// A missing workbook is created with sample areas on first use
#[tokio::test]
async fn test_catalog_is_provisioned_in_new_workbook() {
    let dir = temp_dir();
    let path = dir.join("data").join("objectives.xlsx");
    let store = workbook_store(&path);

    let catalog = store.load_catalog().await.unwrap();
    assert!(path.exists());
    assert_eq!(catalog.entries().len(), SAMPLE_CATALOG.len());
    assert!(catalog.areas().contains(&"URBANISMO".to_string()));

    let outcome = store.add_grouping("URBANISMO", "Obras").await.unwrap();
    assert_eq!(outcome, GroupingOutcome::Added);

    // A fresh store over the same file sees the new grouping
    let reopened = workbook_store(&path);
    let catalog = reopened.load_catalog().await.unwrap();
    assert_eq!(catalog.groupings_for("URBANISMO"), vec!["Licencias", "Obras"]);

    std::fs::remove_dir_all(&dir).ok();
}

/// Submitted objectives survive a round trip through the file
#[tokio::test]
async fn test_objectives_persist_in_workbook() {
    let dir = temp_dir();
    let path = dir.join("objectives.xlsx");
    let store = workbook_store(&path);

    let mut form = FormState::new();
    form.set_entry(0, "Reducir listas de espera", "Días", "Marta").unwrap();
    form.add_entry();
    form.set_entry(1, "Formar al personal", "Horas", "Pedro").unwrap();

    let target = SubmitTarget {
        area: "RECURSOS HUMANOS",
        grouping: "Personal",
        timestamp: "2024-03-15 08:45:00".to_string(),
        status: "ACTIVO",
    };
    let report = submit_form(&store, &mut form, target).await.unwrap();
    assert_eq!(report.saved, 2);

    let table = workbook_store(&path).load_objectives().await.unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].entry_id, report.batch_id.as_str());
    assert_eq!(table.records[0].area, "RECURSOS HUMANOS");

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["estado".to_string()]);

    // Filtered export lands next to the data
    let display = DisplayTable::project(&table);
    let bytes = filtered_workbook(&display).unwrap();
    let exported = write_export(&dir.join("exports"), "filtered.xlsx", &bytes).unwrap();
    assert!(exported.exists());

    std::fs::remove_dir_all(&dir).ok();
}

/// A workbook that cannot be read (e.g. mid-write by another program) is
/// retried until it becomes readable again
#[tokio::test]
async fn test_unreadable_workbook_is_retried_on_save() {
    let dir = temp_dir();
    let path = dir.join("objectives.xlsx");

    // Valid workbook bytes with the objectives sheet already provisioned
    let template = dir.join("template.xlsx");
    workbook_store(&template).ensure_objectives_sheet().await.unwrap();
    let valid = std::fs::read(&template).unwrap();

    std::fs::write(&path, b"not a zip archive").unwrap();

    let options = StoreOptions {
        retry: RetryPolicy::new(RetryConfig::fixed(3, Duration::from_millis(50))),
        ..StoreOptions::default()
    };
    let store = ObjectiveStore::new(Arc::new(WorkbookBackend::new(&path)), options);

    // Runs while the first attempt waits for its retry
    let restore_path = path.clone();
    let restore = tokio::spawn(async move { std::fs::write(&restore_path, valid).unwrap() });

    let mut form = FormState::new();
    form.set_entry(0, "Reducir listas de espera", "Días", "Marta").unwrap();
    let target = SubmitTarget {
        area: "RECURSOS HUMANOS",
        grouping: "Personal",
        timestamp: "2024-03-15 08:45:00".to_string(),
        status: "ACTIVO",
    };
    let report = submit_form(&store, &mut form, target).await.unwrap();
    restore.await.unwrap();

    assert_eq!(report.saved, 1);
    assert!(report.is_clean());
    let table = workbook_store(&path).load_objectives().await.unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].objective, "Reducir listas de espera");

    std::fs::remove_dir_all(&dir).ok();
}
