//! Domain types shared by the form, the store and the report view

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Header row of the objectives worksheet, in storage order
pub const OBJECTIVE_HEADERS: [&str; 9] = [
    "id_entrada",
    "timestamp",
    "area",
    "agrupacion",
    "objetivo",
    "indicador",
    "responsable",
    "estado",
    "fecha_cambio_estado",
];

/// Header row of the area/grouping reference worksheet
pub const CATALOG_HEADERS: [&str; 2] = ["Area", "Agrupacion_Funcional"];

pub const COL_ENTRY_ID: &str = "id_entrada";
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_AREA: &str = "area";
pub const COL_GROUPING: &str = "agrupacion";
pub const COL_OBJECTIVE: &str = "objetivo";
pub const COL_INDICATOR: &str = "indicador";
pub const COL_RESPONSIBLE: &str = "responsable";
pub const COL_STATUS: &str = "estado";
pub const COL_STATUS_CHANGED: &str = "fecha_cambio_estado";

/// Status written for freshly submitted objectives
pub const ACTIVE_STATUS: &str = "ACTIVO";

/// Storage format of `timestamp` and `fecha_cambio_estado`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaGrouping {
    pub area: String,
    pub grouping: String,
}

impl AreaGrouping {
    pub fn new(area: impl Into<String>, grouping: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            grouping: grouping.into(),
        }
    }

    /// Case-insensitive comparison on trimmed values
    pub fn matches(&self, area: &str, grouping: &str) -> bool {
        self.area.trim().to_lowercase() == area.trim().to_lowercase()
            && self.grouping.trim().to_lowercase() == grouping.trim().to_lowercase()
    }
}

/// Cleaned area/grouping reference data
#[derive(Debug, Clone, Default)]
pub struct AreaCatalog {
    entries: Vec<AreaGrouping>,
}

impl AreaCatalog {
    /// Build a catalog, trimming values and dropping pairs with a blank side
    pub fn new(entries: Vec<AreaGrouping>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| AreaGrouping::new(e.area.trim(), e.grouping.trim()))
            .filter(|e| !e.area.is_empty() && !e.grouping.is_empty())
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[AreaGrouping] {
        &self.entries
    }

    pub fn areas(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.area.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn groupings_for(&self, area: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.area == area)
            .map(|e| e.grouping.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains(&self, area: &str, grouping: &str) -> bool {
        self.entries.iter().any(|e| e.matches(area, grouping))
    }
}

/// Identifier shared by every objective submitted in one action
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryBatchId(String);

impl EntryBatchId {
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..8].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryBatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Objective about to be persisted
#[derive(Debug, Clone)]
pub struct NewObjective {
    pub batch_id: EntryBatchId,
    pub timestamp: String,
    pub area: String,
    pub grouping: String,
    pub objective: String,
    pub indicator: String,
    pub responsible: String,
    pub status: String,
}

impl NewObjective {
    /// Row in `OBJECTIVE_HEADERS` order; the status change date starts as the creation time
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.batch_id.to_string(),
            self.timestamp.clone(),
            self.area.clone(),
            self.grouping.clone(),
            self.objective.clone(),
            self.indicator.clone(),
            self.responsible.clone(),
            self.status.clone(),
            self.timestamp.clone(),
        ]
    }
}

/// One stored objective row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveRecord {
    pub entry_id: String,
    pub timestamp: String,
    pub area: String,
    pub grouping: String,
    pub objective: String,
    pub indicator: String,
    pub responsible: String,
    pub status: String,
    pub status_changed_at: String,
}

impl ObjectiveRecord {
    /// Build from a header-keyed record; absent columns become empty strings
    pub fn from_record(record: &HashMap<String, String>) -> Self {
        let get = |key: &str| record.get(key).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            entry_id: get(COL_ENTRY_ID),
            timestamp: get(COL_TIMESTAMP),
            area: get(COL_AREA),
            grouping: get(COL_GROUPING),
            objective: get(COL_OBJECTIVE),
            indicator: get(COL_INDICATOR),
            responsible: get(COL_RESPONSIBLE),
            status: get(COL_STATUS),
            status_changed_at: get(COL_STATUS_CHANGED),
        }
    }

    /// Value of a named storage column
    pub fn field(&self, column: &str) -> Option<&str> {
        let value = match column {
            COL_ENTRY_ID => &self.entry_id,
            COL_TIMESTAMP => &self.timestamp,
            COL_AREA => &self.area,
            COL_GROUPING => &self.grouping,
            COL_OBJECTIVE => &self.objective,
            COL_INDICATOR => &self.indicator,
            COL_RESPONSIBLE => &self.responsible,
            COL_STATUS => &self.status,
            COL_STATUS_CHANGED => &self.status_changed_at,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Loaded objectives plus the header names the sheet actually carries
#[derive(Debug, Clone, Default)]
pub struct ObjectiveTable {
    pub columns: Vec<String>,
    pub records: Vec<ObjectiveRecord>,
}

impl ObjectiveTable {
    pub fn new(columns: Vec<String>, records: Vec<ObjectiveRecord>) -> Self {
        Self { columns, records }
    }

    /// Table carrying every storage column
    pub fn with_all_columns(records: Vec<ObjectiveRecord>) -> Self {
        Self {
            columns: OBJECTIVE_HEADERS.iter().map(|h| h.to_string()).collect(),
            records,
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_is_eight_hex_chars() {
        let id = EntryBatchId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_catalog_cleans_and_sorts() {
        let catalog = AreaCatalog::new(vec![
            AreaGrouping::new(" URBANISMO ", "Licencias"),
            AreaGrouping::new("HACIENDA", "Contabilidad"),
            AreaGrouping::new("HACIENDA", "  "),
            AreaGrouping::new("", "Personal"),
            AreaGrouping::new("HACIENDA", "Tesorería"),
            AreaGrouping::new("HACIENDA", "Contabilidad"),
        ]);

        assert_eq!(catalog.entries().len(), 4);
        assert_eq!(catalog.areas(), vec!["HACIENDA", "URBANISMO"]);
        assert_eq!(catalog.groupings_for("HACIENDA"), vec!["Contabilidad", "Tesorería"]);
        assert!(catalog.contains("hacienda ", "CONTABILIDAD"));
        assert!(!catalog.contains("hacienda", "Licencias"));
    }

    #[test]
    fn test_new_objective_row_layout() {
        let objective = NewObjective {
            batch_id: EntryBatchId("abcd1234".into()),
            timestamp: "2024-03-01 10:00:00".into(),
            area: "HACIENDA".into(),
            grouping: "Contabilidad".into(),
            objective: "Reducir plazos".into(),
            indicator: "Días".into(),
            responsible: "Ana".into(),
            status: ACTIVE_STATUS.into(),
        };

        let row = objective.to_row();
        assert_eq!(row.len(), OBJECTIVE_HEADERS.len());
        assert_eq!(row[0], "abcd1234");
        assert_eq!(row[7], "ACTIVO");
        assert_eq!(row[8], row[1]);
    }

    #[test]
    fn test_record_from_partial_map() {
        let mut map = HashMap::new();
        map.insert("objetivo".to_string(), "  Mejorar  ".to_string());
        map.insert("area".to_string(), "HACIENDA".to_string());

        let record = ObjectiveRecord::from_record(&map);
        assert_eq!(record.objective, "Mejorar");
        assert_eq!(record.area, "HACIENDA");
        assert_eq!(record.status, "");
        assert_eq!(record.field("area"), Some("HACIENDA"));
        assert_eq!(record.field("unknown"), None);
    }
}
