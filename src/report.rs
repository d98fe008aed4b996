//! Filtering, summary metrics and display projection of stored objectives

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

use crate::model::{
    ACTIVE_STATUS, COL_AREA, COL_GROUPING, COL_INDICATOR, COL_OBJECTIVE, COL_RESPONSIBLE,
    COL_STATUS, COL_TIMESTAMP, ObjectiveRecord, ObjectiveTable, TIMESTAMP_FORMAT,
};

/// Date format used in the display table
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Storage column and display header, in display order
pub const DISPLAY_COLUMNS: [(&str, &str); 7] = [
    (COL_TIMESTAMP, "Fecha"),
    (COL_AREA, "Área"),
    (COL_GROUPING, "Agrupación"),
    (COL_OBJECTIVE, "Objetivo"),
    (COL_INDICATOR, "Indicador"),
    (COL_RESPONSIBLE, "Responsable"),
    (COL_STATUS, "Estado"),
];

/// Equality filters; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveFilter {
    pub area: Option<String>,
    pub status: Option<String>,
    pub responsible: Option<String>,
}

impl ObjectiveFilter {
    pub fn is_empty(&self) -> bool {
        self.area.is_none() && self.status.is_none() && self.responsible.is_none()
    }

    fn predicates(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (COL_AREA, self.area.as_deref()),
            (COL_STATUS, self.status.as_deref()),
            (COL_RESPONSIBLE, self.responsible.as_deref()),
        ]
    }

    pub fn matches(&self, table: &ObjectiveTable, record: &ObjectiveRecord) -> bool {
        self.predicates().iter().all(|(column, wanted)| match wanted {
            Some(wanted) if table.has_column(column) => record.field(column) == Some(*wanted),
            _ => true,
        })
    }

    /// Matching records in their original order; predicates on absent columns are ignored
    pub fn apply(&self, table: &ObjectiveTable) -> ObjectiveTable {
        let records = table
            .records
            .iter()
            .filter(|r| self.matches(table, r))
            .cloned()
            .collect();
        ObjectiveTable::new(table.columns.clone(), records)
    }
}

/// Distinct values offered by each filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub areas: Vec<String>,
    pub statuses: Vec<String>,
    pub responsibles: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &ObjectiveTable) -> Self {
        let distinct = |column: &str| -> Vec<String> {
            if !table.has_column(column) {
                return Vec::new();
            }
            table
                .records
                .iter()
                .filter_map(|r| r.field(column))
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        Self {
            areas: distinct(COL_AREA),
            statuses: distinct(COL_STATUS),
            responsibles: distinct(COL_RESPONSIBLE),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub areas: usize,
    pub responsibles: usize,
    pub active: usize,
}

impl Summary {
    pub fn from_table(table: &ObjectiveTable) -> Self {
        let distinct = |column: &str| {
            if !table.has_column(column) {
                return 0;
            }
            table
                .records
                .iter()
                .filter_map(|r| r.field(column))
                .collect::<BTreeSet<_>>()
                .len()
        };

        let active = if table.has_column(COL_STATUS) {
            table.records.iter().filter(|r| r.status == ACTIVE_STATUS).count()
        } else {
            table.len()
        };

        Self {
            total: table.len(),
            areas: distinct(COL_AREA),
            responsibles: distinct(COL_RESPONSIBLE),
            active,
        }
    }
}

/// Display-ready projection of an objective table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    pub fn project(table: &ObjectiveTable) -> Self {
        let columns: Vec<(&str, &str)> = DISPLAY_COLUMNS
            .iter()
            .copied()
            .filter(|(column, _)| table.has_column(column))
            .collect();

        let reformat_dates = table.has_column(COL_TIMESTAMP)
            && table
                .records
                .iter()
                .all(|r| parse_timestamp(&r.timestamp).is_some());

        let rows = table
            .records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|(column, _)| {
                        let value = record.field(column).unwrap_or_default();
                        if *column == COL_TIMESTAMP && reformat_dates {
                            format_display_date(value)
                        } else {
                            value.to_string()
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            headers: columns.iter().map(|(_, header)| header.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Timestamp formats found in sheets edited by hand
const LENIENT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(LENIENT_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn format_display_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(area: &str, status: &str, responsible: &str, timestamp: &str) -> ObjectiveRecord {
        ObjectiveRecord {
            entry_id: "abcd1234".into(),
            timestamp: timestamp.into(),
            area: area.into(),
            grouping: "G".into(),
            objective: format!("{} objective", area),
            indicator: "I".into(),
            responsible: responsible.into(),
            status: status.into(),
            status_changed_at: timestamp.into(),
        }
    }

    fn sample() -> ObjectiveTable {
        ObjectiveTable::with_all_columns(vec![
            record("HACIENDA", "ACTIVO", "Ana", "2024-03-01 10:00:00"),
            record("URBANISMO", "ACTIVO", "Luis", "2024-02-01 10:00:00"),
            record("HACIENDA", "CERRADO", "Ana", "2024-01-01 10:00:00"),
            record("HACIENDA", "ACTIVO", "Luis", "2023-12-01 10:00:00"),
        ])
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let table = sample();
        assert_eq!(ObjectiveFilter::default().apply(&table).records, table.records);
    }

    #[test]
    fn test_filters_are_a_conjunction() {
        let table = sample();
        let filter = ObjectiveFilter {
            area: Some("HACIENDA".into()),
            status: Some("ACTIVO".into()),
            responsible: None,
        };

        let filtered = filter.apply(&table);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records[0], table.records[0]);
        assert_eq!(filtered.records[1], table.records[3]);

        let narrower = ObjectiveFilter {
            responsible: Some("Luis".into()),
            ..filter
        };
        assert_eq!(narrower.apply(&table).records, vec![table.records[3].clone()]);
    }

    #[test]
    fn test_filter_on_missing_column_is_ignored() {
        let mut table = sample();
        table.columns.retain(|c| c != COL_STATUS);

        let filter = ObjectiveFilter {
            status: Some("CERRADO".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&table).len(), 4);
    }

    #[test]
    fn test_filter_options_are_sorted_and_unique() {
        let options = FilterOptions::from_table(&sample());
        assert_eq!(options.areas, vec!["HACIENDA", "URBANISMO"]);
        assert_eq!(options.statuses, vec!["ACTIVO", "CERRADO"]);
        assert_eq!(options.responsibles, vec!["Ana", "Luis"]);
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_table(&sample());
        assert_eq!(
            summary,
            Summary {
                total: 4,
                areas: 2,
                responsibles: 2,
                active: 3
            }
        );

        let mut without_status = sample();
        without_status.columns.retain(|c| c != COL_STATUS);
        assert_eq!(Summary::from_table(&without_status).active, 4);
    }

    #[test]
    fn test_projection_formats_dates() {
        let display = DisplayTable::project(&sample());
        assert_eq!(
            display.headers,
            vec!["Fecha", "Área", "Agrupación", "Objetivo", "Indicador", "Responsable", "Estado"]
        );
        assert_eq!(display.rows[0][0], "01/03/2024 10:00");
        assert_eq!(display.rows[0][6], "ACTIVO");
    }

    #[test]
    fn test_projection_accepts_hand_edited_dates() {
        let mut table = sample();
        table.records[1].timestamp = "2024-02-01 09:15".into();
        table.records[2].timestamp = "2024-01-01".into();
        table.records[3].timestamp = "2023-12-01T08:00:00".into();

        let display = DisplayTable::project(&table);
        assert_eq!(display.rows[0][0], "01/03/2024 10:00");
        assert_eq!(display.rows[1][0], "01/02/2024 09:15");
        assert_eq!(display.rows[2][0], "01/01/2024 00:00");
        assert_eq!(display.rows[3][0], "01/12/2023 08:00");
    }

    #[test]
    fn test_projection_keeps_dates_when_any_is_unparseable() {
        let mut table = sample();
        table.records[1].timestamp = "yesterday".into();

        let display = DisplayTable::project(&table);
        assert_eq!(display.rows[0][0], "2024-03-01 10:00:00");
        assert_eq!(display.rows[1][0], "yesterday");
    }

    #[test]
    fn test_projection_skips_absent_columns() {
        let mut table = sample();
        table.columns = vec![COL_AREA.into(), COL_OBJECTIVE.into()];

        let display = DisplayTable::project(&table);
        assert_eq!(display.headers, vec!["Área", "Objetivo"]);
        assert_eq!(display.rows[0], vec!["HACIENDA", "HACIENDA objective"]);
    }
}
