//! Header-keyed views over raw worksheet values

use std::collections::HashMap;

/// Sheet values split into a header row and header-keyed records
#[derive(Debug, Clone, Default)]
pub struct SheetRecords {
    pub headers: Vec<String>,
    pub records: Vec<HashMap<String, String>>,
}

impl SheetRecords {
    /// First row is the header; short rows are padded with empty strings.
    /// Rows whose cells are all blank are dropped.
    pub fn from_values(values: Vec<Vec<String>>) -> Self {
        let mut rows = values.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
            None => return Self::default(),
        };

        let records = rows
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| !h.is_empty())
                    .map(|(i, h)| (h.clone(), row.get(i).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();

        Self { headers, records }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}
