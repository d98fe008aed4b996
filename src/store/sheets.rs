use anyhow::Result;
use async_trait::async_trait;

use super::SheetBackend;
use crate::api::SheetsClient;

/// Remote Google spreadsheet
pub struct SheetsBackend {
    client: SheetsClient,
}

impl SheetsBackend {
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SheetBackend for SheetsBackend {
    fn describe(&self) -> String {
        format!("Google spreadsheet {}", self.client.spreadsheet_id())
    }

    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        self.client.sheet_titles().await
    }

    async fn add_worksheet(&self, title: &str, rows: u32, cols: u32) -> Result<()> {
        self.client.add_sheet(title, rows, cols).await
    }

    async fn read_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        self.client.get_values(title).await
    }

    async fn append_row(&self, title: &str, row: &[String]) -> Result<()> {
        self.client.append_row(title, row).await
    }
}
