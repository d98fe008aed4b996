use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Non-success response from the Sheets API
#[derive(Debug, Clone)]
pub struct SheetsApiError {
    pub status: u16,
    pub body: String,
}

impl fmt::Display for SheetsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sheets API returned HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for SheetsApiError {}

#[derive(Debug, Deserialize)]
struct SpreadsheetInfo {
    #[serde(default)]
    sheets: Vec<SheetInfo>,
}

#[derive(Debug, Deserialize)]
struct SheetInfo {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Google Sheets v4 REST client bound to one spreadsheet
pub struct SheetsClient {
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
    http_client: reqwest::Client,
}

impl SheetsClient {
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("objectives-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            http_client,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    fn values_url(&self, title: &str) -> String {
        // Quoted A1 range covering the whole sheet
        let range = format!("'{}'", title.replace('\'', "''"));
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(&range)
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SheetsApiError {
            status: status.as_u16(),
            body,
        }
        .into())
    }

    pub async fn sheet_titles(&self) -> Result<Vec<String>> {
        let url = format!("{}?fields=sheets.properties.title", self.spreadsheet_url());
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let info: SpreadsheetInfo = Self::check(response).await?.json().await?;

        Ok(info.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    pub async fn add_sheet(&self, title: &str, rows: u32, cols: u32) -> Result<()> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        debug!("POST {} (addSheet '{}')", url, title);

        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn get_values(&self, title: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(title);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let range: ValueRange = Self::check(response).await?.json().await?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    pub async fn append_row(&self, title: &str, row: &[String]) -> Result<()> {
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url(title)
        );
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
