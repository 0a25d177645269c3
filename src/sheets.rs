use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("sheets request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets api returned {status} for {range}: {body}")]
    Status {
        status: u16,
        range: String,
        body: String,
    },

    #[error("invalid sheets url: {0}")]
    InvalidUrl(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Acknowledgement returned by an overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriteAck {
    pub updated_range: Option<String>,
    pub updated_rows: usize,
    pub updated_cells: usize,
}

/// Remote table addressed by A1 ranges.
#[async_trait]
pub trait TabularService: Send + Sync {
    /// Returns the rows of `range` as text. Trailing empty cells may be absent.
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError>;

    /// Overwrites `range` starting at its top-left cell.
    async fn write(&self, range: &str, rows: Vec<Vec<Value>>) -> Result<WriteAck, SheetsError>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Google Sheets v4 `spreadsheets.values` client.
#[derive(Clone)]
pub struct SheetsClient {
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
    client: Client,
}

impl SheetsClient {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            client,
        })
    }

    pub fn values_url(&self, range: &str) -> Result<Url, SheetsError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|err| SheetsError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }
}

async fn check_status(
    response: reqwest::Response,
    range: &str,
) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Status {
        status: status.as_u16(),
        range: range.to_string(),
        body,
    })
}

#[async_trait]
impl TabularService for SheetsClient {
    async fn read(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        tracing::debug!(range, "reading sheet range");
        let response = self
            .client
            .get(self.values_url(range)?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: ValueRange = check_status(response, range).await?.json().await?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    async fn write(&self, range: &str, rows: Vec<Vec<Value>>) -> Result<WriteAck, SheetsError> {
        tracing::debug!(range, rows = rows.len(), "writing sheet range");
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let response = self
            .client
            .put(self.values_url(range)?)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response, range).await?.json().await?)
    }
}

/// Renders a cell the way the sheet displays it.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
