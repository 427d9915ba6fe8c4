use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Invalid Sheets URL: {0}")]
  InvalidUrl(String),

  #[error("Not authenticated with Google Sheets")]
  NotAuthenticated,

  #[error("Spreadsheet or range not found: {0}")]
  NotFound(String),

  #[error("Sheets API error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("Failed to parse Sheets response: {0}")]
  Parse(String),
}

impl Serialize for SheetsError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// API Data Structures
/// ---------------------------------------------------------------------------

/// Body of `spreadsheets.values.get`
#[derive(Debug, Deserialize)]
struct ValueRange {
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

/// Cells arrive as JSON scalars; the parser only deals in text
fn cell_to_string(value: Value) -> String {
  match value {
    Value::String(s) => s,
    Value::Null => String::new(),
    other => other.to_string(),
  }
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SheetsClient {
  base_url: String,
  http: Client,
}

impl SheetsClient {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      base_url: base_url.into(),
      http: Client::new(),
    }
  }

  fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetsError> {
    let mut url = Url::parse(&self.base_url).map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
    url
      .path_segments_mut()
      .map_err(|_| SheetsError::InvalidUrl(self.base_url.clone()))?
      .pop_if_empty()
      .extend(["spreadsheets", spreadsheet_id, "values", range]);
    Ok(url)
  }

  /// Fetch a range as a grid of strings. Row 0 is the header row.
  pub async fn fetch_grid(
    &self,
    access_token: &str,
    spreadsheet_id: &str,
    range: &str,
  ) -> Result<Vec<Vec<String>>, SheetsError> {
    let url = self.values_url(spreadsheet_id, range)?;

    let response = self
      .http
      .get(url)
      .header("Authorization", format!("Bearer {}", access_token))
      .send()
      .await?;

    match response.status() {
      StatusCode::UNAUTHORIZED => return Err(SheetsError::NotAuthenticated),
      StatusCode::NOT_FOUND => {
        return Err(SheetsError::NotFound(format!("{}/{}", spreadsheet_id, range)));
      }
      status if !status.is_success() => {
        let message = response.text().await.unwrap_or_default();
        return Err(SheetsError::Api {
          status: status.as_u16(),
          message,
        });
      }
      _ => {}
    }

    let body = response.text().await?;
    let value_range: ValueRange = serde_json::from_str(&body).map_err(|e| {
      tracing::warn!(error = %e, "unexpected Sheets response body");
      SheetsError::Parse(e.to_string())
    })?;

    let grid: Vec<Vec<String>> = value_range
      .values
      .into_iter()
      .map(|row| row.into_iter().map(cell_to_string).collect())
      .collect();

    tracing::info!(spreadsheet_id, range, rows = grid.len(), "fetched sheet grid");
    Ok(grid)
  }
}
