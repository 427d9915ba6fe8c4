use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping for the last import of raw rows from a data source
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
  pub id: i64,
  pub source: String,
  pub last_sync_at: Option<DateTime<Utc>>,
  pub schema: Option<String>,
  pub record_count: i64,
  pub skipped_rows: i64,
}
