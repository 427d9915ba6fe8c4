pub mod charts;
pub mod preferences;
pub mod records;
pub mod sync;

use serde::Serialize;

use crate::db::AppState;
use crate::models::{LiftRecord, SyncState};
use crate::sheets::SheetsError;
use crate::store::{self, StoreError};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  #[error(transparent)]
  Sheets(#[from] SheetsError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("Invalid input: {0}")]
  InvalidInput(String),
}

impl Serialize for CommandError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Snapshot Queries
/// ---------------------------------------------------------------------------

/// Every stored record, in source order
pub async fn get_records(state: &AppState) -> Result<Vec<LiftRecord>, CommandError> {
  Ok(store::load_records(&state.db).await?)
}

pub async fn get_sync_state(state: &AppState) -> Result<Vec<SyncState>, CommandError> {
  Ok(store::list_sync_states(&state.db).await?)
}
