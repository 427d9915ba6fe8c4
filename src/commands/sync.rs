use serde::Serialize;

use super::CommandError;
use crate::db::AppState;
use crate::models::SyncState;
use crate::parser::{parse_rows_with, SheetSchema};
use crate::store;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
  pub schema: SheetSchema,
  pub record_count: usize,
  pub skipped_rows: usize,
  pub sync_state: SyncState,
}

/// ---------------------------------------------------------------------------
/// Sync from Google Sheets
/// ---------------------------------------------------------------------------

/// Fetch `range` of a spreadsheet and replace the stored snapshot with it.
/// The caller owns the OAuth flow and passes a current access token.
pub async fn sync_sheet(
  state: &AppState,
  access_token: &str,
  spreadsheet_id: &str,
  range: &str,
) -> Result<SyncSummary, CommandError> {
  if spreadsheet_id.trim().is_empty() {
    return Err(CommandError::InvalidInput("spreadsheet id is empty".into()));
  }

  let rows = state.sheets.fetch_grid(access_token, spreadsheet_id, range).await?;
  import_grid(state, spreadsheet_id, &rows).await
}

/// ---------------------------------------------------------------------------
/// Import a Raw Grid
/// ---------------------------------------------------------------------------

/// Parse a grid once and store the result as the new snapshot
pub async fn import_grid(state: &AppState, source: &str, rows: &[Vec<String>]) -> Result<SyncSummary, CommandError> {
  let outcome = parse_rows_with(rows, &state.config.parse_options());

  let sync_state = store::replace_snapshot(&state.db, source, &outcome).await?;

  tracing::info!(
    source,
    schema = %outcome.schema,
    records = outcome.records.len(),
    skipped = outcome.skipped_rows,
    "import complete"
  );

  Ok(SyncSummary {
    schema: outcome.schema,
    record_count: outcome.records.len(),
    skipped_rows: outcome.skipped_rows,
    sync_state,
  })
}
