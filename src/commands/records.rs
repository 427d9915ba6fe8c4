use serde::Serialize;

use super::CommandError;
use crate::db::AppState;
use crate::estimator::{rep_projection_table, try_estimate_e1rm, RepProjection};
use crate::models::{LiftRecord, Preferences};
use crate::records::{lift_prs, LiftPrs};
use crate::store;

/// Rep counts covered by the projection table
pub const PROJECTION_MAX_REPS: u32 = 10;

/// PR leaderboards plus the best estimated max for one lift type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftHighlight {
  pub lift_type: String,
  pub prs: LiftPrs,
  /// Best e1RM ever, in the preferred unit
  pub best_e1rm: Option<f64>,
  pub projections: Vec<RepProjection>,
}

pub(crate) fn lift_highlight(records: &[LiftRecord], lift_type: &str, prefs: &Preferences) -> LiftHighlight {
  let best_e1rm = records
    .iter()
    .filter(|r| !r.is_goal && r.lift_type == lift_type)
    .filter_map(|r| try_estimate_e1rm(r.reps, r.weight_in(prefs.preferred_unit), prefs.e1rm_formula))
    .reduce(f64::max);

  let projections = best_e1rm
    .map(|e1rm| rep_projection_table(e1rm, prefs.e1rm_formula, PROJECTION_MAX_REPS))
    .unwrap_or_default();

  LiftHighlight {
    lift_type: lift_type.to_string(),
    prs: lift_prs(records, lift_type),
    best_e1rm,
    projections,
  }
}

pub async fn get_lift_prs(state: &AppState, lift_type: &str) -> Result<LiftHighlight, CommandError> {
  if lift_type.trim().is_empty() {
    return Err(CommandError::InvalidInput("lift type is empty".into()));
  }
  let records = store::load_records(&state.db).await?;
  let prefs = store::load_preferences(&state.db).await?;
  Ok(lift_highlight(&records, lift_type, &prefs))
}
