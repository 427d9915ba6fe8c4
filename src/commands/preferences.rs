use super::CommandError;
use crate::db::AppState;
use crate::models::{Preferences, PreferencesUpdate};
use crate::store;

/// Longest chart window a user may pick, one hundred years
pub const MAX_TIME_RANGE_DAYS: i64 = 36_525;

pub async fn get_preferences(state: &AppState) -> Result<Preferences, CommandError> {
  Ok(store::load_preferences(&state.db).await?)
}

/// Apply a partial update and return the stored result
pub async fn update_preferences(state: &AppState, update: PreferencesUpdate) -> Result<Preferences, CommandError> {
  if let Some(Some(days)) = update.time_range_days {
    if days <= 0 {
      return Err(CommandError::InvalidInput(format!("time range must be positive, got {}", days)));
    }
    if days > MAX_TIME_RANGE_DAYS {
      return Err(CommandError::InvalidInput(format!(
        "time range must be at most {} days, got {}",
        MAX_TIME_RANGE_DAYS, days
      )));
    }
  }

  let prefs = store::load_preferences(&state.db).await?.apply(update);
  store::save_preferences(&state.db, &prefs).await?;

  tracing::info!(formula = %prefs.e1rm_formula, unit = %prefs.preferred_unit, "preferences updated");
  Ok(prefs)
}
