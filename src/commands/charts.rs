use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::records::{lift_highlight, LiftHighlight};
use super::CommandError;
use crate::aggregate::{build_chart_series, ChartConfig, ChartSeries};
use crate::db::AppState;
use crate::estimator::E1rmFormula;
use crate::models::UnitType;
use crate::records::{big_four_present, lift_type_frequencies, LiftTypeFrequency};
use crate::stats::{
  consistency_grades, session_count, session_momentum, tonnage, weekly_streak, year_recap, ConsistencyGrade,
  DateRange, SessionMomentum, WeeklyStreak, YearRecap,
};
use crate::store;

/// ---------------------------------------------------------------------------
/// Chart Series
/// ---------------------------------------------------------------------------

/// e1RM series for the stored snapshot under the stored preferences.
/// `today` anchors the preferred time range and comes from the caller's clock.
pub async fn get_chart_series(state: &AppState, today: NaiveDate) -> Result<ChartSeries, CommandError> {
  let records = store::load_records(&state.db).await?;
  let prefs = store::load_preferences(&state.db).await?;
  let config = ChartConfig::from_preferences(&prefs, today);
  Ok(build_chart_series(&records, &config))
}

/// ---------------------------------------------------------------------------
/// Dashboard
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub unit: UnitType,
  pub formula: E1rmFormula,
  pub session_count: usize,
  pub lift_frequencies: Vec<LiftTypeFrequency>,
  pub weekly_streak: WeeklyStreak,
  pub momentum: SessionMomentum,
  pub consistency: Vec<ConsistencyGrade>,
  pub tonnage_all_time: f64,
  /// Trailing 365 days
  pub tonnage_past_year: f64,
  /// Big Four lifts present in the data, canonical order
  pub big_four: Vec<LiftHighlight>,
  pub year_recap: YearRecap,
}

pub async fn get_dashboard(state: &AppState, today: NaiveDate) -> Result<Dashboard, CommandError> {
  let records = store::load_records(&state.db).await?;
  let prefs = store::load_preferences(&state.db).await?;
  let unit = prefs.preferred_unit;

  let past_year = DateRange::new(today - Duration::days(365), today);

  let big_four = big_four_present(&records)
    .into_iter()
    .map(|lift| lift_highlight(&records, lift, &prefs))
    .collect();

  Ok(Dashboard {
    unit,
    formula: prefs.e1rm_formula,
    session_count: session_count(&records, None),
    lift_frequencies: lift_type_frequencies(&records),
    weekly_streak: weekly_streak(&records, today),
    momentum: session_momentum(&records, today),
    consistency: consistency_grades(&records, today),
    tonnage_all_time: tonnage(&records, None, unit),
    tonnage_past_year: tonnage(&records, Some(past_year), unit),
    big_four,
    year_recap: year_recap(&records, today.year(), unit, prefs.e1rm_formula),
  })
}
