//! Chart series builder
//!
//! Reduces the record list to the best estimated max per (date, lift type)
//! and optionally thins the result to weekly bests so long histories stay
//! legible. Pure function of (records, config); a refresh is just another
//! call with the new record list.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::estimator::{try_estimate_e1rm, E1rmFormula};
use crate::models::{LiftRecord, Preferences, UnitType};

/// Points closer than this to the last shown point are decimation candidates
pub const DECIMATION_WINDOW_DAYS: i64 = 7;
/// A candidate inside the window survives only if it beats the last shown point by more than this
pub const DECIMATION_THRESHOLD: f64 = 0.05;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
  /// None includes every lift type
  pub selected_lift_types: Option<BTreeSet<String>>,
  pub e1rm_formula: E1rmFormula,
  /// Records dated before this are excluded
  pub start_date_threshold: Option<NaiveDate>,
  /// Weekly-best decimation
  pub decimate: bool,
  /// Unit every e1RM and axis bound is expressed in
  pub unit: UnitType,
}

/// First date of a trailing window; a window too large for the calendar has no start
fn range_start(today: NaiveDate, days: i64) -> Option<NaiveDate> {
  today.checked_sub_signed(Duration::try_days(days)?)
}

impl ChartConfig {
  pub fn from_preferences(prefs: &Preferences, today: NaiveDate) -> Self {
    let selected_lift_types = if prefs.selected_lift_types.is_empty() {
      None
    } else {
      Some(prefs.selected_lift_types.iter().cloned().collect())
    };
    Self {
      selected_lift_types,
      e1rm_formula: prefs.e1rm_formula,
      start_date_threshold: prefs.time_range_days.and_then(|days| range_start(today, days)),
      decimate: prefs.decimate,
      unit: prefs.preferred_unit,
    }
  }

  fn includes(&self, record: &LiftRecord) -> bool {
    if record.is_goal {
      return false;
    }
    if self.start_date_threshold.is_some_and(|threshold| record.date < threshold) {
      return false;
    }
    self
      .selected_lift_types
      .as_ref()
      .map_or(true, |selected| selected.contains(&record.lift_type))
  }
}

/// ---------------------------------------------------------------------------
/// Output
/// ---------------------------------------------------------------------------

/// Best set of one lift type on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
  pub date: NaiveDate,
  pub lift_type: String,
  pub e1rm: f64,
  pub reps: u32,
  pub weight: f64,
  pub unit_type: UnitType,
  /// Tooltip text such as "5@225lb"
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
}

impl SeriesPoint {
  fn from_record(record: &LiftRecord, e1rm: f64) -> Self {
    Self {
      date: record.date,
      lift_type: record.lift_type.clone(),
      e1rm,
      reps: record.reps,
      weight: record.weight,
      unit_type: record.unit_type,
      label: Some(format!("{}@{}{}", record.reps, record.weight, record.unit_type)),
      url: record.url.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftSeries {
  pub lift_type: String,
  /// Ascending by date
  pub points: Vec<SeriesPoint>,
}

/// Date-major view: one row per date with the winning point of each lift type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRow {
  pub date: NaiveDate,
  pub lifts: BTreeMap<String, SeriesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
  pub series: Vec<LiftSeries>,
  /// Highest e1RM over the filtered records, in the config unit
  pub weight_max: f64,
  /// Lowest set weight over the filtered records, in the config unit
  pub weight_min: f64,
}

impl ChartSeries {
  pub fn is_empty(&self) -> bool {
    self.series.is_empty()
  }

  pub fn lift(&self, lift_type: &str) -> Option<&LiftSeries> {
    self.series.iter().find(|s| s.lift_type == lift_type)
  }

  pub fn by_date(&self) -> Vec<DateRow> {
    let mut rows: BTreeMap<NaiveDate, BTreeMap<String, SeriesPoint>> = BTreeMap::new();
    for point in self.series.iter().flat_map(|s| &s.points) {
      rows
        .entry(point.date)
        .or_default()
        .insert(point.lift_type.clone(), point.clone());
    }
    rows
      .into_iter()
      .map(|(date, lifts)| DateRow { date, lifts })
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Series Builder
/// ---------------------------------------------------------------------------

pub fn build_chart_series(records: &[LiftRecord], config: &ChartConfig) -> ChartSeries {
  // The newest session is never decimated away
  let latest_date = records.iter().filter(|r| !r.is_goal).map(|r| r.date).max();

  let mut best: BTreeMap<NaiveDate, BTreeMap<&str, (&LiftRecord, f64)>> = BTreeMap::new();
  let mut weight_max: Option<f64> = None;
  let mut weight_min: Option<f64> = None;

  for record in records.iter().filter(|r| config.includes(r)) {
    let weight = record.weight_in(config.unit);
    let Some(e1rm) = try_estimate_e1rm(record.reps, weight, config.e1rm_formula) else {
      continue;
    };
    weight_max = Some(weight_max.map_or(e1rm, |max| max.max(e1rm)));
    weight_min = Some(weight_min.map_or(weight, |min| min.min(weight)));

    // Strictly greater replaces, so the first record seen wins a tie
    let by_lift = best.entry(record.date).or_default();
    let improves = by_lift
      .get(record.lift_type.as_str())
      .map_or(true, |(_, current)| e1rm > *current);
    if improves {
      by_lift.insert(record.lift_type.as_str(), (record, e1rm));
    }
  }

  let mut series: BTreeMap<&str, Vec<SeriesPoint>> = BTreeMap::new();
  let mut last_shown: HashMap<&str, (NaiveDate, f64)> = HashMap::new();

  for (date, lifts) in &best {
    for (lift_type, (record, e1rm)) in lifts {
      if config.decimate && Some(*date) != latest_date {
        if let Some((last_date, last_e1rm)) = last_shown.get(lift_type) {
          let within_window = (*date - *last_date).num_days() < DECIMATION_WINDOW_DAYS;
          let insignificant = *e1rm <= last_e1rm * (1.0 + DECIMATION_THRESHOLD);
          if within_window && insignificant {
            continue;
          }
        }
      }
      last_shown.insert(*lift_type, (*date, *e1rm));
      series
        .entry(*lift_type)
        .or_default()
        .push(SeriesPoint::from_record(record, *e1rm));
    }
  }

  ChartSeries {
    series: series
      .into_iter()
      .map(|(lift_type, points)| LiftSeries {
        lift_type: lift_type.to_string(),
        points,
      })
      .collect(),
    weight_max: weight_max.unwrap_or(0.0),
    weight_min: weight_min.unwrap_or(0.0),
  }
}
