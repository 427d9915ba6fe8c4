use serde::{Deserialize, Serialize};

use crate::estimator::E1rmFormula;
use crate::models::UnitType;

/// User preferences supplied by the UI layer. Every field is optional on the
/// wire and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
  /// Empty means "all lift types"
  pub selected_lift_types: Vec<String>,
  pub e1rm_formula: E1rmFormula,
  pub preferred_unit: UnitType,
  /// Trailing window shown on charts; None shows the full history
  pub time_range_days: Option<i64>,
  pub decimate: bool,
}

impl Default for Preferences {
  fn default() -> Self {
    Self {
      selected_lift_types: Vec::new(),
      e1rm_formula: E1rmFormula::default(),
      preferred_unit: UnitType::default(),
      time_range_days: None,
      decimate: true,
    }
  }
}

/// Partial update; None leaves the stored value untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesUpdate {
  pub selected_lift_types: Option<Vec<String>>,
  pub e1rm_formula: Option<E1rmFormula>,
  pub preferred_unit: Option<UnitType>,
  pub time_range_days: Option<Option<i64>>,
  pub decimate: Option<bool>,
}

impl Preferences {
  pub fn apply(mut self, update: PreferencesUpdate) -> Self {
    if let Some(lifts) = update.selected_lift_types {
      self.selected_lift_types = lifts;
    }
    if let Some(formula) = update.e1rm_formula {
      self.e1rm_formula = formula;
    }
    if let Some(unit) = update.preferred_unit {
      self.preferred_unit = unit;
    }
    if let Some(days) = update.time_range_days {
      self.time_range_days = days;
    }
    if let Some(decimate) = update.decimate {
      self.decimate = decimate;
    }
    self
  }
}
