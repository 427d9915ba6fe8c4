use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pounds per kilogram, used for every unit conversion in the crate
pub const LB_PER_KG: f64 = 2.2046;

/// The four barbell lifts that get dedicated aggregate treatment
pub const BIG_FOUR: [&str; 4] = ["Back Squat", "Bench Press", "Deadlift", "Strict Press"];

pub fn is_big_four(lift_type: &str) -> bool {
  BIG_FOUR.contains(&lift_type)
}

/// ---------------------------------------------------------------------------
/// Unit Type
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
  #[default]
  Lb,
  Kg,
}

impl UnitType {
  pub fn as_str(&self) -> &'static str {
    match self {
      UnitType::Lb => "lb",
      UnitType::Kg => "kg",
    }
  }

  /// Convert a weight expressed in `self` into `target`
  pub fn convert(&self, weight: f64, target: UnitType) -> f64 {
    match (self, target) {
      (UnitType::Kg, UnitType::Lb) => weight * LB_PER_KG,
      (UnitType::Lb, UnitType::Kg) => weight / LB_PER_KG,
      _ => weight,
    }
  }
}

impl std::fmt::Display for UnitType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for UnitType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "lb" | "lbs" | "pound" | "pounds" => Ok(Self::Lb),
      "kg" | "kgs" | "kilo" | "kilos" => Ok(Self::Kg),
      other => Err(format!("Unknown unit type: {}", other)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Lift Record: one performed (or goal) set
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftRecord {
  pub date: NaiveDate,
  pub lift_type: String,
  pub reps: u32,
  pub weight: f64,
  #[serde(default)]
  pub unit_type: UnitType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default)]
  pub is_goal: bool,
}

impl LiftRecord {
  pub fn new(date: NaiveDate, lift_type: impl Into<String>, reps: u32, weight: f64, unit_type: UnitType) -> Self {
    Self {
      date,
      lift_type: lift_type.into(),
      reps,
      weight,
      unit_type,
      notes: None,
      url: None,
      is_goal: false,
    }
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    let notes = notes.into();
    self.notes = if notes.is_empty() { None } else { Some(notes) };
    self
  }

  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    let url = url.into();
    self.url = if url.is_empty() { None } else { Some(url) };
    self
  }

  pub fn as_goal(mut self) -> Self {
    self.is_goal = true;
    self
  }

  /// Whether the record satisfies the invariants every parser must uphold
  pub fn is_valid(&self) -> bool {
    self.reps > 0 && self.weight.is_finite() && self.weight > 0.0 && !self.lift_type.trim().is_empty()
  }

  /// Weight converted into `unit` at full precision
  pub fn weight_in(&self, unit: UnitType) -> f64 {
    self.unit_type.convert(self.weight, unit)
  }

  /// Volume of this set (weight x reps) in `unit`
  pub fn tonnage_in(&self, unit: UnitType) -> f64 {
    self.weight_in(unit) * self.reps as f64
  }
}
