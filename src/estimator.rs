//! One-rep-max estimation
//!
//! Seven interchangeable closed-form formulas map a submaximal set
//! (reps x weight) to an estimated single-rep maximum, and back again for
//! rep projections. Every result is rounded to the nearest whole unit.
//!
//! Invalid input never panics: the `try_*` functions return `None`, and the
//! plain functions log a diagnostic and return the sentinel `0.0`, which
//! callers treat as "unknown".

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
/// Formula selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum E1rmFormula {
    Epley,
    McGlothin,
    Lombardi,
    Mayhew,
    OConner,
    Wathen,
    /// System-wide default
    #[default]
    Brzycki,
}

impl E1rmFormula {
    pub const ALL: [E1rmFormula; 7] = [
        E1rmFormula::Epley,
        E1rmFormula::McGlothin,
        E1rmFormula::Lombardi,
        E1rmFormula::Mayhew,
        E1rmFormula::OConner,
        E1rmFormula::Wathen,
        E1rmFormula::Brzycki,
    ];

    /// Resolve a formula by display name. Unknown names resolve to Brzycki.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "epley" => Self::Epley,
            "mcglothin" => Self::McGlothin,
            "lombardi" => Self::Lombardi,
            "mayhew" => Self::Mayhew,
            "oconner" | "oconnor" => Self::OConner,
            "wathen" => Self::Wathen,
            _ => Self::Brzycki,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epley => "Epley",
            Self::McGlothin => "McGlothin",
            Self::Lombardi => "Lombardi",
            Self::Mayhew => "Mayhew",
            Self::OConner => "O'Conner",
            Self::Wathen => "Wathen",
            Self::Brzycki => "Brzycki",
        }
    }

    /// Unrounded estimate for reps > 1. None when the formula's denominator
    /// is non-positive at this rep count.
    fn raw_estimate(&self, reps: f64, weight: f64) -> Option<f64> {
        let estimate = match self {
            Self::Epley => weight * (1.0 + reps / 30.0),
            Self::McGlothin => positive(101.3 - 2.67123 * reps).map(|d| 100.0 * weight / d)?,
            Self::Lombardi => weight * reps.powf(0.1),
            Self::Mayhew => 100.0 * weight / (52.2 + 41.9 * (-0.055 * reps).exp()),
            Self::OConner => weight * (1.0 + reps / 40.0),
            Self::Wathen => 100.0 * weight / (48.8 + 53.8 * (-0.075 * reps).exp()),
            Self::Brzycki => positive(1.0278 - 0.0278 * reps).map(|d| weight / d)?,
        };
        Some(estimate)
    }

    /// Each formula solved for weight given a target e1RM
    fn raw_inverse(&self, reps: f64, e1rm: f64) -> f64 {
        match self {
            Self::Epley => e1rm / (1.0 + reps / 30.0),
            Self::McGlothin => e1rm * (101.3 - 2.67123 * reps) / 100.0,
            Self::Lombardi => e1rm / reps.powf(0.1),
            Self::Mayhew => e1rm * (52.2 + 41.9 * (-0.055 * reps).exp()) / 100.0,
            Self::OConner => e1rm / (1.0 + reps / 40.0),
            Self::Wathen => e1rm * (48.8 + 53.8 * (-0.075 * reps).exp()) / 100.0,
            Self::Brzycki => e1rm * (1.0278 - 0.0278 * reps),
        }
    }
}

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

impl std::fmt::Display for E1rmFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for E1rmFormula {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<E1rmFormula> for String {
    fn from(formula: E1rmFormula) -> Self {
        formula.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
/// Estimation
// ---------------------------------------------------------------------------

/// Estimated one-rep max, or None for input the formulas cannot handle
pub fn try_estimate_e1rm(reps: u32, weight: f64, formula: E1rmFormula) -> Option<f64> {
    match reps {
        0 => None,
        1 => Some(weight),
        _ if !weight.is_finite() || weight <= 0.0 => None,
        _ => formula.raw_estimate(reps as f64, weight).map(f64::round),
    }
}

/// Estimated one-rep max. Returns 0 and logs an error for invalid input.
pub fn estimate_e1rm(reps: u32, weight: f64, formula: E1rmFormula) -> f64 {
    try_estimate_e1rm(reps, weight, formula).unwrap_or_else(|| {
        tracing::error!(reps, weight, formula = %formula, "cannot estimate e1RM, returning 0");
        0.0
    })
}

/// Collaborator entry point taking the formula by name
pub fn estimate_e1rm_by_name(reps: u32, weight: f64, formula_name: &str) -> f64 {
    estimate_e1rm(reps, weight, E1rmFormula::from_name(formula_name))
}

/// Weight expected to be achievable for `target_reps` given a known max
pub fn try_estimate_weight_for_reps(e1rm: f64, target_reps: u32, formula: E1rmFormula) -> Option<f64> {
    match target_reps {
        0 => None,
        1 => Some(e1rm),
        _ if !e1rm.is_finite() || e1rm <= 0.0 => None,
        _ => positive(formula.raw_inverse(target_reps as f64, e1rm)).map(f64::round),
    }
}

/// Projected weight for `target_reps`. Returns 0 and logs an error for invalid input.
pub fn estimate_weight_for_reps(e1rm: f64, target_reps: u32, formula: E1rmFormula) -> f64 {
    try_estimate_weight_for_reps(e1rm, target_reps, formula).unwrap_or_else(|| {
        tracing::error!(e1rm, target_reps, formula = %formula, "cannot project weight, returning 0");
        0.0
    })
}

// ---------------------------------------------------------------------------
/// Rep projection table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepProjection {
    pub reps: u32,
    pub weight: f64,
    /// Projected weight as a whole percentage of the e1RM
    pub percent_of_max: f64,
}

/// Projected weights for 1..=max_reps. Rep counts the formula cannot
/// project are left out.
pub fn rep_projection_table(e1rm: f64, formula: E1rmFormula, max_reps: u32) -> Vec<RepProjection> {
    if !e1rm.is_finite() || e1rm <= 0.0 {
        return Vec::new();
    }
    (1..=max_reps)
        .filter_map(|reps| {
            let weight = try_estimate_weight_for_reps(e1rm, reps, formula)?;
            Some(RepProjection {
                reps,
                weight,
                percent_of_max: (weight / e1rm * 100.0).round(),
            })
        })
        .collect()
}
