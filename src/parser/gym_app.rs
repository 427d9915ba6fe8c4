use std::sync::LazyLock;

use regex::Regex;

use super::{cell, find_column, parse_date, RowParser};
use crate::models::{LiftRecord, UnitType};

pub(super) const SENTINEL_FIRST: &str = "Date";
pub(super) const SENTINEL_DESCRIPTION: &str = "Description";

const DATE_COLUMN: usize = 0;
const WORKOUT_COLUMN: usize = 1;
pub(super) const DESCRIPTION_COLUMN: usize = 3;

/// One set per description line: leading rep count, then a weight directly
/// followed by its unit at the end of the line ("5 x 225 lb", "3 reps @ 100kg")
static SET_LINE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"(?i)^\s*(\d+)\D.*?(\d+(?:\.\d+)?)\s*(kg|lb)s?\b[^0-9a-z]*$").ok()
});

/// Workout names that mark conditioning work rather than strength sets
static CONDITIONING_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"(?i)\b(amrap|emom|wod|for time|tabata|intervals?|conditioning|metcon)\b").ok()
});

/// Parser for gym tracking app exports
pub struct GymAppParser {
  notes: Option<usize>,
}

impl GymAppParser {
  pub fn new(header: &[String]) -> Self {
    Self {
      notes: find_column(header, "Notes"),
    }
  }
}

fn is_conditioning(workout: &str) -> bool {
  CONDITIONING_PATTERN
    .as_ref()
    .is_some_and(|pattern| pattern.is_match(workout))
}

/// (reps, weight, unit) from one description line
fn parse_set_line(line: &str) -> Option<(u32, f64, UnitType)> {
  let captures = SET_LINE_PATTERN.as_ref()?.captures(line)?;
  let reps: u32 = captures.get(1)?.as_str().parse().ok()?;
  let weight: f64 = captures.get(2)?.as_str().parse().ok()?;
  let unit: UnitType = captures.get(3)?.as_str().parse().ok()?;
  if reps == 0 || weight <= 0.0 {
    return None;
  }
  Some((reps, weight, unit))
}

impl RowParser for GymAppParser {
  fn parse_row(&mut self, row: &[String], out: &mut Vec<LiftRecord>) -> usize {
    let workout = cell(row, Some(WORKOUT_COLUMN));
    if workout.is_empty() || is_conditioning(workout) {
      return 0;
    }
    let Some(date) = parse_date(cell(row, Some(DATE_COLUMN))) else {
      return 0;
    };
    let notes = cell(row, self.notes);

    let before = out.len();
    for line in cell(row, Some(DESCRIPTION_COLUMN)).lines() {
      if let Some((reps, weight, unit)) = parse_set_line(line) {
        out.push(LiftRecord::new(date, workout, reps, weight, unit).with_notes(notes));
      }
    }
    out.len() - before
  }
}
