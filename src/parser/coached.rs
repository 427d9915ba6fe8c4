use super::{cell, find_column, is_truthy, parse_date, parse_reps, parse_weight, RowParser};
use crate::models::{LiftRecord, UnitType};

pub(super) const SENTINEL_FIRST: &str = "user_name";
pub(super) const SENTINEL_SECOND: &str = "workout_id";

/// Exercise names rewritten to match the other schemas
/// Largest prescription one row may expand into
const MAX_EXPANDED_SETS: u32 = 100;

const CANONICAL_NAMES: &[(&str, &str)] = &[("Squat", "Back Squat")];

#[derive(Debug, Clone, Default)]
struct Columns {
  workout_id: Option<usize>,
  date: Option<usize>,
  exercise: Option<usize>,
  assigned_sets: Option<usize>,
  assigned_reps: Option<usize>,
  assigned_weight: Option<usize>,
  actual_reps: Option<usize>,
  actual_weight: Option<usize>,
  weight_unit: Option<usize>,
  is_completed: Option<usize>,
  is_missed: Option<usize>,
}

/// Parser for coached program exports.
///
/// Rows are prescriptions; only completed, non-missed ones become records.
/// What the athlete actually did overrides what was prescribed.
pub struct CoachedProgramParser {
  columns: Columns,
  url_template: String,
}

impl CoachedProgramParser {
  pub fn new(header: &[String], url_template: &str) -> Self {
    let columns = Columns {
      workout_id: find_column(header, "workout_id"),
      date: find_column(header, "workout_date"),
      exercise: find_column(header, "exercise_name"),
      assigned_sets: find_column(header, "assigned_sets"),
      assigned_reps: find_column(header, "assigned_reps"),
      assigned_weight: find_column(header, "assigned_weight"),
      actual_reps: find_column(header, "actual_reps"),
      actual_weight: find_column(header, "actual_weight"),
      weight_unit: find_column(header, "weight_unit"),
      is_completed: find_column(header, "is_completed"),
      is_missed: find_column(header, "is_missed"),
    };
    Self {
      columns,
      url_template: url_template.to_string(),
    }
  }

  fn workout_url(&self, workout_id: &str) -> String {
    if workout_id.is_empty() {
      return String::new();
    }
    self.url_template.replace("{workout_id}", workout_id)
  }
}

fn canonical_lift_type(name: &str) -> &str {
  CANONICAL_NAMES
    .iter()
    .find(|(from, _)| *from == name)
    .map(|(_, to)| *to)
    .unwrap_or(name)
}

impl RowParser for CoachedProgramParser {
  fn parse_row(&mut self, row: &[String], out: &mut Vec<LiftRecord>) -> usize {
    let c = &self.columns;

    if !is_truthy(cell(row, c.is_completed)) || is_truthy(cell(row, c.is_missed)) {
      return 0;
    }
    let assigned_reps = cell(row, c.assigned_reps);
    if assigned_reps.is_empty() {
      return 0;
    }

    let exercise = cell(row, c.exercise);
    if exercise.is_empty() {
      return 0;
    }
    let Some(date) = parse_date(cell(row, c.date)) else {
      return 0;
    };

    let actual_reps = parse_reps(cell(row, c.actual_reps));
    let Some(reps) = actual_reps.or_else(|| parse_reps(assigned_reps)) else {
      return 0;
    };
    let Some((weight, suffix_unit)) =
      parse_weight(cell(row, c.actual_weight)).or_else(|| parse_weight(cell(row, c.assigned_weight)))
    else {
      return 0;
    };
    let unit = cell(row, c.weight_unit)
      .parse::<UnitType>()
      .ok()
      .or(suffix_unit)
      .unwrap_or_default();

    // An actual rep count is one logged set; otherwise expand the prescription
    let sets = if actual_reps.is_some() {
      1
    } else {
      parse_reps(cell(row, c.assigned_sets)).unwrap_or(1)
    };
    if sets > MAX_EXPANDED_SETS {
      tracing::debug!(sets, max = MAX_EXPANDED_SETS, "assigned set count out of range");
      return 0;
    }

    let base = LiftRecord::new(date, canonical_lift_type(exercise), reps, weight, unit)
      .with_url(self.workout_url(cell(row, c.workout_id)));

    for set in 1..=sets {
      let record = if sets > 1 {
        base.clone().with_notes(format!("Set {} of {}", set, sets))
      } else {
        base.clone()
      };
      out.push(record);
    }
    sets as usize
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::{parse_rows, parse_rows_with, ParseOptions, SheetSchema};
  use crate::test_utils::grid;

  const HEADER: &[&str] = &[
    "user_name",
    "workout_id",
    "workout_date",
    "exercise_name",
    "assigned_sets",
    "assigned_reps",
    "assigned_weight",
    "actual_reps",
    "actual_weight",
    "weight_unit",
    "is_completed",
    "is_missed",
  ];

  #[test]
  fn test_set_expansion_numbers_notes() {
    let rows = grid(&[
      HEADER,
      &["sam", "w1", "2024-03-01", "Bench Press", "3", "5", "185", "", "", "lb", "true", "false"],
    ]);
    let outcome = parse_rows(&rows);
    assert_eq!(outcome.schema, SheetSchema::CoachedProgramExport);
    let notes: Vec<_> = outcome.records.iter().map(|r| r.notes.as_deref()).collect();
    assert_eq!(notes, vec![Some("Set 1 of 3"), Some("Set 2 of 3"), Some("Set 3 of 3")]);
    assert!(outcome.records.iter().all(|r| r.reps == 5 && r.weight == 185.0));
  }

  #[test]
  fn test_single_set_leaves_notes_empty() {
    let rows = grid(&[
      HEADER,
      &["sam", "w1", "2024-03-01", "Deadlift", "1", "3", "405", "", "", "", "TRUE", ""],
    ]);
    let records = parse_rows(&rows).records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].notes, None);
    assert_eq!(records[0].unit_type, UnitType::Lb);
  }

  #[test]
  fn test_actual_values_override_prescription() {
    let rows = grid(&[
      HEADER,
      &["sam", "w2", "2024-03-02", "Strict Press", "3", "5", "95", "4", "100", "kg", "true", "false"],
    ]);
    let records = parse_rows(&rows).records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reps, 4);
    assert_eq!(records[0].weight, 100.0);
    assert_eq!(records[0].unit_type, UnitType::Kg);
  }

  #[test]
  fn test_actual_weight_alone_still_expands_sets() {
    let rows = grid(&[
      HEADER,
      &["sam", "w2", "2024-03-02", "Strict Press", "2", "5", "95", "", "100", "", "true", "false"],
    ]);
    let records = parse_rows(&rows).records;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.reps == 5 && r.weight == 100.0));
  }

  #[test]
  fn test_gates_drop_incomplete_missed_and_unassigned_rows() {
    let rows = grid(&[
      HEADER,
      &["sam", "w3", "2024-03-03", "Deadlift", "1", "5", "315", "", "", "", "false", "false"],
      &["sam", "w3", "2024-03-03", "Deadlift", "1", "5", "315", "", "", "", "true", "true"],
      &["sam", "w3", "2024-03-03", "Deadlift", "1", "", "315", "5", "315", "", "true", "false"],
      &["sam", "w3", "2024-03-03", "Deadlift", "1", "5", "315", "", "", "", "true", "false"],
    ]);
    let outcome = parse_rows(&rows);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.skipped_rows, 3);
  }

  #[test]
  fn test_oversized_set_count_skips_row() {
    let rows = grid(&[
      HEADER,
      &["sam", "w5", "2024-03-05", "Bench Press", "2000000", "5", "185", "", "", "", "true", "false"],
      &["sam", "w5", "2024-03-05", "Bench Press", "4294967295", "5", "185", "", "", "", "true", "false"],
      &["sam", "w5", "2024-03-05", "Bench Press", "100", "5", "185", "", "", "", "true", "false"],
    ]);
    let outcome = parse_rows(&rows);
    assert_eq!(outcome.records.len(), MAX_EXPANDED_SETS as usize);
    assert_eq!(outcome.skipped_rows, 2);
    assert_eq!(outcome.records[99].notes.as_deref(), Some("Set 100 of 100"));
  }

  #[test]
  fn test_squat_is_canonicalized_and_url_synthesized() {
    let rows = grid(&[
      HEADER,
      &["sam", "w42", "2024-03-04", "Squat", "1", "5", "275", "", "", "", "true", "false"],
    ]);
    let options = ParseOptions {
      coached_workout_url_template: "https://coach.test/w/{workout_id}".to_string(),
    };
    let records = parse_rows_with(&rows, &options).records;
    assert_eq!(records[0].lift_type, "Back Squat");
    assert_eq!(records[0].url.as_deref(), Some("https://coach.test/w/w42"));
  }
}
