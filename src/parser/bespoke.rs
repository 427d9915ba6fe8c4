use chrono::NaiveDate;

use super::{cell, find_column, is_truthy, parse_date, parse_reps, parse_weight, RowParser};
use crate::models::{LiftRecord, UnitType};

/// Column positions discovered from the header row
#[derive(Debug, Clone, Default)]
struct Columns {
  date: Option<usize>,
  lift_type: Option<usize>,
  reps: Option<usize>,
  weight: Option<usize>,
  notes: Option<usize>,
  url: Option<usize>,
  goal: Option<usize>,
}

/// Parser for user-authored sheets.
///
/// Users often write the date and exercise once and leave those cells blank
/// on the following set rows, so empty date / lift type cells take the last
/// non-empty value seen in this parse.
pub struct BespokeParser {
  columns: Columns,
  last_date: Option<NaiveDate>,
  last_lift_type: Option<String>,
}

impl BespokeParser {
  pub fn new(header: &[String]) -> Self {
    let columns = Columns {
      date: find_column(header, "Date"),
      lift_type: find_column(header, "Lift Type"),
      reps: find_column(header, "Reps"),
      weight: find_column(header, "Weight"),
      notes: find_column(header, "Notes"),
      url: find_column(header, "URL"),
      goal: find_column(header, "Goal"),
    };
    Self {
      columns,
      last_date: None,
      last_lift_type: None,
    }
  }

  /// Update carry-forward state from this row and return the effective
  /// (date, lift type). A date cell that is present but unreadable yields None.
  fn carry_forward(&mut self, row: &[String]) -> Option<(NaiveDate, String)> {
    let lift_cell = cell(row, self.columns.lift_type);
    if !lift_cell.is_empty() {
      self.last_lift_type = Some(lift_cell.to_string());
    }

    let date_cell = cell(row, self.columns.date);
    if !date_cell.is_empty() {
      self.last_date = Some(parse_date(date_cell)?);
    }

    Some((self.last_date?, self.last_lift_type.clone()?))
  }
}

impl RowParser for BespokeParser {
  fn parse_row(&mut self, row: &[String], out: &mut Vec<LiftRecord>) -> usize {
    let Some((date, lift_type)) = self.carry_forward(row) else {
      return 0;
    };

    let Some(reps) = parse_reps(cell(row, self.columns.reps)) else {
      return 0;
    };
    let Some((weight, unit)) = parse_weight(cell(row, self.columns.weight)) else {
      return 0;
    };

    let mut record = LiftRecord::new(date, lift_type, reps, weight, unit.unwrap_or(UnitType::Lb))
      .with_notes(cell(row, self.columns.notes))
      .with_url(cell(row, self.columns.url));
    record.is_goal = is_truthy(cell(row, self.columns.goal));

    out.push(record);
    1
  }
}
