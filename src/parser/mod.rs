//! Spreadsheet row parsing
//!
//! Turns a raw grid of cells (row 0 = headers) into normalized lift records.
//! The schema is detected once from the header row, column positions are
//! resolved once, and each data row then goes through the schema's
//! `RowParser`. Rows that cannot be turned into a valid record are dropped;
//! parsing itself never fails.

mod bespoke;
mod coached;
mod gym_app;

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{LiftRecord, UnitType};

pub use bespoke::BespokeParser;
pub use coached::CoachedProgramParser;
pub use gym_app::GymAppParser;

/// Default link target for rows imported from a coached program export
pub const DEFAULT_COACHED_WORKOUT_URL_TEMPLATE: &str = "https://coaching.example.com/workouts/{workout_id}";

/// ---------------------------------------------------------------------------
/// Schema Detection
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSchema {
  /// Export from a gym tracking app: one row per exercise per session with
  /// the sets packed into a multi-line description cell
  GymAppExport,
  /// Export from a coached programming platform: prescribed vs actual sets
  CoachedProgramExport,
  /// User-authored sheet with Date / Lift Type / Reps / Weight columns
  Bespoke,
}

impl SheetSchema {
  pub fn as_str(&self) -> &'static str {
    match self {
      SheetSchema::GymAppExport => "gym_app_export",
      SheetSchema::CoachedProgramExport => "coached_program_export",
      SheetSchema::Bespoke => "bespoke",
    }
  }
}

impl std::fmt::Display for SheetSchema {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Pick the schema for a header row. Sentinels are exact and position
/// sensitive so user sheets are not mistaken for app exports.
pub fn detect_schema(header: &[String]) -> SheetSchema {
  let at = |idx: usize| header.get(idx).map(String::as_str);

  if at(0) == Some(gym_app::SENTINEL_FIRST) && at(gym_app::DESCRIPTION_COLUMN) == Some(gym_app::SENTINEL_DESCRIPTION) {
    SheetSchema::GymAppExport
  } else if at(0) == Some(coached::SENTINEL_FIRST) && at(1) == Some(coached::SENTINEL_SECOND) {
    SheetSchema::CoachedProgramExport
  } else {
    SheetSchema::Bespoke
  }
}

/// ---------------------------------------------------------------------------
/// Parsing
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ParseOptions {
  /// URL template for coached program rows; `{workout_id}` is substituted
  pub coached_workout_url_template: String,
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      coached_workout_url_template: DEFAULT_COACHED_WORKOUT_URL_TEMPLATE.to_string(),
    }
  }
}

/// Result of parsing one grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
  pub schema: SheetSchema,
  pub records: Vec<LiftRecord>,
  /// Non-blank data rows that produced no record
  pub skipped_rows: usize,
}

/// Shared contract of every schema parser. A parser instance lives for a
/// single parse, so any carry-forward state is local to that parse.
pub trait RowParser {
  /// Append the records produced by one data row and return how many were added
  fn parse_row(&mut self, row: &[String], out: &mut Vec<LiftRecord>) -> usize;
}

enum SchemaParser {
  GymApp(GymAppParser),
  Coached(CoachedProgramParser),
  Bespoke(BespokeParser),
}

impl SchemaParser {
  fn for_schema(schema: SheetSchema, header: &[String], options: &ParseOptions) -> Self {
    match schema {
      SheetSchema::GymAppExport => Self::GymApp(GymAppParser::new(header)),
      SheetSchema::CoachedProgramExport => {
        Self::Coached(CoachedProgramParser::new(header, &options.coached_workout_url_template))
      }
      SheetSchema::Bespoke => Self::Bespoke(BespokeParser::new(header)),
    }
  }
}

impl RowParser for SchemaParser {
  fn parse_row(&mut self, row: &[String], out: &mut Vec<LiftRecord>) -> usize {
    match self {
      Self::GymApp(parser) => parser.parse_row(row, out),
      Self::Coached(parser) => parser.parse_row(row, out),
      Self::Bespoke(parser) => parser.parse_row(row, out),
    }
  }
}

pub fn parse_rows(rows: &[Vec<String>]) -> ParseOutcome {
  parse_rows_with(rows, &ParseOptions::default())
}

pub fn parse_rows_with(rows: &[Vec<String>], options: &ParseOptions) -> ParseOutcome {
  let Some((header, data)) = rows.split_first() else {
    return ParseOutcome {
      schema: SheetSchema::Bespoke,
      records: Vec::new(),
      skipped_rows: 0,
    };
  };

  let schema = detect_schema(header);
  let mut parser = SchemaParser::for_schema(schema, header, options);
  let mut records = Vec::with_capacity(data.len());
  let mut skipped_rows = 0;

  for (idx, row) in data.iter().enumerate() {
    if row.iter().all(|c| c.trim().is_empty()) {
      continue;
    }
    if parser.parse_row(row, &mut records) == 0 {
      skipped_rows += 1;
      // +2: one for the header, one for 1-based sheet rows
      tracing::debug!(row = idx + 2, %schema, "skipped row without a valid lift");
    }
  }

  tracing::info!(%schema, records = records.len(), skipped_rows, "parsed spreadsheet rows");

  ParseOutcome {
    schema,
    records,
    skipped_rows,
  }
}

/// ---------------------------------------------------------------------------
/// Cell Helpers
/// ---------------------------------------------------------------------------

static WEIGHT_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
  Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?|\.[0-9]+)\s*(kgs?|lbs?)?$").ok()
});

/// Trimmed cell at `idx`, or "" when the column or cell is absent
pub(crate) fn cell(row: &[String], idx: Option<usize>) -> &str {
  idx.and_then(|i| row.get(i)).map(|c| c.trim()).unwrap_or("")
}

/// Case-insensitive header lookup
pub(crate) fn find_column(header: &[String], name: &str) -> Option<usize> {
  header.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  let date_part = value.split(['T', ' ']).next().unwrap_or(value);
  ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"]
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Positive whole rep count; "5" and "5.0" both parse
pub(crate) fn parse_reps(value: &str) -> Option<u32> {
  let value = value.trim();
  let reps = match value.parse::<u32>() {
    Ok(reps) => reps,
    Err(_) => {
      let float: f64 = value.parse().ok()?;
      if float.fract() != 0.0 || float < 0.0 || float > u32::MAX as f64 {
        return None;
      }
      float as u32
    }
  };
  (reps > 0).then_some(reps)
}

/// Positive weight with an optional unit suffix ("225", "225lb", "100 kgs")
pub(crate) fn parse_weight(value: &str) -> Option<(f64, Option<UnitType>)> {
  let cleaned = value.trim().replace(',', "");
  let captures = WEIGHT_PATTERN.as_ref()?.captures(&cleaned)?;
  let weight: f64 = captures.get(1)?.as_str().parse().ok()?;
  if !weight.is_finite() || weight <= 0.0 {
    return None;
  }
  let unit = captures.get(2).and_then(|m| m.as_str().parse().ok());
  Some((weight, unit))
}

pub(crate) fn is_truthy(value: &str) -> bool {
  matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "y" | "1")
}
