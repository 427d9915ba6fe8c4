//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Record and grid factories
//! - Seed helpers for the stored snapshot

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{LiftRecord, UnitType};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Store `records` as the current snapshot
pub async fn seed_test_records(pool: &SqlitePool, records: &[LiftRecord]) {
  crate::store::save_records(pool, records)
    .await
    .expect("Failed to seed lift records");
}

/// ---------------------------------------------------------------------------
/// Factories
/// ---------------------------------------------------------------------------

/// Build a raw grid from string literals
pub fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
  rows
    .iter()
    .map(|row| row.iter().map(|c| c.to_string()).collect())
    .collect()
}

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date")
}

/// A pound-denominated set
pub fn lift(date_str: &str, lift_type: &str, reps: u32, weight: f64) -> LiftRecord {
  lift_in(date_str, lift_type, reps, weight, UnitType::Lb)
}

pub fn lift_in(date_str: &str, lift_type: &str, reps: u32, weight: f64, unit: UnitType) -> LiftRecord {
  LiftRecord::new(date(date_str), lift_type, reps, weight, unit)
}

/// One squat set on each date, for session and streak tests
pub fn sessions_on(dates: &[&str]) -> Vec<LiftRecord> {
  dates.iter().map(|d| lift(d, "Back Squat", 5, 225.0)).collect()
}

/// A small mixed history covering two lift types and both units
pub fn mock_history() -> Vec<LiftRecord> {
  vec![
    lift("2024-01-01", "Back Squat", 5, 225.0),
    lift("2024-01-01", "Bench Press", 5, 185.0),
    lift("2024-01-08", "Back Squat", 5, 235.0).with_notes("belt"),
    lift_in("2024-01-08", "Bench Press", 3, 90.0, UnitType::Kg),
    lift("2024-01-15", "Back Squat", 1, 315.0).with_url("https://example.test/w/1"),
    lift("2024-06-01", "Back Squat", 1, 405.0).as_goal(),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('lift_records', 'user_preferences', 'sync_state')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_factories_create_valid_records() {
    assert!(mock_history().iter().all(LiftRecord::is_valid));
    assert_eq!(grid(&[&["a", "b"], &["c"]]), vec![vec!["a", "b"], vec!["c"]]);
    assert_eq!(sessions_on(&["2024-01-01", "2024-01-02"]).len(), 2);
  }
}
