//! SQLite persistence for the record snapshot, preferences and sync state
//!
//! The record table always mirrors the most recent import. A refresh replaces
//! the whole snapshot inside one transaction so readers never see a mix of
//! old and new rows.

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::estimator::E1rmFormula;
use crate::models::{LiftRecord, Preferences, SyncState, UnitType};
use crate::parser::ParseOutcome;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Corrupt stored value: {0}")]
  Corrupt(String),
}

/// ---------------------------------------------------------------------------
/// Lift Records
/// ---------------------------------------------------------------------------

type RecordRow = (NaiveDate, String, i64, f64, String, Option<String>, Option<String>, bool);

/// Replace the stored snapshot with `records`, preserving their order
pub async fn save_records(pool: &SqlitePool, records: &[LiftRecord]) -> Result<(), StoreError> {
  let mut tx = pool.begin().await?;
  write_records(&mut *tx, records).await?;
  tx.commit().await?;

  tracing::debug!(count = records.len(), "stored lift record snapshot");
  Ok(())
}

/// Store an import: the new snapshot and its sync state commit together
pub async fn replace_snapshot(
  pool: &SqlitePool,
  source: &str,
  outcome: &ParseOutcome,
) -> Result<SyncState, StoreError> {
  let mut tx = pool.begin().await?;
  write_records(&mut *tx, &outcome.records).await?;
  write_sync(&mut *tx, source, outcome).await?;
  tx.commit().await?;

  tracing::debug!(source, count = outcome.records.len(), "stored import snapshot");
  stored_sync_state(pool, source).await
}

async fn write_records(conn: &mut SqliteConnection, records: &[LiftRecord]) -> Result<(), StoreError> {
  sqlx::query("DELETE FROM lift_records").execute(&mut *conn).await?;

  for (position, record) in records.iter().enumerate() {
    sqlx::query(
      r#"
      INSERT INTO lift_records (
        position, date, lift_type, reps, weight, unit_type, notes, url, is_goal
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
      "#,
    )
    .bind(position as i64)
    .bind(record.date)
    .bind(&record.lift_type)
    .bind(record.reps as i64)
    .bind(record.weight)
    .bind(record.unit_type.as_str())
    .bind(&record.notes)
    .bind(&record.url)
    .bind(record.is_goal)
    .execute(&mut *conn)
    .await?;
  }
  Ok(())
}

pub async fn load_records(pool: &SqlitePool) -> Result<Vec<LiftRecord>, StoreError> {
  let rows: Vec<RecordRow> = sqlx::query_as(
    r#"
    SELECT date, lift_type, reps, weight, unit_type, notes, url, is_goal
    FROM lift_records
    ORDER BY position ASC
    "#,
  )
  .fetch_all(pool)
  .await?;

  rows
    .into_iter()
    .map(|(date, lift_type, reps, weight, unit_type, notes, url, is_goal)| {
      let unit_type: UnitType = unit_type.parse().map_err(StoreError::Corrupt)?;
      let reps = u32::try_from(reps).map_err(|e| StoreError::Corrupt(format!("reps {}: {}", reps, e)))?;
      Ok(LiftRecord {
        date,
        lift_type,
        reps,
        weight,
        unit_type,
        notes,
        url,
        is_goal,
      })
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Preferences
/// ---------------------------------------------------------------------------

/// Stored preferences, or defaults if none were ever saved
pub async fn load_preferences(pool: &SqlitePool) -> Result<Preferences, StoreError> {
  let row: Option<(String, String, String, Option<i64>, bool)> = sqlx::query_as(
    r#"
    SELECT selected_lift_types, e1rm_formula, preferred_unit, time_range_days, decimate
    FROM user_preferences
    WHERE id = 1
    "#,
  )
  .fetch_optional(pool)
  .await?;

  let Some((selected, formula, unit, time_range_days, decimate)) = row else {
    return Ok(Preferences::default());
  };

  Ok(Preferences {
    selected_lift_types: serde_json::from_str(&selected)?,
    e1rm_formula: E1rmFormula::from_name(&formula),
    preferred_unit: unit.parse().map_err(StoreError::Corrupt)?,
    time_range_days,
    decimate,
  })
}

pub async fn save_preferences(pool: &SqlitePool, prefs: &Preferences) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO user_preferences (
      id, selected_lift_types, e1rm_formula, preferred_unit, time_range_days, decimate, updated_at
    )
    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
      selected_lift_types = excluded.selected_lift_types,
      e1rm_formula = excluded.e1rm_formula,
      preferred_unit = excluded.preferred_unit,
      time_range_days = excluded.time_range_days,
      decimate = excluded.decimate,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(serde_json::to_string(&prefs.selected_lift_types)?)
  .bind(prefs.e1rm_formula.as_str())
  .bind(prefs.preferred_unit.as_str())
  .bind(prefs.time_range_days)
  .bind(prefs.decimate)
  .bind(Utc::now())
  .execute(pool)
  .await?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Sync State
/// ---------------------------------------------------------------------------

async fn write_sync(conn: &mut SqliteConnection, source: &str, outcome: &ParseOutcome) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO sync_state (source, last_sync_at, schema, record_count, skipped_rows)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(source) DO UPDATE SET
      last_sync_at = excluded.last_sync_at,
      schema = excluded.schema,
      record_count = excluded.record_count,
      skipped_rows = excluded.skipped_rows
    "#,
  )
  .bind(source)
  .bind(Utc::now())
  .bind(outcome.schema.as_str())
  .bind(outcome.records.len() as i64)
  .bind(outcome.skipped_rows as i64)
  .execute(&mut *conn)
  .await?;
  Ok(())
}

async fn stored_sync_state(pool: &SqlitePool, source: &str) -> Result<SyncState, StoreError> {
  load_sync_state(pool, source)
    .await?
    .ok_or_else(|| StoreError::Corrupt(format!("sync state for {} missing after write", source)))
}

pub async fn load_sync_state(pool: &SqlitePool, source: &str) -> Result<Option<SyncState>, StoreError> {
  let state = sqlx::query_as::<_, SyncState>("SELECT * FROM sync_state WHERE source = ?1")
    .bind(source)
    .fetch_optional(pool)
    .await?;
  Ok(state)
}

pub async fn list_sync_states(pool: &SqlitePool) -> Result<Vec<SyncState>, StoreError> {
  let states = sqlx::query_as::<_, SyncState>("SELECT * FROM sync_state ORDER BY source")
    .fetch_all(pool)
    .await?;
  Ok(states)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::SheetSchema;
  use crate::test_utils::{lift, mock_history, setup_test_db, teardown_test_db};

  #[tokio::test]
  async fn test_records_round_trip_in_order() {
    let pool = setup_test_db().await;
    let records = mock_history();

    save_records(&pool, &records).await.unwrap();
    let loaded = load_records(&pool).await.unwrap();
    assert_eq!(loaded, records);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_save_replaces_previous_snapshot() {
    let pool = setup_test_db().await;

    save_records(&pool, &mock_history()).await.unwrap();
    let refreshed = vec![lift("2025-01-01", "Deadlift", 3, 405.0)];
    save_records(&pool, &refreshed).await.unwrap();

    assert_eq!(load_records(&pool).await.unwrap(), refreshed);

    save_records(&pool, &[]).await.unwrap();
    assert!(load_records(&pool).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_preferences_default_then_persist() {
    let pool = setup_test_db().await;

    assert_eq!(load_preferences(&pool).await.unwrap(), Preferences::default());

    let prefs = Preferences {
      selected_lift_types: vec!["Back Squat".into(), "Deadlift".into()],
      e1rm_formula: E1rmFormula::OConner,
      preferred_unit: UnitType::Kg,
      time_range_days: Some(365),
      decimate: false,
    };
    save_preferences(&pool, &prefs).await.unwrap();
    assert_eq!(load_preferences(&pool).await.unwrap(), prefs);

    let cleared = Preferences {
      time_range_days: None,
      ..prefs
    };
    save_preferences(&pool, &cleared).await.unwrap();
    assert_eq!(load_preferences(&pool).await.unwrap().time_range_days, None);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sync_state_upserts_per_source() {
    let pool = setup_test_db().await;
    let outcome = ParseOutcome {
      schema: SheetSchema::Bespoke,
      records: mock_history(),
      skipped_rows: 2,
    };

    let first = replace_snapshot(&pool, "sheet-a", &outcome).await.unwrap();
    assert_eq!(first.record_count, 6);
    assert_eq!(first.skipped_rows, 2);
    assert_eq!(first.schema.as_deref(), Some("bespoke"));
    assert!(first.last_sync_at.is_some());

    let empty = ParseOutcome {
      schema: SheetSchema::GymAppExport,
      records: Vec::new(),
      skipped_rows: 0,
    };
    let second = replace_snapshot(&pool, "sheet-a", &empty).await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.record_count, 0);

    replace_snapshot(&pool, "sheet-b", &empty).await.unwrap();
    assert_eq!(list_sync_states(&pool).await.unwrap().len(), 2);
    assert!(load_sync_state(&pool, "nope").await.unwrap().is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_replace_snapshot_writes_records_and_sync_together() {
    let pool = setup_test_db().await;
    save_records(&pool, &mock_history()).await.unwrap();

    let outcome = ParseOutcome {
      schema: SheetSchema::Bespoke,
      records: vec![lift("2025-01-01", "Deadlift", 3, 405.0)],
      skipped_rows: 1,
    };
    let state = replace_snapshot(&pool, "sheet-a", &outcome).await.unwrap();
    assert_eq!(state.record_count, 1);
    assert_eq!(state.skipped_rows, 1);
    assert_eq!(load_records(&pool).await.unwrap(), outcome.records);

    // A failing sync write must leave the earlier snapshot in place
    sqlx::query("DROP TABLE sync_state").execute(&pool).await.unwrap();
    let refreshed = ParseOutcome {
      records: mock_history(),
      ..outcome.clone()
    };
    assert!(matches!(
      replace_snapshot(&pool, "sheet-a", &refreshed).await,
      Err(StoreError::Database(_))
    ));
    assert_eq!(load_records(&pool).await.unwrap(), outcome.records);

    teardown_test_db(pool).await;
  }
}
