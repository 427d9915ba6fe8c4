//! Strength Journeys analytics core
//!
//! Parses lift logs exported from spreadsheets, estimates one-rep maxes and
//! derives chart series, PR leaderboards and training statistics. The
//! `commands` module is the surface a UI layer calls into.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod db;
pub mod estimator;
pub mod logging;
pub mod models;
pub mod parser;
pub mod records;
pub mod sheets;
pub mod stats;
pub mod store;

#[cfg(test)]
mod test_utils;

use config::{AppConfig, ConfigError};
use db::AppState;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("Failed to initialize database: {0}")]
  Database(#[from] sqlx::Error),
}

/// Load configuration, install logging and open the database
pub async fn bootstrap() -> Result<AppState, StartupError> {
  let config = AppConfig::load()?;
  logging::init_logging(&config.logging);

  let state = AppState::initialize(config).await?;
  tracing::info!("strength journeys core ready");
  Ok(state)
}
