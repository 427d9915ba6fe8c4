use std::env;

use crate::logging::{LogFormat, LoggingConfig};
use crate::parser::{ParseOptions, DEFAULT_COACHED_WORKOUT_URL_TEMPLATE};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_DATABASE_URL: &str = "sqlite://strength-journeys.db?mode=rwc";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {reason}")]
  Invalid { key: String, reason: String },
}

/// ---------------------------------------------------------------------------
/// Application Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub sheets_api_base: String,
  pub coached_workout_url_template: String,
  pub logging: LoggingConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
      coached_workout_url_template: DEFAULT_COACHED_WORKOUT_URL_TEMPLATE.to_string(),
      logging: LoggingConfig::default(),
    }
  }
}

/// Non-empty value of `key`, if set
fn var(key: &str) -> Option<String> {
  env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
  ConfigError::Invalid {
    key: key.to_string(),
    reason: reason.into(),
  }
}

impl AppConfig {
  /// Load `.env` if present, then read the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let sheets_api_base = var("SHEETS_API_BASE").unwrap_or(defaults.sheets_api_base);
    url::Url::parse(&sheets_api_base).map_err(|e| invalid("SHEETS_API_BASE", e.to_string()))?;

    let coached_workout_url_template =
      var("COACHED_WORKOUT_URL_TEMPLATE").unwrap_or(defaults.coached_workout_url_template);
    if !coached_workout_url_template.contains("{workout_id}") {
      return Err(invalid(
        "COACHED_WORKOUT_URL_TEMPLATE",
        "template must contain {workout_id}",
      ));
    }

    let format = match var("LOG_FORMAT") {
      Some(raw) => raw.parse::<LogFormat>().map_err(|e| invalid("LOG_FORMAT", e))?,
      None => LogFormat::default(),
    };

    Ok(Self {
      database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
      sheets_api_base,
      coached_workout_url_template,
      logging: LoggingConfig {
        level: var("LOG_LEVEL").unwrap_or(defaults.logging.level),
        format,
      },
    })
  }

  pub fn parse_options(&self) -> ParseOptions {
    ParseOptions {
      coached_workout_url_template: self.coached_workout_url_template.clone(),
    }
  }
}
