use std::io;

use tracing_subscriber::{filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ---------------------------------------------------------------------------
/// Logging Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  /// Multi-line human readable output
  #[default]
  Pretty,
  /// One line per event
  Compact,
  /// Structured output for log shippers
  Json,
}

impl std::str::FromStr for LogFormat {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pretty" => Ok(Self::Pretty),
      "compact" => Ok(Self::Compact),
      "json" => Ok(Self::Json),
      other => Err(format!("Unknown log format: {}", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// Default filter directive (trace, debug, info, warn, error)
  pub level: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".into(),
      format: LogFormat::Pretty,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Subscriber Setup
/// ---------------------------------------------------------------------------

fn build_filter(level: &str) -> EnvFilter {
  // RUST_LOG wins over the configured level when present
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .unwrap_or_else(|_| EnvFilter::new("info"));

  ["sqlx=warn", "reqwest=warn", "hyper=warn"]
    .iter()
    .filter_map(|directive| directive.parse::<Directive>().ok())
    .fold(filter, |filter, directive| filter.add_directive(directive))
}

/// Install the global tracing subscriber. Returns false if one was already
/// installed, so calling this more than once is harmless.
pub fn init_logging(config: &LoggingConfig) -> bool {
  let registry = tracing_subscriber::registry().with(build_filter(&config.level));

  let installed = match config.format {
    LogFormat::Pretty => registry
      .with(fmt::layer().with_target(true).with_writer(io::stdout))
      .try_init(),
    LogFormat::Compact => registry
      .with(fmt::layer().compact().with_target(false).with_writer(io::stdout))
      .try_init(),
    LogFormat::Json => registry
      .with(fmt::layer().json().with_target(true).with_writer(io::stdout))
      .try_init(),
  }
  .is_ok();

  if installed {
    tracing::info!(level = %config.level, format = ?config.format, "logging initialized");
  }
  installed
}
