use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::AppConfig;
use crate::sheets::SheetsClient;

pub type DbPool = SqlitePool;

/// Application state shared by every command
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
  pub sheets: SheetsClient,
}

impl AppState {
  pub async fn initialize(config: AppConfig) -> Result<Self, sqlx::Error> {
    let db = initialize_db(&config.database_url).await?;
    let sheets = SheetsClient::new(config.sheets_api_base.clone());
    Ok(Self { db, config, sheets })
  }
}

/// Open the connection pool and run migrations.
/// File URLs should carry `?mode=rwc` so the database is created on first run.
pub async fn initialize_db(database_url: &str) -> Result<DbPool, sqlx::Error> {
  tracing::info!(database_url, "initializing database");

  // In-memory databases are per connection
  let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

  let pool = SqlitePoolOptions::new()
    .max_connections(max_connections)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("database initialized");

  Ok(pool)
}
