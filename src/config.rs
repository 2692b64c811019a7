use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::schemas::AppState;

/// Default storage location: `library.db` in the working directory, created on first use
pub const DEFAULT_DATABASE_URL: &str = "sqlite://library.db?mode=rwc";

/// Default listen address
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Connect to the database
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Connecting to database: {}", database_url);
    ensure_sqlite_parent_dir(database_url)?;

    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8));
    if database_url.starts_with("sqlite:") {
        // Deletes and inserts rely on FK enforcement for their 409 answers
        options.map_sqlx_sqlite_opts(|opts| opts.foreign_keys(true));
    }
    if is_in_memory_sqlite(database_url) {
        // Every pooled connection to `:memory:` would open its own empty database
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    info!("Connected to database");
    Ok(db)
}

/// Create the schema if it is missing
pub async fn apply_migrations(db: &DatabaseConnection) -> Result<()> {
    debug!("Applying pending migrations");
    Migrator::up(db, None)
        .await
        .context("Failed to run database migrations")?;
    info!("Database schema is up to date");
    Ok(())
}

/// Initialize application state: connect, migrate, wrap the connection pool
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let db = connect_database(database_url).await?;
    apply_migrations(&db).await?;
    Ok(AppState { db })
}

/// Creates the parent directory of a file-backed SQLite database.
///
/// In-memory URLs and non-SQLite URLs are left alone.
pub fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// True for SQLite URLs whose data lives only as long as its connection.
pub fn is_in_memory_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite:") && sqlite_file_path(database_url).is_none()
}

/// Extracts the file path from a `sqlite:` URL, or `None` for memory databases.
fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(path)
    }
}
