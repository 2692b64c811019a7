use anyhow::Result;
use tracing::{debug, error, info, trace};

use crate::config::{apply_migrations, connect_database};

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db = connect_database(database_url).await.inspect_err(|e| {
        error!("Failed to connect to database '{}': {:#}", database_url, e);
    })?;

    apply_migrations(&db).await.inspect_err(|e| {
        error!("Failed to run database migrations: {:#}", e);
    })?;

    info!("Database initialization completed successfully!");
    Ok(())
}
