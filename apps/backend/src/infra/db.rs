use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::error::AppError;

fn connect_options(url: &str) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    // Every SQLite in-memory connection is a separate database.
    if url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    opts
}

/// Connect to `url` and bring the schema up to date.
pub async fn connect_and_migrate(url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = Database::connect(connect_options(url)).await?;
    migration::migrate(&conn, MigrationCommand::Up).await?;
    let backend = conn.get_database_backend();
    info!(?backend, "Database ready");
    Ok(conn)
}
