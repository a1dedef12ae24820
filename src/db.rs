use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::ConnectOptions;
use std::str::FromStr;

use crate::config::Config;

/// Open one writable connection, creating the database file if needed.
pub async fn connect(config: &Config) -> Result<SqliteConnection> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .connect()
        .await?;

    Ok(conn)
}

/// Open one read-only connection. Used for every executed question.
pub async fn connect_read_only(config: &Config) -> Result<SqliteConnection, sqlx::Error> {
    SqliteConnectOptions::from_str(&format!("sqlite:{}", config.db.path.display()))?
        .read_only(true)
        .connect()
        .await
}
