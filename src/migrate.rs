//! Schema bootstrap and sample data.
//!
//! The schema script is idempotent (`IF NOT EXISTS` throughout). The seed
//! script only runs against an empty `games` table, so `srq init` can be
//! repeated safely. `reset` deletes the database file first.

use anyhow::{Context, Result};
use sqlx::Connection;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::db;

const BUNDLED_SETUP_SQL: &str = include_str!("../sql/setup.sql");
const BUNDLED_SEED_SQL: &str = include_str!("../sql/seed.sql");

/// What [`setup_database`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    /// The seed script ran (the database had no games).
    pub seeded: bool,
    /// Number of rows in `runs` afterwards.
    pub runs: i64,
}

pub async fn setup_database(config: &Config, reset: bool) -> Result<SetupReport> {
    if reset && config.db.path.exists() {
        std::fs::remove_file(&config.db.path).with_context(|| {
            format!(
                "Failed to remove existing database: {}",
                config.db.path.display()
            )
        })?;
        info!(path = %config.db.path.display(), "removed existing database");
    }

    let setup_sql = load_script(config.db.setup_sql.as_deref(), BUNDLED_SETUP_SQL)?;
    let seed_sql = load_script(config.db.seed_sql.as_deref(), BUNDLED_SEED_SQL)?;

    let mut conn = db::connect(config).await?;

    sqlx::raw_sql(&setup_sql)
        .execute(&mut conn)
        .await
        .context("Failed to apply schema")?;

    let games: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games")
        .fetch_one(&mut conn)
        .await?;

    let seeded = games == 0;
    if seeded {
        let mut tx = conn.begin().await?;
        sqlx::raw_sql(&seed_sql)
            .execute(&mut *tx)
            .await
            .context("Failed to load seed data")?;
        tx.commit().await?;
    }

    let runs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM runs")
        .fetch_one(&mut conn)
        .await?;

    conn.close().await?;
    info!(seeded, runs, "database ready");

    Ok(SetupReport { seeded, runs })
}

fn load_script(path: Option<&Path>, bundled: &'static str) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read SQL script: {}", p.display())),
        None => Ok(bundled.to_string()),
    }
}
