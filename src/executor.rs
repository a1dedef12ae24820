//! SQLite implementation of [`QueryStore`].
//!
//! Every call opens its own read-only connection, materializes every row,
//! and closes the connection before returning, on success and on failure.
//! Nothing is pooled or shared between requests.
//!
//! Text holding more than one statement is refused once the first statement
//! completes, so a result set never mixes rows from different queries.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::{Number, Value};
use speedrun_query_core::guard::GuardedSql;
use speedrun_query_core::models::{ResultSet, Row};
use speedrun_query_core::store::{ExecutionError, QueryStore};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Connection, Either, Row as _, TypeInfo, ValueRef};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::db;

/// Reported when the text contains a second statement.
pub const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

pub struct SqliteExecutor {
    config: Arc<Config>,
}

impl SqliteExecutor {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl QueryStore for SqliteExecutor {
    #[instrument(skip_all, fields(db = %self.config.db.path.display()))]
    async fn execute(&self, sql: &GuardedSql) -> Result<ResultSet, ExecutionError> {
        let mut conn = db::connect_read_only(&self.config)
            .await
            .map_err(engine_error)?;

        let fetched = fetch_single_statement(&mut conn, sql.as_str()).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close connection");
        }

        let rows = fetched?;
        debug!(rows = rows.len(), "statement executed");

        rows.iter().map(row_to_map).collect()
    }
}

async fn fetch_single_statement(
    conn: &mut SqliteConnection,
    sql: &str,
) -> Result<Vec<SqliteRow>, ExecutionError> {
    let mut stream = sqlx::raw_sql(sql).fetch_many(conn);
    let mut rows = Vec::new();
    let mut completed = false;

    while let Some(item) = stream.try_next().await.map_err(engine_error)? {
        if completed {
            return Err(ExecutionError::new(MULTIPLE_STATEMENTS));
        }
        match item {
            Either::Right(row) => rows.push(row),
            Either::Left(_) => completed = true,
        }
    }
    Ok(rows)
}

/// Convert one row, keyed by the result description's column names.
fn row_to_map(row: &SqliteRow) -> Result<Row, ExecutionError> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = column_value(row, column.ordinal()).map_err(engine_error)?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

/// Decode by the value's runtime storage class.
fn column_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" | "NUMERIC" => {
            let real: f64 = row.try_get(idx)?;
            // inf and NaN have no JSON number form
            Number::from_f64(real)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(real.to_string()))
        }
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(idx)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

fn engine_error(err: sqlx::Error) -> ExecutionError {
    match err {
        sqlx::Error::Database(db_err) => ExecutionError::new(db_err.message()),
        other => ExecutionError::new(other.to_string()),
    }
}
