//! Relational store abstraction.
//!
//! The [`QueryStore`] trait runs one guarded statement and materializes its
//! rows. The SQLite implementation lives in the app crate; implementations
//! must be `Send + Sync` to work with async runtimes.

use async_trait::async_trait;
use std::fmt;

use crate::guard::GuardedSql;
use crate::models::ResultSet;

/// A statement the store could not run. Carries the engine's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExecutionError {}

/// Abstract query backend.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Execute `sql` as a single statement and return every row.
    ///
    /// Column names come from the result description, so aliases and
    /// computed columns appear verbatim. Zero rows is `Ok(vec![])`.
    async fn execute(&self, sql: &GuardedSql) -> Result<ResultSet, ExecutionError>;
}
