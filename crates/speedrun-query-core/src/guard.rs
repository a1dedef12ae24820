//! Read-only policy check applied to generated SQL before execution.
//!
//! The check is a case-insensitive substring scan against [`DENYLIST`]. It
//! does not parse SQL: a harmless `SELECT created_at ...` is rejected
//! because it contains `create`, and garbage text with no listed keyword
//! passes and is left for the database to reject.

use serde::Serialize;
use std::fmt;

/// Keywords whose presence anywhere in the text rejects a query.
pub const DENYLIST: &[&str] = &["insert", "update", "delete", "drop", "alter", "create"];

/// Reason attached to every rejection.
pub const READ_ONLY_REASON: &str = "Only SELECT queries are allowed.";

/// SQL text that has passed [`check_read_only`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuardedSql(String);

impl GuardedSql {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuardedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A query refused by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRejection {
    /// First denylisted keyword found.
    pub keyword: &'static str,
}

impl GuardRejection {
    pub fn reason(&self) -> &'static str {
        READ_ONLY_REASON
    }
}

impl fmt::Display for GuardRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(READ_ONLY_REASON)
    }
}

impl std::error::Error for GuardRejection {}

/// Accept `sql` unchanged unless it contains a denylisted keyword.
pub fn check_read_only(sql: &str) -> Result<GuardedSql, GuardRejection> {
    let lowered = sql.to_lowercase();
    match DENYLIST.iter().copied().find(|kw| lowered.contains(kw)) {
        Some(keyword) => Err(GuardRejection { keyword }),
        None => Ok(GuardedSql(sql.to_string())),
    }
}
