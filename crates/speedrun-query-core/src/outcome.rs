//! Terminal result of one question.

use serde::Serialize;

use crate::models::ResultSet;

pub const GENERATION_FAILED_MESSAGE: &str =
    "I'm sorry, I couldn't generate a valid SQL query for that question.";
pub const EMPTY_RESULT_MESSAGE: &str = "I didn't find any data matching your question.";

/// Exactly one variant is produced per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Non-empty result narrated by the model. `answer` may be a narration
    /// error message; `sql` and `data` are always present for audit.
    Answered {
        answer: String,
        sql: String,
        data: ResultSet,
    },
    /// The model call failed, returned nothing, or returned the sentinel.
    GenerationFailed,
    /// The generated text hit the read-only denylist. Never executed.
    GuardRejected { sql: String, reason: String },
    /// The store rejected the statement.
    ExecutionFailed { sql: String, reason: String },
    /// The statement ran and matched no rows. Never narrated.
    EmptyResult { sql: String },
}

impl QueryOutcome {
    /// Stable snake_case tag, matching the serialized `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryOutcome::Answered { .. } => "answered",
            QueryOutcome::GenerationFailed => "generation_failed",
            QueryOutcome::GuardRejected { .. } => "guard_rejected",
            QueryOutcome::ExecutionFailed { .. } => "execution_failed",
            QueryOutcome::EmptyResult { .. } => "empty_result",
        }
    }

    /// Human-readable message shown to the user.
    pub fn message(&self) -> String {
        match self {
            QueryOutcome::Answered { answer, .. } => answer.clone(),
            QueryOutcome::GenerationFailed => GENERATION_FAILED_MESSAGE.to_string(),
            QueryOutcome::GuardRejected { reason, .. }
            | QueryOutcome::ExecutionFailed { reason, .. } => {
                format!("Error executing query: {}", reason)
            }
            QueryOutcome::EmptyResult { .. } => EMPTY_RESULT_MESSAGE.to_string(),
        }
    }

    /// The SQL text involved, when generation produced any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            QueryOutcome::Answered { sql, .. }
            | QueryOutcome::GuardRejected { sql, .. }
            | QueryOutcome::ExecutionFailed { sql, .. }
            | QueryOutcome::EmptyResult { sql } => Some(sql),
            QueryOutcome::GenerationFailed => None,
        }
    }

    /// Result rows, present only for answered questions.
    pub fn data(&self) -> Option<&ResultSet> {
        match self {
            QueryOutcome::Answered { data, .. } => Some(data),
            _ => None,
        }
    }
}
