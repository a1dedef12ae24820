//! Request envelope shared by the CLI and the HTTP server.

use serde::Serialize;
use speedrun_query_core::models::{PromptingMode, Question, ResultSet};
use speedrun_query_core::outcome::QueryOutcome;
use speedrun_query_core::pipeline::Assistant;
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Serialized answer for one question. Matches the `POST /api/query` body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub request_id: String,
    /// Outcome tag: `answered`, `generation_failed`, `guard_rejected`,
    /// `execution_failed`, or `empty_result`.
    pub outcome: String,
    pub answer: String,
    pub sql: Option<String>,
    pub data: Option<ResultSet>,
    pub mode: PromptingMode,
    pub elapsed_ms: u64,
}

impl QueryResponse {
    pub fn from_outcome(
        request_id: String,
        outcome: &QueryOutcome,
        mode: PromptingMode,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            request_id,
            outcome: outcome.kind().to_string(),
            answer: outcome.message(),
            sql: outcome.sql().map(str::to_string),
            data: outcome.data().cloned(),
            mode,
            elapsed_ms,
        }
    }
}

/// Run one question through the assistant, timing it under a request span.
pub async fn answer_question(
    assistant: &Assistant,
    question: &Question,
    mode: PromptingMode,
) -> QueryResponse {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("query", request_id = %request_id);

    async move {
        let started = Instant::now();
        let outcome = assistant.handle_query(question, mode).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(outcome = outcome.kind(), elapsed_ms, "question handled");

        QueryResponse::from_outcome(request_id, &outcome, mode, elapsed_ms)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_from_guard_rejection() {
        let outcome = QueryOutcome::GuardRejected {
            sql: "DROP TABLE runs".into(),
            reason: "Only SELECT queries are allowed.".into(),
        };
        let resp = QueryResponse::from_outcome("r1".into(), &outcome, PromptingMode::ZeroShot, 12);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["outcome"], "guard_rejected");
        assert_eq!(
            value["answer"],
            "Error executing query: Only SELECT queries are allowed."
        );
        assert_eq!(value["sql"], "DROP TABLE runs");
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["mode"], "zero-shot");
    }

    #[test]
    fn test_response_from_answer_keeps_rows() {
        let mut row = speedrun_query_core::models::Row::new();
        row.insert("title".into(), json!("Celeste"));
        let outcome = QueryOutcome::Answered {
            answer: "Celeste.".into(),
            sql: "SELECT title FROM games".into(),
            data: vec![row],
        };
        let resp = QueryResponse::from_outcome("r2".into(), &outcome, PromptingMode::FewShot, 5);
        assert_eq!(resp.data.as_ref().map(Vec::len), Some(1));
        assert_eq!(resp.answer, "Celeste.");
    }
}
