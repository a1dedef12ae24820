//! End-to-end tests of the question pipeline against a real seeded SQLite
//! database, with the language model replaced by a scripted stub.

use anyhow::{bail, Result};
use async_trait::async_trait;
use speedrun_query::assistant::build_assistant_with_model;
use speedrun_query::config::{parse_config, Config};
use speedrun_query::executor::{SqliteExecutor, MULTIPLE_STATEMENTS};
use speedrun_query::migrate;
use speedrun_query::response::answer_question;
use speedrun_query_core::guard::check_read_only;
use speedrun_query_core::llm::{CompletionModel, CompletionRequest};
use speedrun_query_core::models::{PromptingMode, Question};
use speedrun_query_core::outcome::QueryOutcome;
use speedrun_query_core::store::QueryStore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ─── Scripted model ─────────────────────────────────────────────────

struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(reply),
            None => bail!("no scripted reply left"),
        }
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

async fn seeded_config() -> (TempDir, Arc<Config>) {
    let tmp = TempDir::new().unwrap();
    let cfg = parse_config(&format!(
        "[db]\npath = \"{}/speedruns.sqlite\"\n",
        tmp.path().display()
    ))
    .unwrap();
    let report = migrate::setup_database(&cfg, false).await.unwrap();
    assert!(report.seeded);
    (tmp, Arc::new(cfg))
}

const PB_SQL: &str = "SELECT g.title, c.name, r.completion_time FROM runs r JOIN games g ON r.game_id=g.game_id JOIN categories c ON r.category_id=c.category_id WHERE g.title='Super Mario 64' AND r.is_personal_best=1";

// ─── Executor ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_executor_returns_named_rows() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let rows = executor
        .execute(&check_read_only(PB_SQL).unwrap())
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(columns, vec!["title", "name", "completion_time"]);
    assert!(rows.iter().all(|r| r["title"] == "Super Mario 64"));
    assert!(rows.iter().any(|r| r["name"] == "120 Star"));
}

#[tokio::test]
async fn test_executor_keeps_aliases_and_computed_columns() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let sql = "SELECT game_title AS game, ROUND(time_difference, 3) AS gap, COUNT(*) AS n \
               FROM personal_bests WHERE game_title = 'Celeste' AND category_name = 'Any%' \
               GROUP BY game_title";
    let rows = executor.execute(&check_read_only(sql).unwrap()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["game"], "Celeste");
    let gap = rows[0]["gap"].as_f64().unwrap();
    assert!((gap - 161.408).abs() < 1e-6, "gap = {}", gap);
    assert_eq!(rows[0]["n"], 1);
}

#[tokio::test]
async fn test_executor_null_and_text_values() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let sql = "SELECT notes, date FROM runs WHERE game_id = 2 AND category_id = 5";
    let rows = executor.execute(&check_read_only(sql).unwrap()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["notes"].is_null());
    assert_eq!(rows[0]["date"], "2023-06-02");
}

#[tokio::test]
async fn test_executor_empty_result_is_ok() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let sql = "SELECT * FROM games WHERE title = 'Tetris'";
    let rows = executor.execute(&check_read_only(sql).unwrap()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_executor_reports_engine_message() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let err = executor
        .execute(&check_read_only("SELECT nope FROM games").unwrap())
        .await
        .unwrap_err();
    assert!(err.message.contains("no such column"), "{}", err.message);

    let err = executor
        .execute(&check_read_only("SELECT * FROM leaderboard").unwrap())
        .await
        .unwrap_err();
    assert!(err.message.contains("no such table"), "{}", err.message);
}

#[tokio::test]
async fn test_executor_connection_is_read_only() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg.clone());

    // "REPLACE" is not on the denylist, so only the read-only connection stops it.
    let sql = "REPLACE INTO games (game_id, title, platform) VALUES (1, 'X', 'Y')";
    assert!(executor.execute(&check_read_only(sql).unwrap()).await.is_err());

    let rows = executor
        .execute(&check_read_only("SELECT title FROM games WHERE game_id = 1").unwrap())
        .await
        .unwrap();
    assert_eq!(rows[0]["title"], "Super Mario 64");
}

// ─── Full pipeline ──────────────────────────────────────────────────

#[tokio::test]
async fn test_super_mario_personal_bests_answered() {
    let (_tmp, cfg) = seeded_config().await;
    let model = ScriptedModel::new(&[PB_SQL, "You hold three Super Mario 64 personal bests."]);
    let assistant = build_assistant_with_model(cfg, model.clone());

    let question = Question::new("What are my personal best times for Super Mario 64?").unwrap();
    let outcome = assistant
        .handle_query(&question, PromptingMode::ZeroShot)
        .await;

    match outcome {
        QueryOutcome::Answered { answer, sql, data } => {
            assert_eq!(answer, "You hold three Super Mario 64 personal bests.");
            assert_eq!(sql, PB_SQL);
            assert_eq!(data.len(), 3);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_drop_table_never_reaches_database() {
    let (_tmp, cfg) = seeded_config().await;
    let model = ScriptedModel::new(&["DROP TABLE runs"]);
    let assistant = build_assistant_with_model(cfg.clone(), model.clone());

    let question = Question::new("Remove all my runs").unwrap();
    let response = answer_question(&assistant, &question, PromptingMode::FewShot).await;

    assert_eq!(response.outcome, "guard_rejected");
    assert_eq!(response.answer, "Error executing query: Only SELECT queries are allowed.");
    assert_eq!(response.mode, PromptingMode::FewShot);
    assert_eq!(response.sql.as_deref(), Some("DROP TABLE runs"));
    assert_eq!(model.calls(), 1);

    let executor = SqliteExecutor::new(cfg);
    let rows = executor
        .execute(&check_read_only("SELECT COUNT(*) AS n FROM runs").unwrap())
        .await
        .unwrap();
    assert_eq!(rows[0]["n"], 16);
}

#[tokio::test]
async fn test_unknown_title_is_empty_result_without_narration() {
    let (_tmp, cfg) = seeded_config().await;
    let sql = "SELECT r.completion_time FROM runs r JOIN games g ON r.game_id = g.game_id WHERE g.title = 'Tetris'";
    let model = ScriptedModel::new(&[sql, "narration must not be requested"]);
    let assistant = build_assistant_with_model(cfg, model.clone());

    let question = Question::new("What's my best Tetris run?").unwrap();
    let outcome = assistant
        .handle_query(&question, PromptingMode::ZeroShot)
        .await;

    assert_eq!(outcome, QueryOutcome::EmptyResult { sql: sql.into() });
    assert_eq!(outcome.message(), "I didn't find any data matching your question.");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_invalid_sql_is_execution_failure() {
    let (_tmp, cfg) = seeded_config().await;
    let model = ScriptedModel::new(&["SELECT speed FROM runs"]);
    let assistant = build_assistant_with_model(cfg, model.clone());

    let question = Question::new("How fast am I?").unwrap();
    let outcome = assistant
        .handle_query(&question, PromptingMode::ZeroShot)
        .await;

    match &outcome {
        QueryOutcome::ExecutionFailed { sql, reason } => {
            assert_eq!(sql, "SELECT speed FROM runs");
            assert!(reason.contains("no such column"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(outcome.message().starts_with("Error executing query: "));
    assert_eq!(model.calls(), 1);
}

// ─── Statement handling ─────────────────────────────────────────────

#[tokio::test]
async fn test_executor_refuses_second_statement() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    for sql in [
        "SELECT 1 AS a; SELECT 'x' AS b",
        "SELECT 1 AS a WHERE 0; SELECT title FROM games LIMIT 2",
    ] {
        let err = executor
            .execute(&check_read_only(sql).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.message, MULTIPLE_STATEMENTS, "sql = {}", sql);
    }
}

#[tokio::test]
async fn test_executor_accepts_trailing_semicolon() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let rows = executor
        .execute(&check_read_only("SELECT title FROM games WHERE game_id = 3;\n").unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Celeste");
}

#[tokio::test]
async fn test_executor_stringifies_non_finite_real() {
    let (_tmp, cfg) = seeded_config().await;
    let executor = SqliteExecutor::new(cfg);

    let rows = executor
        .execute(&check_read_only("SELECT 1e999 AS big, 2.5 AS small").unwrap())
        .await
        .unwrap();
    assert_eq!(rows[0]["big"], "inf");
    assert_eq!(rows[0]["small"], 2.5);
}

#[tokio::test]
async fn test_multi_statement_reply_is_execution_failure() {
    let (_tmp, cfg) = seeded_config().await;
    let sql = "SELECT 1 AS a; SELECT 'x' AS b";
    let model = ScriptedModel::new(&[sql, "narration must not be requested"]);
    let assistant = build_assistant_with_model(cfg, model.clone());

    let question = Question::new("Show me two things").unwrap();
    let outcome = assistant
        .handle_query(&question, PromptingMode::ZeroShot)
        .await;

    assert_eq!(
        outcome,
        QueryOutcome::ExecutionFailed {
            sql: sql.into(),
            reason: MULTIPLE_STATEMENTS.into(),
        }
    );
    assert_eq!(model.calls(), 1);
}
