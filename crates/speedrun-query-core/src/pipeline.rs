//! The question-to-answer pipeline.
//!
//! [`Assistant::handle_query`] sequences the stages and converts every
//! failure into a terminal [`QueryOutcome`]:
//!
//! ```text
//! Generating ──fail/sentinel──▶ GenerationFailed
//!     │
//! Guarding ────denylist hit───▶ GuardRejected
//!     │
//! Executing ───engine error───▶ ExecutionFailed
//!     │    └───zero rows──────▶ EmptyResult
//!     │
//! Narrating ──────────────────▶ Answered
//! ```
//!
//! Only a non-empty result reaches narration, so one request makes at most
//! two model calls. Nothing is retried.

use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::guard::check_read_only;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::models::{PromptPair, PromptingMode, Question, Row};
use crate::outcome::QueryOutcome;
use crate::prompt::{build_narration_prompt, build_prompt, UNANSWERABLE_SENTINEL};
use crate::store::QueryStore;

/// Sampling temperature for SQL generation.
pub const GENERATION_TEMPERATURE: f32 = 0.0;

/// Model parameters shared by both completion calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    /// Model identifier sent with every request (e.g. `"gpt-4o"`).
    pub model: String,
    /// Temperature for narration; `None` keeps the provider default.
    pub narration_temperature: Option<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            narration_temperature: None,
        }
    }
}

/// Send the translation prompt and return the trimmed SQL text.
///
/// Exactly one completion request, at temperature 0. Errors from the model
/// are returned; an empty reply is an error too.
pub async fn generate_sql<M: CompletionModel + ?Sized>(
    model: &M,
    settings: &ModelSettings,
    prompt: &PromptPair,
) -> Result<String> {
    let request =
        CompletionRequest::from_prompt(&settings.model, prompt, Some(GENERATION_TEMPERATURE));
    let text = model.complete(&request).await?;
    let sql = text.trim();
    if sql.is_empty() {
        bail!("model returned no text");
    }
    Ok(sql.to_string())
}

/// Ask the model to answer `question` from `rows`.
///
/// Never fails: any error becomes `"Error interpreting results: {detail}"`.
pub async fn narrate<M: CompletionModel + ?Sized>(
    model: &M,
    settings: &ModelSettings,
    question: &str,
    sql: &str,
    rows: &[Row],
) -> String {
    match request_narration(model, settings, question, sql, rows).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(error = %e, "narration failed");
            format!("Error interpreting results: {}", e)
        }
    }
}

async fn request_narration<M: CompletionModel + ?Sized>(
    model: &M,
    settings: &ModelSettings,
    question: &str,
    sql: &str,
    rows: &[Row],
) -> Result<String> {
    let prompt = build_narration_prompt(question, sql, rows)?;
    let request =
        CompletionRequest::from_prompt(&settings.model, &prompt, settings.narration_temperature);
    model.complete(&request).await
}

/// Composes a language model and a store into the full pipeline.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct Assistant {
    model: Arc<dyn CompletionModel>,
    store: Arc<dyn QueryStore>,
    settings: ModelSettings,
}

impl Assistant {
    pub fn new(
        model: Arc<dyn CompletionModel>,
        store: Arc<dyn QueryStore>,
        settings: ModelSettings,
    ) -> Self {
        Self {
            model,
            store,
            settings,
        }
    }

    /// Answer one question end to end.
    #[instrument(
        skip_all,
        fields(mode = %mode, provider = %self.model.name(), model = %self.settings.model)
    )]
    pub async fn handle_query(&self, question: &Question, mode: PromptingMode) -> QueryOutcome {
        let prompt = build_prompt(question.as_str(), mode);

        let sql = match generate_sql(self.model.as_ref(), &self.settings, &prompt).await {
            Ok(sql) if sql == UNANSWERABLE_SENTINEL => {
                info!("model reported the question as unanswerable");
                return QueryOutcome::GenerationFailed;
            }
            Ok(sql) => sql,
            Err(e) => {
                warn!(error = %e, "SQL generation failed");
                return QueryOutcome::GenerationFailed;
            }
        };
        debug!(%sql, "generated SQL");

        let guarded = match check_read_only(&sql) {
            Ok(guarded) => guarded,
            Err(rejection) => {
                warn!(keyword = rejection.keyword, "generated SQL rejected by guard");
                return QueryOutcome::GuardRejected {
                    sql,
                    reason: rejection.reason().to_string(),
                };
            }
        };

        let rows = match self.store.execute(&guarded).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "query execution failed");
                return QueryOutcome::ExecutionFailed {
                    sql,
                    reason: e.message,
                };
            }
        };

        if rows.is_empty() {
            info!("query matched no rows");
            return QueryOutcome::EmptyResult { sql };
        }
        info!(rows = rows.len(), "query executed");

        let answer = narrate(
            self.model.as_ref(),
            &self.settings,
            question.as_str(),
            &sql,
            &rows,
        )
        .await;

        QueryOutcome::Answered {
            answer,
            sql,
            data: rows,
        }
    }
}
