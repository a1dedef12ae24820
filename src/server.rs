//! HTTP server: the single-page form UI and its JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Question form with answer and technical details |
//! | `GET`  | `/api/samples` | Sample questions |
//! | `POST` | `/api/query` | Answer a question |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Request errors use one shape:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "question must not be empty" } }
//! ```
//!
//! Pipeline outcomes (including generation, guard, and execution failures)
//! are not HTTP errors: they return `200` with the outcome tag in the body.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use speedrun_query_core::models::{PromptingMode, Question};
use speedrun_query_core::pipeline::Assistant;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::response::{answer_question, QueryResponse};
use crate::samples::SAMPLE_QUESTIONS;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    assistant: Arc<Assistant>,
    default_mode: PromptingMode,
}

/// Starts the HTTP server on `[server].bind` and runs until the process ends.
pub async fn run_server(config: &Config, assistant: Assistant) -> anyhow::Result<()> {
    let state = AppState {
        assistant: Arc::new(assistant),
        default_mode: config.prompting.mode()?,
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "server listening");
    println!("Speedrun assistant listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index))
        .route("/api/samples", get(handle_samples))
        .route("/api/query", post(handle_query))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ GET / ============

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/samples ============

#[derive(Serialize)]
struct SamplesResponse {
    questions: Vec<&'static str>,
}

async fn handle_samples() -> Json<SamplesResponse> {
    Json(SamplesResponse {
        questions: SAMPLE_QUESTIONS.to_vec(),
    })
}

// ============ POST /api/query ============

#[derive(Debug, Deserialize)]
struct QueryRequest {
    question: String,
    #[serde(default)]
    mode: Option<String>,
}

/// Validate the request body into a question and a prompting mode.
fn parse_request(
    req: &QueryRequest,
    default_mode: PromptingMode,
) -> Result<(Question, PromptingMode), AppError> {
    let question = Question::new(req.question.as_str()).map_err(|e| bad_request(e.to_string()))?;
    let mode = match req.mode.as_deref() {
        Some(m) => m.parse::<PromptingMode>().map_err(bad_request)?,
        None => default_mode,
    };
    Ok((question, mode))
}

async fn handle_query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let (question, mode) = parse_request(&req, state.default_mode)?;
    Ok(Json(answer_question(&state.assistant, &question, mode).await))
}
