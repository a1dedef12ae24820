//! # Speedrun Query Core
//!
//! Shared, I/O-free logic for the speedrun query assistant: data models,
//! prompt construction, the read-only query guard, the outcome type, the
//! model and store traits, and the pipeline that turns a question into an
//! answer.
//!
//! This crate contains no tokio, sqlx, reqwest, or filesystem I/O. The
//! concrete language-model client and SQLite executor live in the
//! `speedrun-query` app crate and are injected through [`llm::CompletionModel`]
//! and [`store::QueryStore`].
//!
//! ```text
//! question ─▶ prompt ─▶ generate ─▶ guard ─▶ execute ─▶ narrate ─▶ outcome
//! ```

pub mod guard;
pub mod llm;
pub mod models;
pub mod outcome;
pub mod pipeline;
pub mod prompt;
pub mod store;
