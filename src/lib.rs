//! # Speedrun Query
//!
//! **Ask plain-English questions about a personal speedrun log.**
//!
//! A question is translated to SQL by a language model, checked against a
//! read-only keyword denylist, executed against a local SQLite database, and
//! narrated back as a conversational answer. The raw SQL and result rows are
//! always returned alongside the answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────┐   ┌──────────┐   ┌──────────────┐
//! │ Question │──▶│ LLM: to SQL  │──▶│ Guard │──▶│  SQLite  │──▶│ LLM: narrate │
//! └──────────┘   └──────────────┘   └───────┘   └──────────┘   └──────┬───────┘
//!                                                                     │
//!                                 ┌───────────────────────────────────┤
//!                                 ▼                                   ▼
//!                            ┌──────────┐                       ┌──────────┐
//!                            │   CLI    │                       │   HTTP   │
//!                            │  (srq)   │                       │ form UI  │
//!                            └──────────┘                       └──────────┘
//! ```
//!
//! The pipeline itself (prompts, guard, outcome type, orchestration) lives in
//! the `speedrun-query-core` crate. This crate supplies the concrete
//! collaborators: the OpenAI client, the SQLite executor, configuration,
//! schema bootstrap, and the two front-ends.
//!
//! ## Quick Start
//!
//! ```bash
//! srq init                                   # create and seed the database
//! srq samples                                # list example questions
//! srq ask "What's my fastest speedrun ever?" --mode few-shot
//! srq serve                                  # start the web form
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connections |
//! | [`migrate`] | Schema bootstrap and seed data |
//! | [`executor`] | SQLite `QueryStore` implementation |
//! | [`openai`] | OpenAI chat-completions `CompletionModel` |
//! | [`assistant`] | Builds the pipeline from config |
//! | [`response`] | Timed request envelope shared by CLI and server |
//! | [`ask`] | `srq ask` command |
//! | [`server`] | HTTP form UI and JSON API |
//! | [`samples`] | Sample questions |
//! | [`format`] | Time and table formatting |

pub mod ask;
pub mod assistant;
pub mod config;
pub mod db;
pub mod executor;
pub mod format;
pub mod migrate;
pub mod openai;
pub mod response;
pub mod samples;
pub mod server;

pub use speedrun_query_core as core;
