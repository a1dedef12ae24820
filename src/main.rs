//! # Speedrun Query CLI (`srq`)
//!
//! The `srq` binary creates the speedrun database, answers questions from
//! the terminal, and serves the web form.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `srq init` | Create the SQLite schema and load the sample speedrun log |
//! | `srq samples` | List sample questions |
//! | `srq ask "<question>"` | Answer a question and show the SQL and rows |
//! | `srq serve` | Start the HTTP form UI |
//!
//! ## Examples
//!
//! ```bash
//! srq init --config ./config/srq.toml
//! srq ask "How close am I to the world record for Hollow Knight Any%?" --mode few-shot
//! srq ask "How many runs did I do in 2023?" --json
//! srq serve
//! ```

use clap::{Parser, Subcommand};
use speedrun_query::core::models::{PromptingMode, Question};
use speedrun_query::{ask, assistant, config, migrate, samples, server};
use std::path::PathBuf;
use std::sync::Arc;

/// Speedrun Query: ask plain-English questions about your speedrun log.
///
/// All commands except `samples` read a TOML configuration file given by
/// `--config`. See `config/srq.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "srq",
    about = "Ask plain-English questions about your speedrun log",
    version,
    long_about = "Speedrun Query translates natural-language questions into SQL with a language \
    model, runs the read-only query against a local SQLite speedrun log, and explains the \
    result in plain English."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/srq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema and load the sample data.
    ///
    /// Safe to run repeatedly: seed data is only loaded into an empty database.
    Init {
        /// Delete the existing database file first.
        #[arg(long)]
        reset: bool,
    },

    /// List sample questions.
    Samples,

    /// Answer a question.
    Ask {
        /// The question, in plain English.
        question: String,

        /// Prompting mode: `zero-shot` or `few-shot`. Defaults to `[prompting].default_mode`.
        #[arg(long)]
        mode: Option<PromptingMode>,

        /// Print the JSON response instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server with the question form.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't need a config file
    if let Commands::Samples = cli.command {
        samples::list_samples();
        return Ok(());
    }

    let cfg = Arc::new(config::load_config(&cli.config)?);

    match cli.command {
        Commands::Init { reset } => {
            let report = migrate::setup_database(&cfg, reset).await?;
            if report.seeded {
                println!("Database initialized with {} sample runs.", report.runs);
            } else {
                println!("Database already initialized ({} runs).", report.runs);
            }
        }
        Commands::Ask {
            question,
            mode,
            json,
        } => {
            let question = Question::new(question)?;
            let mode = match mode {
                Some(m) => m,
                None => cfg.prompting.mode()?,
            };
            let assistant = assistant::build_assistant(cfg.clone())?;
            ask::run_ask(&assistant, &question, mode, json).await?;
        }
        Commands::Serve => {
            let assistant = assistant::build_assistant(cfg.clone())?;
            server::run_server(&cfg, assistant).await?;
        }
        Commands::Samples => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
