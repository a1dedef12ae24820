//! Core data models that flow through the question-to-answer pipeline.
//!
//! All values here are per-request and transient; the persistent speedrun
//! data (games, categories, runs) belongs to the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single result row: column name (as reported by the query) to scalar value.
///
/// Column order follows the query's projection.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Ordered rows returned by one query. Empty is a valid result, not an error.
pub type ResultSet = Vec<Row>;

/// A non-empty natural-language question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    /// Validate and wrap a question. Whitespace-only input is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyQuestion> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyQuestion);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returned by [`Question::new`] for empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyQuestion;

impl fmt::Display for EmptyQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("question must not be empty")
    }
}

impl std::error::Error for EmptyQuestion {}

/// Which prompt variant the generator receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptingMode {
    /// Schema and rules only.
    #[default]
    ZeroShot,
    /// Schema, worked examples, then rules.
    FewShot,
}

impl PromptingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptingMode::ZeroShot => "zero-shot",
            PromptingMode::FewShot => "few-shot",
        }
    }
}

impl fmt::Display for PromptingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero-shot" | "zero_shot" | "zeroshot" => Ok(PromptingMode::ZeroShot),
            "few-shot" | "few_shot" | "fewshot" => Ok(PromptingMode::FewShot),
            other => Err(format!(
                "Unknown prompting mode: '{}'. Use zero-shot or few-shot.",
                other
            )),
        }
    }
}

/// System instruction and user message for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// A worked question/SQL pair embedded in few-shot prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FewShotExample {
    pub question: &'static str,
    pub sql: &'static str,
}
