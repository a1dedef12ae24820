//! Composition root: wires config into the core [`Assistant`].

use anyhow::Result;
use speedrun_query_core::llm::CompletionModel;
use speedrun_query_core::pipeline::{Assistant, ModelSettings};
use std::sync::Arc;

use crate::config::Config;
use crate::executor::SqliteExecutor;
use crate::openai;

pub fn model_settings(config: &Config) -> ModelSettings {
    ModelSettings {
        model: config.llm.model.clone(),
        narration_temperature: config.llm.narration_temperature,
    }
}

/// Build the assistant with the configured model client and the SQLite executor.
pub fn build_assistant(config: Arc<Config>) -> Result<Assistant> {
    let model: Arc<dyn CompletionModel> = Arc::from(openai::create_model(&config)?);
    Ok(build_assistant_with_model(config, model))
}

/// Build the assistant around a caller-supplied model (used by tests and
/// custom front-ends).
pub fn build_assistant_with_model(config: Arc<Config>, model: Arc<dyn CompletionModel>) -> Assistant {
    let settings = model_settings(&config);
    let store = Arc::new(SqliteExecutor::new(config));
    Assistant::new(model, store, settings)
}
