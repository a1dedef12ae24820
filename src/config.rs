use anyhow::{Context, Result};
use serde::Deserialize;
use speedrun_query_core::models::PromptingMode;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub prompting: PromptingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// Overrides the bundled schema script.
    #[serde(default)]
    pub setup_sql: Option<PathBuf>,
    /// Overrides the bundled seed script.
    #[serde(default)]
    pub seed_sql: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub narration_temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            narration_temperature: None,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

impl LlmConfig {
    /// API key from config, falling back to the `api_key_env` variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env).map_err(|_| {
            anyhow::anyhow!(
                "No API key: set llm.api_key or the {} environment variable",
                self.api_key_env
            )
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptingConfig {
    #[serde(default = "default_mode")]
    pub default_mode: String,
}

impl Default for PromptingConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
        }
    }
}

fn default_mode() -> String {
    "zero-shot".to_string()
}

impl PromptingConfig {
    pub fn mode(&self) -> Result<PromptingMode> {
        self.default_mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!("prompting.default_mode: {}", e))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    // Validate llm
    match config.llm.provider.as_str() {
        "openai" => {}
        other => anyhow::bail!("Unknown llm provider: '{}'. Must be openai.", other),
    }

    if config.llm.model.trim().is_empty() {
        anyhow::bail!("llm.model must not be empty");
    }

    if config.llm.timeout_secs == 0 {
        anyhow::bail!("llm.timeout_secs must be > 0");
    }

    if let Some(t) = config.llm.narration_temperature {
        if !(0.0..=2.0).contains(&t) {
            anyhow::bail!("llm.narration_temperature must be in [0.0, 2.0]");
        }
    }

    // Validate prompting
    config.prompting.mode()?;

    Ok(config)
}
