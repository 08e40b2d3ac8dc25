use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Per-stage deadline used when `AGENT_TIMEOUT_MS` is not set.
pub const DEFAULT_AGENT_TIMEOUT_MS: u64 = 90_000;
/// Pause between stages used when `STAGE_DELAY_MS` is not set.
pub const DEFAULT_STAGE_DELAY_MS: u64 = 1_000;

/// How agents ask the model for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Send a tool schema and read the tool-call arguments.
    Structured,
    /// No tool; the prompt asks for JSON and the text reply is decoded leniently.
    Text,
}

/// Everything the orchestrator needs to know about the remote endpoint and pacing.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub agent_timeout: Duration,
    pub stage_delay: Duration,
    pub output_mode: OutputMode,
    pub seed: Option<u64>,
}

impl PipelineConfig {
    /// Defaults for everything except the endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            agent_timeout: Duration::from_millis(DEFAULT_AGENT_TIMEOUT_MS),
            stage_delay: Duration::from_millis(DEFAULT_STAGE_DELAY_MS),
            output_mode: OutputMode::Structured,
            seed: None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub completion_endpoint: String,
    pub completion_api_key: Option<String>,
    pub completion_model: String,
    pub agent_timeout_ms: u64,
    pub stage_delay_ms: u64,
    pub structured_output: bool,
    pub completion_seed: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            completion_endpoint: require_env("COMPLETION_ENDPOINT")?,
            completion_api_key: std::env::var("COMPLETION_API_KEY").ok(),
            completion_model: std::env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            agent_timeout_ms: parse_env("AGENT_TIMEOUT_MS", DEFAULT_AGENT_TIMEOUT_MS)?,
            stage_delay_ms: parse_env("STAGE_DELAY_MS", DEFAULT_STAGE_DELAY_MS)?,
            structured_output: parse_env("STRUCTURED_OUTPUT", true)?,
            completion_seed: std::env::var("COMPLETION_SEED")
                .ok()
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("COMPLETION_SEED must be an unsigned integer")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            api_key: self.completion_api_key.clone(),
            model: self.completion_model.clone(),
            agent_timeout: Duration::from_millis(self.agent_timeout_ms),
            stage_delay: Duration::from_millis(self.stage_delay_ms),
            output_mode: if self.structured_output {
                OutputMode::Structured
            } else {
                OutputMode::Text
            },
            seed: self.completion_seed,
            ..PipelineConfig::new(self.completion_endpoint.clone())
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
