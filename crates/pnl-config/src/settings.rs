//! Typed view of the effective configuration.
//!
//! ```yaml
//! ingest:
//!   broker: any                # any | auto | generic | ibkr | robinhood
//!   allowed_extensions: [csv, txt]
//! output:
//!   format: table              # table | csv | json
//! logging:
//!   filter: warn               # tracing EnvFilter directive
//! ```
//!
//! Every key is optional. `PNL_BROKER` in the environment overrides
//! `ingest.broker`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Environment variable overriding `ingest.broker`.
pub const BROKER_ENV_VAR: &str = "PNL_BROKER";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PnlConfig {
    pub ingest: IngestSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Broker selector string; parsed by the ingest layer.
    pub broker: String,
    pub allowed_extensions: Vec<String>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            broker: "any".to_string(),
            allowed_extensions: vec!["csv".to_string(), "txt".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl PnlConfig {
    /// Deserialize from the merged config JSON; missing keys take defaults.
    /// Unknown keys are ignored here and reported by
    /// [`crate::report_unused_keys`].
    pub fn from_json(config_json: &Value) -> Result<Self> {
        serde_json::from_value(config_json.clone()).context("config does not match the expected shape")
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup` (blank values are ignored).
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(broker) = lookup(BROKER_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(var = BROKER_ENV_VAR, broker = %broker, "broker overridden from environment");
            self.ingest.broker = broker.trim().to_string();
        }
        self
    }
}
