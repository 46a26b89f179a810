//! Command handler modules for the `pnl` binary.
//!
//! Shared utilities used by multiple commands live here.

pub mod calculate;
pub mod detect;
pub mod render;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use pnl_config::{load_layered_yaml, LoadedConfig, PnlConfig};
use pnl_ingest::{BrokerSelector, IngestOptions, RawSource};

/// Source name used for standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Effective configuration for one invocation.
pub struct Settings {
    pub loaded: LoadedConfig,
    pub config: PnlConfig,
}

/// Merge config layers (none → all defaults), then apply env overrides.
pub fn load_settings(paths: &[String]) -> Result<Settings> {
    let loaded = if paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        load_layered_yaml(&path_refs)?
    };
    let config = PnlConfig::from_json(&loaded.config_json)?.with_env_overrides();
    Ok(Settings { loaded, config })
}

/// `--broker` flag > `PNL_BROKER` > `ingest.broker`.
pub fn ingest_options(settings: &Settings, broker_flag: Option<&str>) -> IngestOptions {
    let raw = broker_flag.unwrap_or(&settings.config.ingest.broker);
    IngestOptions {
        selector: BrokerSelector::parse(raw),
        allowed_extensions: settings.config.ingest.allowed_extensions.clone(),
    }
}

/// Read a file argument; `-` means stdin.
pub fn read_input(path: &str) -> Result<RawSource> {
    if path == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("read stdin failed")?;
        return Ok(RawSource::new(STDIN_NAME, bytes));
    }
    RawSource::from_path(Path::new(path)).with_context(|| format!("read input failed: {path}"))
}
