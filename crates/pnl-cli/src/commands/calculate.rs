//! `pnl calculate`: ingest every input into one accumulator, replay once,
//! render.

use std::fs;

use anyhow::{bail, Context, Result};
use pnl_config::OutputFormat;
use pnl_ingest::{
    calculate, ingest_source, ingest_structured, to_json_pretty, trades_to_csv_string,
    Accumulator, SourceReport,
};
use tracing::info;

use super::{ingest_options, read_input, render, Settings};

/// One input path, tagged with how to read it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalculateInput {
    /// Broker CSV export (`-` for stdin).
    Export(String),
    /// JSON trade document.
    Json(String),
}

pub struct CalculateArgs {
    /// Inputs in accumulation order.
    pub inputs: Vec<CalculateInput>,
    pub broker: Option<String>,
    pub format: Option<OutputFormat>,
    pub out: Option<String>,
}

pub fn run(settings: &Settings, args: CalculateArgs) -> Result<()> {
    if args.inputs.is_empty() {
        bail!("no input: pass one or more CSV files ('-' for stdin) or --json-input");
    }

    let options = ingest_options(settings, args.broker.as_deref());
    let mut acc = Accumulator::new();
    let mut reports: Vec<SourceReport> = Vec::new();

    for input in &args.inputs {
        let (next, report) = match input {
            CalculateInput::Export(path) => {
                let source = read_input(path)?;
                ingest_source(acc, &source, &options)
                    .with_context(|| format!("ingest failed: {}", source.name))?
            }
            CalculateInput::Json(path) => {
                let source = read_input(path)?;
                let text = String::from_utf8(source.bytes)
                    .with_context(|| format!("json input must be UTF-8 text: {}", source.name))?;
                ingest_structured(acc, &source.name, &text)
                    .with_context(|| format!("ingest failed: {}", source.name))?
            }
        };
        acc = next;
        reports.push(report);
    }

    let result = calculate(&acc)?;

    let format = args.format.unwrap_or(settings.config.output.format);
    let rendered = match format {
        OutputFormat::Table => render::result_table(&result, &reports),
        OutputFormat::Csv => trades_to_csv_string(&result.trades)?,
        OutputFormat::Json => to_json_pretty(&result)?,
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("write output failed: {path}"))?;
            info!(path = %path, format = format.as_str(), "result written");
            println!("written={path}");
            println!("config_hash={}", settings.loaded.config_hash);
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
