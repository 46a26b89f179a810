//! `pnl detect` and `pnl profiles`.

use anyhow::{Context, Result};
use pnl_ingest::{detect_source, BrokerId, DetectionReport};

use super::{ingest_options, read_input, Settings};

pub fn run(settings: &Settings, files: &[String], broker: Option<&str>, json: bool) -> Result<()> {
    let options = ingest_options(settings, broker);

    let mut reports: Vec<DetectionReport> = Vec::with_capacity(files.len());
    for path in files {
        let source = read_input(path)?;
        let report = detect_source(&source, &options)
            .with_context(|| format!("detect failed: {}", source.name))?;
        reports.push(report);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("serialize detection reports")?
        );
        return Ok(());
    }

    for r in &reports {
        println!("source={} broker={} name=\"{}\"", r.source, r.broker, r.broker_name);
        for m in &r.matched_columns {
            println!(
                "  field={} column={}",
                m.field,
                m.column.as_deref().unwrap_or("<missing>")
            );
        }
    }
    Ok(())
}

pub fn print_profiles() {
    for id in BrokerId::DETECTION_ORDER {
        let p = id.profile();
        let detect = if p.detection_headers.is_empty() {
            "<always>".to_string()
        } else {
            p.detection_headers.join("+")
        };
        println!("{} name=\"{}\" detect={}", id, p.name, detect);
    }
}
