//! `pnl` command-line entry point.
//!
//! Parses arguments, loads layered config, installs tracing (stderr, so
//! stdout stays machine-readable) and dispatches to `commands`.

mod commands;

use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use commands::calculate::CalculateInput;
use pnl_config::{report_unused_keys, OutputFormat, UnusedKeyPolicy};

#[derive(Parser)]
#[command(name = "pnl")]
#[command(about = "Broker trade export normalizer and realized P&L ledger", long_about = None)]
struct Cli {
    /// Layered config YAML paths in merge order (base -> local -> ...)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    /// Fail instead of warn when the config has keys nothing reads
    #[arg(long, global = true, default_value_t = false)]
    strict_config: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest broker exports and compute realized P&L
    Calculate {
        /// CSV exports ('-' reads stdin); accumulated in command-line order
        files: Vec<String>,

        /// JSON trade documents (array or {"trades": [...], "broker": ...});
        /// interleaved with the CSV exports in command-line order
        #[arg(long = "json-input")]
        json_inputs: Vec<String>,

        /// Broker profile (any | generic | ibkr | robinhood); overrides config and PNL_BROKER
        #[arg(long)]
        broker: Option<String>,

        /// Output format; overrides output.format from config
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write the result here instead of stdout
        #[arg(long)]
        out: Option<String>,
    },

    /// Show which broker profile each file matches and how its columns map
    Detect {
        #[arg(required = true)]
        files: Vec<String>,

        /// Force a broker profile instead of detecting
        #[arg(long)]
        broker: Option<String>,

        /// Print the detection reports as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List supported broker profiles in detection order
    Profiles,

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Table,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent when missing.
    let _ = dotenvy::from_filename(".env.local");

    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let settings = commands::load_settings(&cli.config_paths)?;
    init_tracing(&settings.config.logging.filter);

    let policy = if cli.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    report_unused_keys(&settings.loaded.config_json, policy)?;

    match cli.cmd {
        Commands::Calculate {
            files,
            json_inputs,
            broker,
            format,
            out,
        } => commands::calculate::run(
            &settings,
            commands::calculate::CalculateArgs {
                inputs: calculate_inputs(matches.subcommand_matches("calculate"), files, json_inputs),
                broker,
                format: format.map(OutputFormat::from),
                out,
            },
        )?,

        Commands::Detect {
            files,
            broker,
            json,
        } => commands::detect::run(&settings, &files, broker.as_deref(), json)?,

        Commands::Profiles => commands::detect::print_profiles(),

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = pnl_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Interleave positional exports and `--json-input` documents by their
/// position on the command line.
fn calculate_inputs(
    matches: Option<&ArgMatches>,
    files: Vec<String>,
    json_inputs: Vec<String>,
) -> Vec<CalculateInput> {
    let indices = |id: &str| -> Vec<usize> {
        matches
            .and_then(|m| m.indices_of(id))
            .map(|i| i.collect())
            .unwrap_or_default()
    };

    let mut tagged: Vec<(usize, CalculateInput)> = indices("files")
        .into_iter()
        .zip(files.into_iter().map(CalculateInput::Export))
        .chain(
            indices("json_inputs")
                .into_iter()
                .zip(json_inputs.into_iter().map(CalculateInput::Json)),
        )
        .collect();
    tagged.sort_by_key(|(i, _)| *i);
    tagged.into_iter().map(|(_, input)| input).collect()
}

/// `RUST_LOG` wins; otherwise the configured filter (default `warn`).
fn init_tracing(configured: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(configured))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
