use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use multipinch::PinchArea;
use multipinch::config::{ConfigError, PinchConfig};
use multipinch::script::{self, ScriptError, SignalCounts};
use multipinch::velocity::ManualClock;
use tracing::Level;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("script error: {0}")]
    Script(#[from] ScriptError),
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "pinch-replay", about = "Replay recorded pointer input through the pinch recognizer")]
struct Cli {
    /// JSON-lines input script; reads stdin when omitted.
    script: Option<PathBuf>,

    /// Wheel sensitivity multiplier (overrides PINCH_WHEEL_FACTOR).
    #[arg(long)]
    wheel_factor: Option<f64>,

    /// Spread needed to start a multi-touch gesture (overrides PINCH_START_THRESHOLD).
    #[arg(long)]
    start_threshold: Option<f64>,

    /// Print signal totals instead of every signal.
    #[arg(long)]
    summary: bool,

    /// Log every transition to stderr.
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::TRACE } else { Level::INFO })
        .init();

    if let Err(err) = run(cli) {
        tracing::error!(%err, "replay failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = PinchConfig::from_env()?;
    if let Some(wheel_factor) = cli.wheel_factor {
        config.wheel_factor = wheel_factor;
    }
    if let Some(start_threshold) = cli.start_threshold {
        config.start_threshold = start_threshold;
    }
    config.validate()?;

    let lines = match &cli.script {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Open { path: path.clone(), source })?;
            script::parse_script(BufReader::new(file))?
        }
        None => script::parse_script(io::stdin().lock())?,
    };
    tracing::info!(events = lines.len(), "script loaded");

    let clock = ManualClock::new();
    let mut area = PinchArea::with_clock(config, clock.clone());
    let records = script::replay(&mut area, &clock, &lines)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.summary {
        serde_json::to_writer(&mut out, &SignalCounts::from_records(&records))?;
        writeln!(out)?;
    } else {
        for record in &records {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
