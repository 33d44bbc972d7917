//! Headless flight replay
//!
//! Loads a CSV flight log, prints what the engine derived from it and plays
//! the flight back through the scrub timeline.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use fr_core::{CursorSubscriber, EngineConfig, TelemetrySession};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod loader;
mod readout;

use readout::ReadoutView;

/// Command-line options
#[derive(Debug, PartialEq)]
struct Options {
    input: PathBuf,
    config: Option<PathBuf>,
    play: bool,
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut input = None;
        let mut config = None;
        let mut play = true;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config needs a file argument")?;
                    config = Some(PathBuf::from(path));
                }
                "--no-play" => play = false,
                flag if flag.starts_with("--") => bail!("Unknown option {}", flag),
                _ if input.is_none() => input = Some(PathBuf::from(&arg)),
                _ => bail!("Unexpected argument {}", arg),
            }
        }

        Ok(Self {
            input: input.context("Usage: fr-replay <flight.csv> [--config cfg.json] [--no-play]")?,
            config,
            play,
        })
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            EngineConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn print_analysis(session: &TelemetrySession) {
    if let Some(channels) = session.channels() {
        println!("Channels:");
        for (name, role) in channels.iter() {
            println!("  {:<24} {:?}", name, role);
        }
    }

    let markers = session.phase_markers();
    if markers.is_empty() {
        println!("Phases: not available");
    } else {
        println!("Phases:");
        for marker in markers {
            println!("  {:<8} row {:>6}  t={:.2}s", marker.phase.name(), marker.index, marker.time);
        }
    }

    if let Some(summary) = session.summary() {
        println!("Summary:");
        for line in summary.lines() {
            println!("  {}", line);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = Options::parse(env::args().skip(1))?;
    let config = load_config(options.config.as_deref())?;
    let table = loader::load_csv(&options.input)?;

    let mut session = TelemetrySession::new(config)?;
    let source_name = options.input.display().to_string();
    let report = session
        .load(source_name.as_str(), Arc::new(table))
        .with_context(|| format!("Failed to load {}", source_name))?;

    for problem in &report.degraded {
        warn!("{}", problem);
    }
    print_analysis(&session);

    let view: Arc<dyn CursorSubscriber> = Arc::new(ReadoutView::new(session.phases().clone()));
    session.bus().subscribe(view.clone());

    if !options.play {
        if let Some(frame) = session.current_frame() {
            view.on_cursor_change(&frame)?;
        }
        return Ok(());
    }

    if !session.play() {
        info!("Nothing to play back");
        return Ok(());
    }

    let mut ticker = tokio::time::interval(session.timeline().tick_interval());
    ticker.tick().await;
    while session.timeline().is_playing() {
        ticker.tick().await;
        if let Some(report) = session.tick() {
            for failure in &report.failures {
                warn!("View {:?} failed: {}", failure.subscription, failure.reason);
            }
        }
    }

    info!("Replay finished at row {}", session.state().index);
    Ok(())
}
