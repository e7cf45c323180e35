//! Headless dexquery browser.
//!
//! Reads intents as JSON lines on stdin, applies them to a browser over a
//! local dataset file, and writes a snapshot to stdout after every visible
//! change. It is a reference presentation layer and a way to drive the
//! core from scripts.
//!
//! ```text
//! stdin  ─ {"intent":"set_search_text","text":"fir"} ─┐
//!                                                      ├─▶ Browser ─▶ snapshot ─▶ stdout
//! worker ─ FetchIssued / PageLoaded / ... ────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! dexquery --data dex.json [--config dexquery.toml] [--dataset pokemon] [--format text]
//!          [--set debounce_ms=150 --set log_level=debug ...]
//! ```
//!
//! The dataset file maps dataset keys to item arrays:
//! `{ "abilities": [{ "name": "Blaze", "type": "Fire" }, ...] }`.
//!
//! When stdin closes, pending fetches are allowed to finish and the final
//! snapshot is written before exiting.

use clap::{Parser, ValueEnum};
use dexquery::source::MemorySource;
use dexquery::{observability, ui, Browser, Config, Event, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

#[derive(Debug, Parser)]
#[command(name = "dexquery")]
#[command(version, about = "Browse monster datasets with debounced queries from JSON intents")]
struct Cli {
    /// JSON file with the items of each dataset.
    #[arg(long)]
    data: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset to open first, overriding the configuration.
    #[arg(long)]
    dataset: Option<String>,

    /// Configuration override, repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    /// Snapshot output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_override(arg: &str) -> std::result::Result<(String, String), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dexquery: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let overrides: BTreeMap<String, String> = cli.overrides.into_iter().collect();
    let mut config = base.with_overrides(&overrides);
    if let Some(dataset) = cli.dataset {
        config.default_dataset = dataset;
    }

    observability::init_tracing(&config)?;
    tracing::info!(data = ?cli.data, dataset = %config.default_dataset, "starting dexquery");

    let source = MemorySource::from_json_file(&cli.data)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(&config, source, cli.format))
}

async fn serve(config: &Config, source: MemorySource, format: OutputFormat) -> Result<()> {
    let mut browser = Browser::new(config, Arc::new(source))?;
    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    browser.start()?;
    emit(&mut out, &browser, format).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed, settling");
                    break;
                };
                if apply_line(&mut out, &mut browser, &line).await? {
                    emit(&mut out, &browser, format).await?;
                }
            }
            response = browser.next_response() => {
                let Some(response) = response else { break };
                if browser.dispatch(&Event::WorkerResponse(response))? {
                    emit(&mut out, &browser, format).await?;
                }
            }
        }
    }

    if browser.settle().await? {
        emit(&mut out, &browser, format).await?;
    }
    Ok(())
}

/// Parses and applies one intent line. Bad lines are reported and skipped.
async fn apply_line(out: &mut Stdout, browser: &mut Browser, line: &str) -> Result<bool> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(false);
    }

    let outcome = serde_json::from_str::<Event>(line)
        .map_err(dexquery::DexError::from)
        .and_then(|event| browser.dispatch(&event));

    match outcome {
        Ok(render) => Ok(render),
        Err(e) => {
            tracing::warn!(error = %e, input = %line, "rejected intent");
            let report = serde_json::json!({ "error": e.to_string() });
            out.write_all(format!("{report}\n").as_bytes()).await?;
            out.flush().await?;
            Ok(false)
        }
    }
}

async fn emit(out: &mut Stdout, browser: &Browser, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&browser.viewmodel())?,
        OutputFormat::Text => ui::render(browser.state()),
    };
    out.write_all(rendered.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
