//! # scamwatch
//!
//! Command-line front end for the streaming scam-likelihood engine.

#![deny(unsafe_code)]

mod demo;
mod output;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scamwatch_core::SessionId;
use scamwatch_engine::Coordinator;
use scamwatch_rules::RuleTable;
use scamwatch_settings::{LogFormat, ScamwatchSettings};
use tokio::io::BufReader;
use tracing::info;

/// Streaming scam-likelihood scoring.
#[derive(Parser, Debug)]
#[command(name = "scamwatch", version, about = "Score live call transcripts for scam patterns")]
struct Cli {
    /// Settings file (defaults to `~/.scamwatch/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// JSON rule table (overrides `rules.path`; built-in table when unset).
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Log level or filter directive (overrides `logging.level`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one piece of text as a single final segment.
    Check {
        /// Text to score.
        text: String,
    },
    /// Replay JSON-lines transcript input, writing events as JSON lines.
    Replay {
        /// Input file (stdin when omitted).
        file: Option<PathBuf>,
    },
    /// List the loaded rule table.
    Rules {
        /// Print the table in the JSON rule file format.
        #[arg(long)]
        json: bool,
    },
    /// Stream a simulated scam call.
    Demo,
}

fn load_settings(cli: &Cli) -> Result<ScamwatchSettings> {
    let mut settings = match &cli.settings {
        Some(path) => scamwatch_settings::load_settings_from_path(path)
            .with_context(|| format!("failed to load settings: {}", path.display()))?,
        None => scamwatch_settings::load_settings().context("failed to load settings")?,
    };
    if let Some(level) = &cli.log_level {
        settings.logging.level.clone_from(level);
    }
    if let Some(path) = &cli.rules {
        settings.rules.path = Some(path.display().to_string());
    }
    Ok(settings)
}

fn init_logging(settings: &ScamwatchSettings) {
    match settings.logging.format {
        LogFormat::Compact => scamwatch_core::logging::init_subscriber(&settings.logging.level),
        LogFormat::Json => scamwatch_core::logging::init_json_subscriber(&settings.logging.level),
    }
}

fn load_table(settings: &ScamwatchSettings) -> Result<Arc<RuleTable>> {
    let path = settings.rules.path.as_deref().map(Path::new);
    let table = scamwatch_engine::load_rule_table(path).with_context(|| match path {
        Some(p) => format!("invalid rule table: {}", p.display()),
        None => "invalid built-in rule table".to_owned(),
    })?;
    Ok(Arc::new(table))
}

fn print_rules(table: &RuleTable, json: bool) -> Result<()> {
    if json {
        println!("{}", table.to_json_string()?);
        return Ok(());
    }
    for rule in table.rules() {
        println!("{:<32} {:>4}  {}", rule.tag(), rule.weight(), rule.pattern());
    }
    println!("maxScore: {}", table.max_score());
    Ok(())
}

fn check(coordinator: &Coordinator, text: &str) -> Result<()> {
    let session_id = SessionId::generate();
    coordinator.start_session(session_id.clone())?;
    let _ = coordinator.on_segment(&session_id, text, true)?;
    let summary = coordinator.on_session_end(&session_id)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_logging(&settings);

    let table = load_table(&settings)?;
    info!(
        rule_count = table.len(),
        max_score = table.max_score(),
        window = %settings.engine.match_window,
        "engine ready"
    );
    let coordinator = Coordinator::new(table, &settings.engine);

    match cli.command {
        Command::Check { text } => check(&coordinator, &text)?,
        Command::Replay { file } => {
            let mut stdout = std::io::stdout().lock();
            let stats = match file {
                Some(path) => {
                    let f = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    replay::run(&coordinator, BufReader::new(f), &mut stdout).await?
                }
                None => {
                    replay::run(&coordinator, BufReader::new(tokio::io::stdin()), &mut stdout)
                        .await?
                }
            };
            let counts = coordinator.event_counts();
            info!(
                lines = stats.lines,
                errors = stats.errors,
                events = stats.events,
                closed_at_eof = stats.closed_at_eof,
                sessions_started = counts.session_started,
                keywords_found = counts.keywords_found,
                sessions_reset = counts.session_reset,
                "replay finished"
            );
        }
        Command::Rules { json } => print_rules(coordinator.accumulator().table(), json)?,
        Command::Demo => {
            let mut stdout = std::io::stdout().lock();
            let summary = demo::run(&coordinator, &mut stdout)?;
            let counts = coordinator.event_counts();
            info!(
                score_changes = counts.score_changed,
                keywords_found = counts.keywords_found,
                "demo finished"
            );
            eprintln!("{}", summary.summary);
        }
    }
    Ok(())
}
