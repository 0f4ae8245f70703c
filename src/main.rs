use anyhow::Context;
use clap::{Parser, Subcommand};
use squad_analytics::analysis::aggregator::{aggregate, recent};
use squad_analytics::analysis::models::{AggregateMetrics, MatchRecord};
use squad_analytics::analysis::report::{ClanReport, PlayerReport};
use squad_analytics::cache::default_cache_dir;
use squad_analytics::config::Config;
use squad_analytics::display::output::{
    display_clan_report, display_error, display_info, display_player_report, display_success,
};
use squad_analytics::error::AppError;
use squad_analytics::source::{ApiSource, FileSource, TelemetrySource};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "Squad Analytics")]
#[command(about = "Play-style, placement and squad analysis for PUBG players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read telemetry from a JSON file instead of the PUBG API
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Platform shard (default: steam)
    #[arg(short, long, global = true)]
    shard: Option<String>,

    /// Number of recent matches to fetch (the analysis uses the latest 20)
    #[arg(short, long, default_value = "20", global = true)]
    matches: usize,

    /// Ignore cached telemetry and fetch from the API
    #[arg(long, global = true)]
    refresh: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full report for one player
    Player {
        name: String,

        /// File with one clan member name per line, used for synergy
        #[arg(long)]
        members: Option<PathBuf>,

        /// Team score a match must beat to count toward synergy
        #[arg(long)]
        bar: Option<f64>,
    },
    /// Clan play style from each member's recent matches
    Clan {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(shard) = &cli.shard {
        config.shard = shard.clone();
    }

    match &cli.input {
        Some(path) => {
            let mut source = FileSource::open(path)
                .with_context(|| format!("reading telemetry from {}", path.display()))?;
            analyze(&mut source, &cli, &config)
        }
        None => {
            let cache_dir = default_cache_dir();
            let mut source = ApiSource::new(&config, &cache_dir, cli.refresh)?;
            analyze(&mut source, &cli, &config)?;
            if !cli.json {
                source.request_log().display_status();
            }
            Ok(())
        }
    }
}

fn analyze<S: TelemetrySource>(source: &mut S, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Command::Player { name, members, bar } => {
            if !cli.json {
                display_info(&format!("Analyzing {} on {}", name, config.shard));
            }

            let matches = source
                .recent_matches(name, cli.matches)
                .with_context(|| format!("fetching matches for {}", name))?;
            let fallback = season_fallback(source, name, &matches);

            let membership = match members {
                Some(path) => load_members(path)?,
                None => all_teammates(&matches),
            };
            let bar = bar.unwrap_or(config.performance_bar);

            let report = PlayerReport::build(name, &matches, fallback.as_ref(), &membership, bar);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display_success(&format!("Analyzed {} matches", report.metrics.rounds_considered));
                display_player_report(&report);
            }
        }
        Command::Clan { names } => {
            let mut members = Vec::with_capacity(names.len());
            for name in names {
                let metrics = match source.recent_matches(name, cli.matches) {
                    Ok(matches) => {
                        let fallback = season_fallback(source, name, &matches);
                        aggregate(&matches, fallback.as_ref())
                    }
                    Err(AppError::PlayerNotFound(_)) => {
                        warn!(player = %name, "clan member not found, counting without data");
                        AggregateMetrics::zero()
                    }
                    Err(e) => return Err(e).with_context(|| format!("fetching matches for {}", name)),
                };
                members.push((name.clone(), metrics));
            }

            let report = ClanReport::build(members);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display_clan_report(&report);
            }
        }
    }

    Ok(())
}

/// The season summary is only looked up when match telemetry is unusable.
fn season_fallback<S: TelemetrySource>(source: &mut S, name: &str, matches: &[MatchRecord]) -> Option<AggregateMetrics> {
    if recent(matches).iter().any(MatchRecord::is_usable) {
        return None;
    }
    match source.season_summary(name) {
        Ok(summary) => summary,
        Err(e) => {
            warn!(player = %name, error = %e, "season summary unavailable");
            None
        }
    }
}

fn load_members(path: &Path) -> anyhow::Result<HashSet<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading member list {}", path.display()))?;
    Ok(parse_members(&content))
}

fn parse_members(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

/// Without a member list every teammate counts toward synergy.
fn all_teammates(matches: &[MatchRecord]) -> HashSet<String> {
    matches
        .iter()
        .flat_map(|m| m.teammate_names.iter())
        .map(|n| n.to_lowercase())
        .collect()
}
