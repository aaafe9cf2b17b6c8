#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Droids in the terminal.

mod board;
mod config;
mod play;
mod run_summary_link;
mod scores;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use droids_core::{CalendarDate, WELCOME_BANNER};
use droids_world::{daily_seed, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, Overrides, Settings},
    run_summary_link::{build_link, parse_link},
    scores::{HighScore, ScoreBook},
};

#[derive(Debug, Parser)]
#[command(name = "droids", version, about = "Outlast the droids on a square grid")]
struct Cli {
    /// TOML configuration file, `droids.toml` when present by default.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON file holding high scores and the daily streak.
    #[arg(long, global = true, value_name = "PATH")]
    scores: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Play a run interactively (the default).
    Play(PlayArgs),
    /// Print the high-score table and daily streak.
    Scores,
    /// Decode a shared run-summary link.
    Summary {
        /// Link printed at the end of a run.
        link: String,
    },
}

#[derive(Debug, Default, Args)]
struct PlayArgs {
    /// Seed for the run; a random seed is used when omitted.
    #[arg(long, conflicts_with = "daily")]
    seed: Option<u64>,
    /// Play today's shared daily seed.
    #[arg(long)]
    daily: bool,
    /// Edge length of the square board.
    #[arg(long)]
    board_size: Option<u32>,
    /// Safe teleport charges per run.
    #[arg(long)]
    safe_teleports: Option<u32>,
}

/// Entry point for the Droids command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| CliCommand::Play(PlayArgs::default()));
    match command {
        CliCommand::Play(args) => play_run(cli.config, cli.scores, args),
        CliCommand::Scores => show_scores(cli.config, cli.scores),
        CliCommand::Summary { link } => show_summary(&link),
    }
}

fn play_run(config: Option<PathBuf>, scores: Option<PathBuf>, args: PlayArgs) -> Result<()> {
    let settings = Settings::resolve(
        FileConfig::load(config.as_deref())?,
        Overrides {
            board_size: args.board_size,
            safe_teleports: args.safe_teleports,
            scores_path: scores,
        },
    )?;

    let today = today()?;
    let todays_seed = daily_seed(today);
    let seed = match args.seed {
        Some(seed) => seed,
        None if args.daily => todays_seed,
        None => rand::random::<u64>(),
    };
    let daily = seed == todays_seed;
    info!(seed, daily, "starting run");

    let mut world = World::new(seed, settings.world).context("failed to start a run")?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{WELCOME_BANNER}")?;

    let outcome = play::run_session(&mut world, &mut input, &mut out)?;
    if !outcome.is_finished() {
        writeln!(
            out,
            "Run abandoned at level {} with {} points.",
            world.state().level,
            world.state().score
        )?;
        return Ok(());
    }

    let name = play::read_name(&mut input, &mut out)?;
    let summary = world.run_summary();
    let mut book = ScoreBook::load(&settings.scores_path)?;
    if let Some(rank) = book.record(HighScore::from_state(world.state(), name, today)) {
        writeln!(out, "New high score at rank #{rank}!")?;
    }
    if daily {
        let streak = book.daily_streak.record(today);
        writeln!(out, "Daily challenge complete. Streak: {streak} day(s).")?;
    }
    book.save(&settings.scores_path)?;

    write!(out, "{}", book.render())?;
    writeln!(
        out,
        "Share your run: {}",
        build_link(&settings.share_base_url, &summary)
    )?;
    Ok(())
}

fn show_scores(config: Option<PathBuf>, scores: Option<PathBuf>) -> Result<()> {
    let settings = Settings::resolve(
        FileConfig::load(config.as_deref())?,
        Overrides {
            scores_path: scores,
            ..Overrides::default()
        },
    )?;
    let book = ScoreBook::load(&settings.scores_path)?;
    print!("{}", book.render());
    Ok(())
}

fn show_summary(link: &str) -> Result<()> {
    let summary = parse_link(link).context("malformed run-summary link")?;
    println!("Score:     {}", summary.score);
    println!("Level:     {}", summary.level);
    println!("Seed:      {}", summary.seed);
    println!("Teleports: {}", summary.teleports);
    Ok(())
}

fn today() -> Result<CalendarDate> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is set before 1970")?;
    let seconds = i64::try_from(elapsed.as_secs()).context("system clock is out of range")?;
    CalendarDate::from_unix_seconds(seconds)
        .context("system clock is outside the supported calendar range")
}
