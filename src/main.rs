//! Command-line front end: human and AI games on configurable boards, and the
//! heuristic tournament.

mod game_loop;
mod player;
mod report;
mod tournament;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lineup_core::engine::config::{Algorithm, EngineConfig, Heuristic, SearchConfig};
use lineup_core::engine::search::SearchEngine;
use lineup_core::logic::board::{BoardParams, Pos};
use player::{Player, PlayerKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Generalized N-in-a-row with minimax and alpha-beta search.
#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Play N-in-a-row against humans or the search engine")]
struct Cli {
    /// JSON file with engine tunables; missing fields keep their defaults.
    #[arg(long, global = true)]
    engine_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game.
    Play(PlayArgs),

    /// Pit the aggressive heuristic against the defensive one on 4x4 boards.
    Tournament {
        /// Games per half; the second half uses random blocks.
        #[arg(short, long, default_value = "2")]
        rounds: u32,

        /// Scoreboard and game trace output.
        #[arg(long, default_value = "scoreboard.txt")]
        trace: PathBuf,

        /// Seed for the random blocks of the second half.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// Board size n, between 3 and 10.
    #[arg(short = 'n', long, default_value = "3")]
    size: u8,

    /// Length s of a winning run, between 3 and n.
    #[arg(short = 's', long, default_value = "3")]
    win_length: u8,

    /// Blocked cells such as `B2`, comma-separated or repeated.
    #[arg(short, long, value_delimiter = ',')]
    blocks: Vec<Pos>,

    #[arg(short = 'x', long, value_enum, default_value = "ai")]
    player_x: PlayerKind,

    #[arg(short = 'o', long, value_enum, default_value = "ai")]
    player_o: PlayerKind,

    /// Search depth for X.
    #[arg(long, default_value = "10")]
    d1: u32,

    /// Search depth for O.
    #[arg(long, default_value = "10")]
    d2: u32,

    #[arg(long, default_value = "aggressive")]
    h1: Heuristic,

    #[arg(long, default_value = "aggressive")]
    h2: Heuristic,

    /// `minimax` or `alphabeta`.
    #[arg(short, long, default_value = "alphabeta")]
    algorithm: Algorithm,

    /// Seconds an AI may spend on one move before it forfeits.
    #[arg(short, long, default_value = "5")]
    time: u64,

    /// Show the engine's recommended move to human players.
    #[arg(short, long)]
    recommend: bool,

    /// Game trace output. AI-vs-AI games write one by default.
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn default_trace_name(params: &BoardParams, time_secs: u64) -> PathBuf {
    PathBuf::from(format!(
        "gameTrace-{}n{}b{}s{}t.txt",
        params.size(),
        params.blocked().len(),
        params.win_length(),
        time_secs
    ))
}

/// Console output, plus a plain-text copy of everything when `trace` is set.
fn init_tracing(trace: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().without_time().with_target(false);
    let file = trace
        .map(|path| {
            File::create(path)
                .with_context(|| format!("creating game trace {}", path.display()))
                .map(|file| {
                    fmt::layer()
                        .without_time()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file))
                })
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    if let Some(path) = trace {
        tracing::debug!("game trace will be written to {}", path.display());
    }
    Ok(())
}

fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading engine config {}", path.display()))?;
    EngineConfig::load_from_json(&json)
        .with_context(|| format!("parsing engine config {}", path.display()))
}

fn play(args: PlayArgs, engine: &mut SearchEngine) -> Result<()> {
    let params = BoardParams::new(args.size, args.win_length, args.blocks.iter().copied())
        .context("invalid board settings")?;

    let search = |max_depth, heuristic| SearchConfig {
        max_depth: Some(max_depth),
        time_budget_ms: args.time.saturating_mul(1000),
        heuristic,
        algorithm: args.algorithm,
    };
    let x = Player {
        kind: args.player_x,
        search: search(args.d1, args.h1),
    };
    let o = Player {
        kind: args.player_o,
        search: search(args.d2, args.h2),
    };

    let trace = args
        .trace
        .clone()
        .or_else(|| (x.is_ai() && o.is_ai()).then(|| default_trace_name(&params, args.time)));
    init_tracing(trace.as_deref())?;

    let blocks: Vec<String> = params.blocked().iter().map(ToString::to_string).collect();
    info!(
        "n: {} b: {} s: {} t: {}",
        params.size(),
        blocks.len(),
        params.win_length(),
        args.time
    );
    info!("blocs: [{}]", blocks.join(", "));
    info!("recommend: {}", args.recommend);

    game_loop::play_game(
        params,
        [&x, &o],
        engine,
        args.recommend,
        &mut io::stdin().lock(),
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_engine_config(cli.engine_config.as_deref())?;
    let mut engine = SearchEngine::new(Arc::new(config));

    match cli.command {
        Commands::Play(args) => play(args, &mut engine),
        Commands::Tournament {
            rounds,
            trace,
            seed,
        } => {
            init_tracing(Some(&trace))?;
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            tournament::run(rounds, &mut engine, &mut rng)?;
            Ok(())
        }
    }
}
