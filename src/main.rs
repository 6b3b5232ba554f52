use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use connect_four_mcts::game::Dimensions;
use connect_four_mcts::mcts::Config;
use connect_four_mcts::{Engine, TimeControl};
use flexi_logger::Logger;

/// Play Connect Four against a Monte Carlo Tree Search engine. The engine
/// moves first and plays `X`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of rows of the board.
    #[arg(long, default_value_t = 6)]
    rows: u8,
    /// Number of columns of the board.
    #[arg(long, default_value_t = 7)]
    columns: u8,
    /// Seconds the engine searches before each of its moves.
    #[arg(long, default_value_t = 15.0)]
    think_time: f64,
    /// Seconds the engine searches before asking for the opponent's move.
    #[arg(long, default_value_t = 2.0)]
    opponent_time: f64,
    /// Seconds of search from the empty board before the game starts.
    #[arg(long, default_value_t = 30.0)]
    warmup_time: f64,
    /// Exploration constant of the UCB formula.
    #[arg(long, default_value_t = 0.75)]
    exploration: f64,
    /// Iterations per search that seed the tree round-robin before UCB.
    #[arg(long, default_value_t = 280)]
    seeding_threshold: u64,
    /// Seed for reproducible games.
    #[arg(long)]
    seed: Option<u64>,
    /// Log specification, e.g. `debug` or `connect_four_mcts=trace`.
    /// `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Print statistics of the candidate moves after every search.
    #[arg(long)]
    show_stats: bool,
}

fn seconds(value: f64, flag: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid --{flag}: {value}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _logger = Logger::try_with_env_or_str(&args.log_level)?
        .log_to_stderr()
        .start()?;

    let dimensions = Dimensions::new(args.rows, args.columns)?;
    let mut config = Config::default()
        .with_exploration(args.exploration)
        .with_seeding_threshold(args.seeding_threshold);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let time = TimeControl {
        warmup: seconds(args.warmup_time, "warmup-time")?,
        engine: seconds(args.think_time, "think-time")?,
        opponent: seconds(args.opponent_time, "opponent-time")?,
    };
    log::debug!("starting a {dimensions} game with {config:?} and {time:?}");

    connect_four_mcts::print_engine_info();
    connect_four_mcts::print_binary_info();

    let mut engine = Engine::new(
        dimensions,
        config,
        time,
        io::stdin().lock(),
        io::stdout().lock(),
    )
    .with_stats(args.show_stats);
    let _ = engine.play()?;
    Ok(())
}
