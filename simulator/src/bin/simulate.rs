//! Monty Hall simulation driver.
//!
//! Runs the smoke harness, then one series per strategy pair, printing a
//! header and win statistics for each.
//!
//!   montyhall-simulate --games 10000 --goats 2
//!   montyhall-simulate --config run.json --all-hosts --output results/
//!   montyhall-simulate --random-doors --max-doors 6 -v

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;

use montyhall::config::SeriesConfig;
use montyhall::constants::DEFAULT_SEED;
use montyhall::env_config::{env_seed, init_rayon_threads, init_tracing};
use montyhall::error::SimulationError;
use montyhall::game::RerollPolicy;
use montyhall::random::make_rng;
use montyhall::report;
use montyhall::simulation::{
    player_pairs, save_summary, smoke_seed, smoke_test, sweep_strategies, GameSeries,
};
use montyhall::types::{HostStrategy, PlayerStrategy, Strategies};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PlayerArg {
    Stay,
    Random,
    Update,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HostArg {
    Goat,
    Random,
}

impl From<PlayerArg> for PlayerStrategy {
    fn from(p: PlayerArg) -> Self {
        match p {
            PlayerArg::Stay => PlayerStrategy::Stay,
            PlayerArg::Random => PlayerStrategy::Random,
            PlayerArg::Update => PlayerStrategy::Update,
        }
    }
}

impl From<HostArg> for HostStrategy {
    fn from(h: HostArg) -> Self {
        match h {
            HostArg::Goat => HostStrategy::Goat,
            HostArg::Random => HostStrategy::Random,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "montyhall-simulate",
    about = "Monte Carlo win rates for generalized Monty Hall games",
    version
)]
struct Args {
    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trials per strategy pair.
    #[arg(long)]
    games: Option<usize>,

    /// Fixed door count.
    #[arg(long, conflicts_with = "random_doors")]
    doors: Option<usize>,

    /// Draw the door count per trial from 3..=max-doors.
    #[arg(long)]
    random_doors: bool,

    /// Upper bound for randomized door counts.
    #[arg(long)]
    max_doors: Option<usize>,

    /// Fixed goat count (default: random per trial).
    #[arg(long)]
    goats: Option<usize>,

    /// Only simulate this player strategy (default: all of them).
    #[arg(long, value_enum)]
    player: Option<PlayerArg>,

    /// Host strategy (default: from config).
    #[arg(long, value_enum, conflicts_with = "all_hosts")]
    host: Option<HostArg>,

    /// Sweep every host strategy as well.
    #[arg(long)]
    all_hosts: bool,

    /// Base seed. Series i uses seed + i. Falls back to MONTYHALL_SEED, then 42.
    #[arg(long)]
    seed: Option<u64>,

    /// Abandon a trial after this many rerolls (default: never).
    #[arg(long)]
    max_rerolls: Option<u32>,

    /// Skip the smoke harness.
    #[arg(long)]
    skip_smoke: bool,

    /// Write one JSON summary per strategy pair into this directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbosity: -v, -vv
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(&self, config: &mut SeriesConfig) {
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(doors) = self.doors {
            config.rules.n_doors = Some(doors);
        }
        if self.random_doors {
            config.rules.n_doors = None;
        }
        if self.max_doors.is_some() {
            config.rules.max_doors = self.max_doors;
        }
        if self.goats.is_some() {
            config.rules.n_goats = self.goats;
        }
        if let Some(host) = self.host {
            config.strategies.host = host.into();
        }
        if let Some(player) = self.player {
            config.strategies.player = player.into();
        }
        if let Some(limit) = self.max_rerolls {
            config.reroll = RerollPolicy {
                abort_after: Some(limit),
                ..config.reroll
            };
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.verbose = config.verbose.max(self.verbose.min(2));
    }

    fn pairs(&self, config: &SeriesConfig) -> Vec<Strategies> {
        let hosts: Vec<HostStrategy> = if self.all_hosts {
            HostStrategy::ALL.to_vec()
        } else {
            vec![config.strategies.host]
        };
        hosts
            .into_iter()
            .flat_map(|host| match self.player {
                Some(player) => vec![Strategies {
                    player: player.into(),
                    host,
                }],
                None => player_pairs(host),
            })
            .collect()
    }
}

fn run(args: &Args) -> Result<bool, SimulationError> {
    let mut config = match &args.config {
        Some(path) => SeriesConfig::from_json_file(path)?,
        None => SeriesConfig::default(),
    };
    args.apply(&mut config);
    init_tracing(config.verbose);

    let seed = config.seed.or_else(env_seed).unwrap_or(DEFAULT_SEED);
    config.seed = Some(seed);
    config.validate()?;

    let threads = init_rayon_threads();
    info!(threads, seed, games = config.games, "starting simulation");

    let mut smoke_ok = true;
    if !args.skip_smoke {
        let smoke_rng = make_rng(Some(smoke_seed(seed)));
        let mut smoke_series = GameSeries::with_rng(config.clone(), smoke_rng)?;
        let smoke = smoke_test(&mut smoke_series);
        println!(
            "Smoke test: {} runs, {} failures",
            smoke.runs, smoke.failures
        );
        smoke_ok = smoke.passed();
    }

    let pairs = args.pairs(&config);
    let start = Instant::now();
    let summaries = sweep_strategies(&config, &pairs, seed)?;
    info!(
        series = summaries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "sweep finished"
    );

    for summary in &summaries {
        print!("{}", report::render(&config.with_strategies(summary.strategies), summary));
        if let Some(dir) = &args.output {
            let path = dir.join(format!(
                "summary_{}_{}.json",
                summary.strategies.player, summary.strategies.host
            ));
            save_summary(summary, &path)?;
            info!(path = %path.display(), "wrote summary");
        }
    }

    Ok(smoke_ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
