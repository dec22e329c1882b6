//! # Monty Hall - generalized door-game simulator
//!
//! Estimates the player's win probability in a family of Monty Hall games by
//! Monte Carlo: a trial has `n` doors, `g` of them hiding goats, a host who
//! opens one door the player did not pick, and a player who may re-pick.
//!
//! ## Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Random source | [`random`] | Uniform ints and sampling without replacement over an owned generator |
//! | Trial | [`game`] | `Fresh → FirstChoiceMade → Revealed → Resolved`, with rerolls |
//! | Series | [`simulation::series`] | N trials on one generator, folded into [`simulation::StatsAccumulator`] |
//! | Sweep | [`simulation::sweep`] | One independently seeded series per strategy pair (rayon) |
//! | Config / report | [`config`], [`report`] | JSON config with defaults; console output |
//!
//! ## Rerolls
//!
//! A goat-revealing host has no legal move when every goat is behind the
//! player's door (or there are no goats). Such a trial is discarded and
//! re-sampled rather than counted, since counting it would bias the win rate.
//! [`game::RerollPolicy`] decides whether endless rerolling eventually aborts.
//!
//! ## Example
//!
//! ```rust
//! use montyhall::config::SeriesConfig;
//! use montyhall::simulation::GameSeries;
//! use montyhall::types::{HostStrategy, PlayerStrategy, Strategies};
//!
//! let mut config = SeriesConfig::default();
//! config.games = 1000;
//! config.rules.n_goats = Some(2);
//! config.seed = Some(1);
//! config.strategies = Strategies { player: PlayerStrategy::Update, host: HostStrategy::Goat };
//!
//! let mut series = GameSeries::new(config).unwrap();
//! series.simulate_configured().unwrap();
//! assert!(series.stats().win_fraction() > 0.5);
//! ```

pub mod config;
pub mod constants;
pub mod env_config;
pub mod error;
pub mod game;
pub mod random;
pub mod report;
pub mod simulation;
pub mod types;

pub use config::SeriesConfig;
pub use error::{ConfigError, GameError, SimulationError};
pub use game::{Game, LayoutRequest, Phase, RerollPolicy, Reveal};
pub use random::RandomSource;
pub use simulation::{GameSeries, SeriesSummary, StatsAccumulator};
pub use types::{HostStrategy, PlayerStrategy, Strategies};
