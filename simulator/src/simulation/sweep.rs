//! Strategy sweep: one independent series per strategy pair, run in parallel.
//!
//! Series `i` is seeded with `seed + i`, so a sweep is reproducible and its
//! series never share a generator.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::SeriesConfig;
use crate::error::SimulationError;
use crate::types::{HostStrategy, PlayerStrategy, Strategies};

use super::series::GameSeries;
use super::statistics::SeriesSummary;

/// Every player strategy against one host.
pub fn player_pairs(host: HostStrategy) -> Vec<Strategies> {
    PlayerStrategy::ALL
        .into_iter()
        .map(|player| Strategies { player, host })
        .collect()
}

/// Run `config.games` trials for each pair. Results keep the order of `pairs`.
pub fn sweep_strategies(
    config: &SeriesConfig,
    pairs: &[Strategies],
    seed: u64,
) -> Result<Vec<SeriesSummary>, SimulationError> {
    config.validate()?;
    pairs
        .par_iter()
        .enumerate()
        .map(|(i, &pair)| -> Result<SeriesSummary, SimulationError> {
            let series_seed = seed.wrapping_add(i as u64);
            let rng = SmallRng::seed_from_u64(series_seed);
            let mut cfg = config.with_strategies(pair);
            cfg.seed = Some(series_seed);
            let mut series = GameSeries::with_rng(cfg, rng)?;
            series.simulate_configured()?;
            Ok(series.summary())
        })
        .collect()
}
