//! Series aggregator: runs many trials under one configuration.
//!
//! All trials in a series draw from the series' single generator in turn; it
//! is never reseeded between trials. Independent series (e.g. the strategy
//! sweep) each get their own generator.

use rand::rngs::SmallRng;
use tracing::debug;

use crate::config::SeriesConfig;
use crate::error::{ConfigError, SimulationError};
use crate::game::{Game, LayoutRequest};
use crate::random::{make_rng, RandomSource};
use crate::types::Strategies;

use super::statistics::{SeriesSummary, StatsAccumulator};

pub struct GameSeries<R = SmallRng> {
    config: SeriesConfig,
    request: LayoutRequest,
    rng: R,
    history: Vec<Game>,
    stats: StatsAccumulator,
}

impl GameSeries<SmallRng> {
    /// Series seeded from `config.seed`, or from OS entropy when unset.
    pub fn new(config: SeriesConfig) -> Result<Self, ConfigError> {
        let rng = make_rng(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameSeries<R> {
    pub fn with_rng(config: SeriesConfig, rng: R) -> Result<Self, ConfigError> {
        let request = config.validate()?;
        let stats = StatsAccumulator::new(request.max_doors());
        Ok(Self {
            config,
            request,
            rng,
            history: Vec::new(),
            stats,
        })
    }

    /// Play `n` trials and fold each outcome into the statistics.
    ///
    /// Fails only when the reroll policy abandons a trial; trials completed
    /// before the failure stay recorded.
    pub fn simulate(&mut self, n: usize) -> Result<(), SimulationError> {
        let Strategies { player, host } = self.config.strategies;
        for index in 0..n {
            debug!(game = index + 1, %player, %host, "playing game");
            let mut game = Game::new(self.request, &mut self.rng);
            game.play(player, host, &self.config.reroll, &mut self.rng)
                .map_err(|source| SimulationError::Game { index, source })?;
            self.stats.record_game(&game);
            self.history.push(game);
        }
        Ok(())
    }

    /// Play `config.games` trials.
    pub fn simulate_configured(&mut self) -> Result<(), SimulationError> {
        self.simulate(self.config.games)
    }

    /// Switch strategies between runs; accumulated statistics are kept.
    pub fn set_strategies(&mut self, strategies: Strategies) {
        self.config.strategies = strategies;
    }

    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    /// Every resolved trial, in play order.
    pub fn history(&self) -> &[Game] {
        &self.history
    }

    pub fn summary(&self) -> SeriesSummary {
        self.stats.summarize(self.config.strategies, self.config.seed)
    }
}
