//! Win statistics accumulated over a series.
//!
//! Trials are bucketed by their actual goat count, so a series with a
//! randomized goat count reports one win rate per game variant as well as
//! the aggregate.

use std::path::Path;

use serde::Serialize;

use crate::error::SimulationError;
use crate::game::Game;
use crate::types::Strategies;

// ── Accumulator ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub total: u64,
    pub wins: u64,
}

/// Running totals plus one bucket per possible goat count `0..=max_doors`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsAccumulator {
    games: u64,
    wins: u64,
    rerolls: u64,
    buckets: Vec<BucketStats>,
}

impl StatsAccumulator {
    pub fn new(max_doors: usize) -> Self {
        Self {
            games: 0,
            wins: 0,
            rerolls: 0,
            buckets: vec![BucketStats::default(); max_doors + 1],
        }
    }

    /// Fold one resolved trial into the totals.
    pub fn record(&mut self, goat_count: usize, win: bool, rerolls: u32) {
        self.games += 1;
        self.wins += win as u64;
        self.rerolls += rerolls as u64;
        let bucket = &mut self.buckets[goat_count];
        bucket.total += 1;
        bucket.wins += win as u64;
    }

    pub fn record_game(&mut self, game: &Game) {
        self.record(game.goat_count(), game.win(), game.rerolls());
    }

    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn rerolls(&self) -> u64 {
        self.rerolls
    }

    /// Buckets indexed by goat count.
    pub fn buckets(&self) -> &[BucketStats] {
        &self.buckets
    }

    pub fn win_fraction(&self) -> f64 {
        fraction(self.wins, self.games)
    }

    pub fn summarize(&self, strategies: Strategies, seed: Option<u64>) -> SeriesSummary {
        let buckets: Vec<BucketSummary> = self
            .buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.total > 0)
            .map(|(goats, b)| BucketSummary {
                goats,
                total: b.total,
                wins: b.wins,
                win_fraction: fraction(b.wins, b.total),
            })
            .collect();

        let p = self.win_fraction();
        let std_error = if self.games > 0 {
            (p * (1.0 - p) / self.games as f64).sqrt()
        } else {
            0.0
        };

        SeriesSummary {
            strategies,
            seed,
            games: self.games,
            wins: self.wins,
            win_fraction: p,
            std_error,
            rerolls: self.rerolls,
            buckets,
        }
    }
}

fn fraction(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BucketSummary {
    pub goats: usize,
    pub total: u64,
    pub wins: u64,
    pub win_fraction: f64,
}

/// Serializable end-of-series result. Only goat counts that occurred are listed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub strategies: Strategies,
    pub seed: Option<u64>,
    pub games: u64,
    pub wins: u64,
    pub win_fraction: f64,
    /// Binomial standard error of `win_fraction`.
    pub std_error: f64,
    pub rerolls: u64,
    pub buckets: Vec<BucketSummary>,
}

/// Write a summary as pretty JSON, creating parent directories.
pub fn save_summary(summary: &SeriesSummary, path: &Path) -> Result<(), SimulationError> {
    let io_err = |source| SimulationError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| io_err(std::io::Error::other(e)))?;
    std::fs::write(path, json).map_err(io_err)
}
