//! Series simulation and statistics.
//!
//! - [`series`]: run N trials under one configuration
//! - [`statistics`]: win totals bucketed by goat count, JSON export
//! - [`sweep`]: independent series per strategy pair (parallel)
//! - [`smoke`]: run every strategy pair and count failures

pub mod series;
pub mod smoke;
pub mod statistics;
pub mod sweep;

pub use series::GameSeries;
pub use smoke::{smoke_seed, smoke_test, SmokeReport};
pub use statistics::{save_summary, BucketStats, BucketSummary, SeriesSummary, StatsAccumulator};
pub use sweep::{player_pairs, sweep_strategies};
