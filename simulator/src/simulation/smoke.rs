//! Smoke harness: every strategy pair at a few trial counts.
//!
//! This only checks that nothing fails; it says nothing about whether the
//! win rates are right.

use tracing::{info, warn};

use crate::constants::{SMOKE_FAILURE_CAP, SMOKE_GAME_COUNTS};
use crate::random::RandomSource;
use crate::types::{HostStrategy, PlayerStrategy, Strategies};

use super::series::GameSeries;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmokeReport {
    pub runs: usize,
    pub failures: usize,
}

impl SmokeReport {
    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

/// Generator seed for the smoke run. Sweep series `i` uses `base + i`, so
/// stepping one below the base keeps the smoke stream apart from all of them.
pub fn smoke_seed(base: u64) -> u64 {
    base.wrapping_sub(1)
}

/// Run `series` for each (games, player, host) combination, counting failed
/// runs. New runs stop once failures exceed the cap. The series' own
/// strategies are restored afterwards; its statistics keep every trial played.
pub fn smoke_test<R: RandomSource>(series: &mut GameSeries<R>) -> SmokeReport {
    let original = series.config().strategies;
    let mut report = SmokeReport::default();

    info!("smoke test -- ( games | player | host )");
    'runs: for games in SMOKE_GAME_COUNTS {
        for player in PlayerStrategy::ALL {
            for host in HostStrategy::ALL {
                if report.failures > SMOKE_FAILURE_CAP {
                    break 'runs;
                }
                info!(games, %player, %host, "smoke run");
                series.set_strategies(Strategies { player, host });
                report.runs += 1;
                if let Err(e) = series.simulate(games) {
                    warn!(games, %player, %host, error = %e, "smoke run failed");
                    report.failures += 1;
                }
            }
        }
    }

    series.set_strategies(original);
    info!(runs = report.runs, failures = report.failures, "smoke test finished");
    report
}
