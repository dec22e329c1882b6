//! Game constants and configuration defaults.
//!
//! The defaults reproduce the classic three-door setup with a goat-revealing
//! host and a switching player. Door counts below [`MIN_DOORS`] are rejected
//! because the player's second pick would have no door to switch to.

/// Smallest door count a trial may have; also the lower bound when the door
/// count is randomized.
pub const MIN_DOORS: usize = 3;

/// Per-trial reroll count above which every further reroll logs a warning.
pub const REROLL_ALERT_THRESHOLD: u32 = 10;

/// Default number of trials per series.
pub const DEFAULT_GAMES: usize = 10_000;

/// Default fixed door count.
pub const DEFAULT_DOORS: usize = 3;

/// Trial counts exercised by the smoke harness.
pub const SMOKE_GAME_COUNTS: [usize; 3] = [1, 10, 100];

/// The smoke harness stops launching runs once failures exceed this count.
pub const SMOKE_FAILURE_CAP: usize = 5;

/// Default base seed for the CLI when none is configured.
pub const DEFAULT_SEED: u64 = 42;
