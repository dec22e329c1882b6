//! Error types for configuration and simulation.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("games must be positive")]
    NoGames,

    #[error("{doors} doors is below the minimum of {min}")]
    TooFewDoors { doors: usize, min: usize },

    #[error("{goats} goats do not fit behind {doors} doors")]
    TooManyGoats { goats: usize, doors: usize },

    #[error("max_doors is required when n_doors is random")]
    MissingMaxDoors,

    #[error("max_doors {max_doors} is below n_doors {doors}")]
    MaxDoorsBelowDoors { max_doors: usize, doors: usize },

    #[error("unsupported {role} strategy: {name}")]
    UnsupportedStrategy { role: &'static str, name: String },

    #[error("verbose level {0} is not one of 0, 1, 2")]
    Verbosity(u8),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while resolving a single trial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The reroll policy's hard cap was exceeded.
    #[error("trial abandoned after {rerolls} rerolls (limit {limit})")]
    ExcessiveRerolls { rerolls: u32, limit: u32 },

    /// A hand-built layout broke a shape invariant.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

/// Failures surfaced by a series run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("game {index}: {source}")]
    Game {
        index: usize,
        #[source]
        source: GameError,
    },

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
