//! Series configuration: defaults, JSON loading, and validation.
//!
//! Every field is optional in the JSON form; missing fields fall back to the
//! classic game (10 000 trials, 3 doors, random goat count, switching player,
//! goat-revealing host).
//!
//! ```json
//! {
//!   "games": 10000,
//!   "rules": { "n_doors": 3, "n_goats": null, "max_doors": null },
//!   "strategies": { "player": "update", "host": "goat" },
//!   "verbose": 0,
//!   "seed": 42,
//!   "reroll": { "alert_after": 10, "abort_after": null }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DOORS, DEFAULT_GAMES};
use crate::error::ConfigError;
use crate::game::{LayoutRequest, RerollPolicy};
use crate::types::Strategies;

/// Door/goat rules. `None` counts are randomized per trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default = "default_doors")]
    pub n_doors: Option<usize>,
    #[serde(default)]
    pub n_goats: Option<usize>,
    /// Upper bound for randomized door counts; defaults to `n_doors`.
    #[serde(default)]
    pub max_doors: Option<usize>,
}

fn default_doors() -> Option<usize> {
    Some(DEFAULT_DOORS)
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            n_doors: default_doors(),
            n_goats: None,
            max_doors: None,
        }
    }
}

impl Rules {
    /// `max_doors`, falling back to `n_doors`. `None` only when both are unset.
    pub fn effective_max_doors(&self) -> Option<usize> {
        self.max_doors.or(self.n_doors)
    }

    pub fn layout_request(&self) -> Result<LayoutRequest, ConfigError> {
        let max_doors = self.effective_max_doors().ok_or(ConfigError::MissingMaxDoors)?;
        LayoutRequest::new(self.n_doors, self.n_goats, max_doors)
    }
}

/// Everything one series needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub games: usize,
    pub rules: Rules,
    pub strategies: Strategies,
    /// 0 = warnings only, 1 = informational, 2 = per-game detail.
    pub verbose: u8,
    /// Base seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub reroll: RerollPolicy,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            games: DEFAULT_GAMES,
            rules: Rules::default(),
            strategies: Strategies::default(),
            verbose: 0,
            seed: None,
            reroll: RerollPolicy::default(),
        }
    }
}

impl SeriesConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SeriesConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every cross-field constraint; returns the trial layout request.
    pub fn validate(&self) -> Result<LayoutRequest, ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::NoGames);
        }
        if self.verbose > 2 {
            return Err(ConfigError::Verbosity(self.verbose));
        }
        self.rules.layout_request()
    }

    /// Bucket count upper bound: the largest goat count a trial can have.
    pub fn max_doors(&self) -> usize {
        self.rules.effective_max_doors().unwrap_or(DEFAULT_DOORS)
    }

    pub fn with_strategies(&self, strategies: Strategies) -> Self {
        Self {
            strategies,
            ..self.clone()
        }
    }
}
