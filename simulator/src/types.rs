//! Strategy selectors for both sides of the game.
//!
//! Strategies are closed enums: an unknown name is rejected when it is parsed
//! (from JSON or the command line) and can never reach a running trial.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the player makes a pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStrategy {
    /// Keep the current pick. A no-op when nothing has been picked yet.
    Stay,
    /// Pick uniformly among closed doors, possibly the same door again.
    Random,
    /// Switch away: pick uniformly among closed doors other than the current pick.
    Update,
}

/// How the host chooses the door to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStrategy {
    /// Open a goat door the player has not picked; rerolls the trial if none exists.
    Goat,
    /// Open any door the player has not picked, prizes included.
    Random,
}

impl PlayerStrategy {
    pub const ALL: [PlayerStrategy; 3] = [
        PlayerStrategy::Stay,
        PlayerStrategy::Random,
        PlayerStrategy::Update,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerStrategy::Stay => "stay",
            PlayerStrategy::Random => "random",
            PlayerStrategy::Update => "update",
        }
    }
}

impl HostStrategy {
    pub const ALL: [HostStrategy; 2] = [HostStrategy::Goat, HostStrategy::Random];

    pub fn name(self) -> &'static str {
        match self {
            HostStrategy::Goat => "goat",
            HostStrategy::Random => "random",
        }
    }
}

impl fmt::Display for PlayerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HostStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerStrategy::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnsupportedStrategy {
                role: "player",
                name: s.to_string(),
            })
    }
}

impl FromStr for HostStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostStrategy::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnsupportedStrategy {
                role: "host",
                name: s.to_string(),
            })
    }
}

/// A player/host strategy pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategies {
    #[serde(default = "default_player")]
    pub player: PlayerStrategy,
    #[serde(default = "default_host")]
    pub host: HostStrategy,
}

fn default_player() -> PlayerStrategy {
    PlayerStrategy::Update
}

fn default_host() -> HostStrategy {
    HostStrategy::Goat
}

impl Default for Strategies {
    fn default() -> Self {
        Self {
            player: default_player(),
            host: default_host(),
        }
    }
}

impl Strategies {
    /// Every player/host combination, player-major.
    pub fn all_pairs() -> impl Iterator<Item = Strategies> {
        PlayerStrategy::ALL.into_iter().flat_map(|player| {
            HostStrategy::ALL
                .into_iter()
                .map(move |host| Strategies { player, host })
        })
    }
}
