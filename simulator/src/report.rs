//! Human-readable series header and statistics.

use std::fmt::{self, Write as _};

use crate::config::SeriesConfig;
use crate::constants::MIN_DOORS;
use crate::simulation::SeriesSummary;

/// Two-line banner describing the strategies and the game variant.
pub fn header(config: &SeriesConfig) -> String {
    let goats = match config.rules.n_goats {
        Some(g) => g.to_string(),
        None => "random".to_string(),
    };
    let doors = match config.rules.n_doors {
        Some(d) => d.to_string(),
        None => format!("from {MIN_DOORS} to {}", config.max_doors()),
    };
    format!(
        "--- Simulating player strategy: {} vs host strategy: {} ---\n--- Using {goats} goats and {doors} doors ---",
        config.strategies.player, config.strategies.host,
    )
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rerolls: {}", self.rerolls)?;
        for b in &self.buckets {
            writeln!(
                f,
                "{} goats: won {} / {} for {:.1}%",
                b.goats,
                b.wins,
                b.total,
                100.0 * b.win_fraction
            )?;
        }
        // Per-variant lines already give the total when only one variant occurred.
        if self.buckets.len() > 1 {
            writeln!(
                f,
                "Aggregate Outcome: won {} / {} for {:.3} (±{:.3})",
                self.wins, self.games, self.win_fraction, self.std_error
            )?;
        }
        Ok(())
    }
}

/// Header followed by statistics, ready to print.
pub fn render(config: &SeriesConfig, summary: &SeriesSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", header(config));
    let _ = write!(out, "{summary}");
    out
}
