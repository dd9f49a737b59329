//! # Courtsplit
//!
//! A filter-state reconciler for college-basketball on/off analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (common params, query slots, structured filters, presets, stat models)
//! - **codec**: Persisted query-string serialization with prefix namespacing
//! - **registry**: Built-in preset registry and TOML preset packs
//! - **reconcile**: The reconciler proper (normalizer, preset matcher, slot builder, fan-out, demux, mode bridge)
//! - **scope**: Roster/game-selection snapshots with a sequenced fetch guard

pub mod codec;
pub mod models;
pub mod reconcile;
pub mod registry;
pub mod scope;

pub use models::*;

/// Parse a season label ("2024/25") into its starting calendar year.
pub fn season_start_year(season: &str) -> Option<i32> {
    let (start, rest) = season.trim().split_once('/')?;
    let start: i32 = start.parse().ok()?;
    // Suffix must be the two-digit following year
    let suffix: i32 = rest.parse().ok()?;
    if rest.len() == 2 && (start + 1) % 100 == suffix {
        Some(start)
    } else {
        None
    }
}

/// Season label for the season after the given one.
pub fn next_season(season: &str) -> Option<String> {
    let start = season_start_year(season)?;
    Some(format!("{}/{:02}", start + 1, (start + 2) % 100))
}
