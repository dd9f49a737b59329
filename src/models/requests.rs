//! Fan-out request descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Tags of the always-issued requests.
pub const TAG_TEAM: &str = "team";
pub const TAG_ROSTER: &str = "roster";
pub const TAG_PLAYERS: &str = "players";

/// Tags of the conditional requests.
pub const TAG_SHOTS: &str = "shots";
pub const TAG_PLAYER_SHOTS: &str = "playerShots";
pub const TAG_GLOBAL_PLAYERS: &str = "globalPlayers";

/// Prefix of the per-slot lineup request tags ("lineups0", "lineups1", ...).
pub const TAG_LINEUPS: &str = "lineups";

/// Dotted namespace under which a request's params were persisted.
///
/// An empty prefix is the page's primary params; a named prefix keeps a
/// second independent filter state ("lineup.", or "a."/"b." on the
/// matchup page) on the same URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParamPrefix(pub String);

impl ParamPrefix {
    pub fn primary() -> Self {
        Self(String::new())
    }

    pub fn named(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn is_primary(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParamPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visualization toggles that drive the fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewFlags {
    /// Team shot chart.
    pub shot_charts: bool,

    /// Per-player shot charts.
    pub player_shot_charts: bool,

    /// RAPM-style regression view; needs lineup aggregations.
    pub rapm: bool,

    /// Roster breakdown view; needs lineup aggregations.
    pub roster_breakdown: bool,

    /// Game-by-game breakdown view; needs lineup aggregations.
    pub game_breakdown: bool,
}

impl ViewFlags {
    /// True when any enabled view consumes lineup aggregations.
    pub fn needs_lineups(&self) -> bool {
        self.rapm || self.roster_breakdown || self.game_breakdown
    }
}

/// One fan-out request descriptor. `tag` keys the batched response;
/// `params` is the canonical params object for that sub-request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequestInfo {
    pub tag: String,
    pub context: ParamPrefix,
    pub params: Map<String, Value>,

    #[serde(default)]
    pub include_roster: bool,
}

impl FilterRequestInfo {
    pub fn new(tag: impl Into<String>, context: ParamPrefix, params: Map<String, Value>) -> Self {
        Self {
            tag: tag.into(),
            context,
            params,
            include_roster: false,
        }
    }

    pub fn with_roster(mut self) -> Self {
        self.include_roster = true;
        self
    }
}
