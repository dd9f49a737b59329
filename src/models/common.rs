//! Team/season scope parameters shared by every filter page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::StructuredFilter;

/// Default season label.
pub const DEFAULT_YEAR: &str = "2024/25";

/// Default rank band lower bound.
pub const DEFAULT_MIN_RANK: &str = "1";

/// Default rank band upper bound.
pub const DEFAULT_MAX_RANK: &str = "400";

/// Men's or women's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Men,
    Women,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Men => write!(f, "Men"),
            Gender::Women => write!(f, "Women"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Men" | "men" => Ok(Gender::Men),
            "Women" | "women" => Ok(Gender::Women),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// Scope and base-query parameters owned by the page-level state.
///
/// Serialized form uses camelCase keys, matching the persisted URL
/// params. Fields equal to their documented default are elided from
/// the canonical form by the normalizer, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonFilterParams {
    pub team: String,

    /// Season label, e.g. "2024/25".
    pub year: String,

    pub gender: Gender,

    /// Rank band bounds, kept as strings to round-trip URL params
    /// without reformatting.
    pub min_rank: String,
    pub max_rank: String,

    /// Base boolean query applied to every slot.
    pub base_query: String,

    /// Structured sub-filters attached to the base query.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_filters: Vec<StructuredFilter>,

    /// Exclude garbage-time possessions.
    pub filter_garbage: bool,
}

impl Default for CommonFilterParams {
    fn default() -> Self {
        Self {
            team: String::new(),
            year: DEFAULT_YEAR.to_string(),
            gender: Gender::Men,
            min_rank: DEFAULT_MIN_RANK.to_string(),
            max_rank: DEFAULT_MAX_RANK.to_string(),
            base_query: String::new(),
            query_filters: Vec::new(),
            filter_garbage: true,
        }
    }
}

impl CommonFilterParams {
    /// Scope triple for roster/game-selection fetches.
    pub fn scope(&self) -> super::ScopeKey {
        super::ScopeKey {
            team: self.team.clone(),
            year: self.year.clone(),
            gender: self.gender,
        }
    }

    /// True when the rank band covers the whole field.
    pub fn full_rank_band(&self) -> bool {
        self.min_rank == DEFAULT_MIN_RANK && self.max_rank == DEFAULT_MAX_RANK
    }

    /// Serialize to a params map (camelCase keys).
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    /// Rebuild from a params map, falling back to defaults for any
    /// missing or malformed field.
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        serde_json::from_value(serde_json::Value::Object(map.clone())).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_display_and_parse() {
        assert_eq!(format!("{}", Gender::Men), "Men");
        assert_eq!("Women".parse::<Gender>().unwrap(), Gender::Women);
        assert!("Mixed".parse::<Gender>().is_err());
    }

    #[test]
    fn test_defaults() {
        let common = CommonFilterParams::default();
        assert_eq!(common.year, "2024/25");
        assert_eq!(common.min_rank, "1");
        assert_eq!(common.max_rank, "400");
        assert!(common.filter_garbage);
        assert!(common.full_rank_band());
    }

    #[test]
    fn test_map_round_trip() {
        let mut common = CommonFilterParams::default();
        common.team = "Duke".to_string();
        common.base_query = "\"Flagg, Cooper\"".to_string();

        let map = common.to_map();
        assert_eq!(map["team"], "Duke");
        assert_eq!(map["baseQuery"], "\"Flagg, Cooper\"");

        let back = CommonFilterParams::from_map(&map);
        assert_eq!(back, common);
    }

    #[test]
    fn test_from_map_malformed_falls_back() {
        let mut map = serde_json::Map::new();
        map.insert("minRank".to_string(), serde_json::json!(["not", "a", "rank"]));
        let common = CommonFilterParams::from_map(&map);
        assert_eq!(common, CommonFilterParams::default());
    }

    #[test]
    fn test_full_rank_band() {
        let mut common = CommonFilterParams::default();
        common.min_rank = "25".to_string();
        assert!(!common.full_rank_band());
    }
}
