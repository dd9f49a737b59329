//! Typed stat models demultiplexed from the batched search response.
//!
//! The aggregation bucket shapes are an opaque external contract; each
//! model only walks the `aggregations.*` paths it owns and keeps the
//! buckets as raw JSON. Every model has an `empty()` sentinel so the
//! demultiplexer never yields a missing field, and an `error_code`
//! carried as data to the display layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One tagged sub-response from the batched search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggedResponse {
    pub status: u16,
    pub responses: Vec<Value>,
}

impl TaggedResponse {
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    fn first(&self) -> Option<&Value> {
        self.responses.first()
    }
}

/// Batched response keyed by request tag.
pub type ResponseMap = HashMap<String, TaggedResponse>;

fn pointer_u64(v: Option<&Value>, path: &str) -> u64 {
    v.and_then(|v| v.pointer(path)).and_then(Value::as_u64).unwrap_or(0)
}

fn pointer_obj(v: Option<&Value>, path: &str) -> Value {
    v.and_then(|v| v.pointer(path))
        .cloned()
        .unwrap_or(Value::Null)
}

fn pointer_array(v: Option<&Value>, path: &str) -> Vec<Value> {
    v.and_then(|v| v.pointer(path))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Team on/off aggregation triple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub doc_count: u64,
    pub baseline: Value,
    pub on: Value,
    pub off: Value,

    /// Sub-slot buckets for extra query rows ("other_0", "other_1", ...).
    pub others: Vec<Value>,

    pub error_code: Option<u16>,
}

impl TeamStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: &TaggedResponse) -> Self {
        let first = resp.first();
        let others = pointer_array(first, "/aggregations/tri_filter/buckets/others/buckets");
        Self {
            doc_count: pointer_u64(first, "/hits/total/value"),
            baseline: pointer_obj(first, "/aggregations/tri_filter/buckets/baseline"),
            on: pointer_obj(first, "/aggregations/tri_filter/buckets/on"),
            off: pointer_obj(first, "/aggregations/tri_filter/buckets/off"),
            others,
            error_code: resp.is_error().then_some(resp.status),
        }
    }
}

/// Per-player aggregation buckets for the baseline/on/off triple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub baseline: Vec<Value>,
    pub on: Vec<Value>,
    pub off: Vec<Value>,
    pub error_code: Option<u16>,
}

impl PlayerStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: &TaggedResponse) -> Self {
        let first = resp.first();
        Self {
            baseline: pointer_array(first, "/aggregations/tri_filter/buckets/baseline/player/buckets"),
            on: pointer_array(first, "/aggregations/tri_filter/buckets/on/player/buckets"),
            off: pointer_array(first, "/aggregations/tri_filter/buckets/off/player/buckets"),
            error_code: resp.is_error().then_some(resp.status),
        }
    }
}

/// Lineup aggregation buckets for one query slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineupStats {
    pub lineups: Vec<Value>,
    pub error_code: Option<u16>,
}

impl LineupStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: &TaggedResponse) -> Self {
        Self {
            lineups: pointer_array(resp.first(), "/aggregations/lineups/buckets"),
            error_code: resp.is_error().then_some(resp.status),
        }
    }
}

/// Shot-location aggregation buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotStats {
    pub zones: Vec<Value>,
    pub error_code: Option<u16>,
}

impl ShotStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: &TaggedResponse) -> Self {
        Self {
            zones: pointer_array(resp.first(), "/aggregations/shot_chart/buckets"),
            error_code: resp.is_error().then_some(resp.status),
        }
    }
}

/// Roster documents for the current scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub players: Vec<Value>,
    pub error_code: Option<u16>,
}

impl RosterStats {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_response(resp: &TaggedResponse) -> Self {
        Self {
            players: pointer_array(resp.first(), "/hits/hits"),
            error_code: resp.is_error().then_some(resp.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team_response() -> TaggedResponse {
        TaggedResponse {
            status: 200,
            responses: vec![json!({
                "hits": { "total": { "value": 1325 } },
                "aggregations": {
                    "tri_filter": {
                        "buckets": {
                            "baseline": { "doc_count": 1325, "pts": { "value": 78.2 } },
                            "on": { "doc_count": 820, "pts": { "value": 81.0 } },
                            "off": { "doc_count": 505, "pts": { "value": 73.4 } }
                        }
                    }
                }
            })],
        }
    }

    #[test]
    fn test_team_stats_from_response() {
        let stats = TeamStats::from_response(&team_response());
        assert_eq!(stats.doc_count, 1325);
        assert_eq!(stats.on["doc_count"], 820);
        assert_eq!(stats.error_code, None);
    }

    #[test]
    fn test_team_stats_error_status() {
        let mut resp = team_response();
        resp.status = 503;
        let stats = TeamStats::from_response(&resp);
        assert_eq!(stats.error_code, Some(503));
        // Payload still extracted if present
        assert_eq!(stats.doc_count, 1325);
    }

    #[test]
    fn test_models_tolerate_missing_aggregations() {
        let resp = TaggedResponse {
            status: 200,
            responses: vec![json!({})],
        };
        assert_eq!(TeamStats::from_response(&resp), TeamStats::empty());
        assert_eq!(PlayerStats::from_response(&resp), PlayerStats::empty());
        assert_eq!(LineupStats::from_response(&resp), LineupStats::empty());
        assert_eq!(ShotStats::from_response(&resp), ShotStats::empty());
    }

    #[test]
    fn test_models_tolerate_empty_response_list() {
        let resp = TaggedResponse::default();
        assert_eq!(TeamStats::from_response(&resp), TeamStats::empty());
        assert_eq!(RosterStats::from_response(&resp), RosterStats::empty());
    }

    #[test]
    fn test_lineup_stats_buckets() {
        let resp = TaggedResponse {
            status: 200,
            responses: vec![json!({
                "aggregations": { "lineups": { "buckets": [
                    { "key": "A_B_C_D_E", "doc_count": 55 }
                ]}}
            })],
        };
        let stats = LineupStats::from_response(&resp);
        assert_eq!(stats.lineups.len(), 1);
        assert_eq!(stats.lineups[0]["doc_count"], 55);
    }
}
