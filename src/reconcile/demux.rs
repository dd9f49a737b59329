//! Response demultiplexer: the batched search reply back into typed
//! stat models.
//!
//! Demultiplexing is total. A tag missing from the reply yields the
//! model's empty sentinel, a failed batch yields empty sentinels with
//! the batch status carried as `error_code`, and nothing here panics
//! on malformed payloads. Display state always ends up fully
//! populated, so the error surfaces in the view instead of tearing
//! down the page.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    FilterRequestInfo, LineupStats, PlayerStats, ResponseMap, RosterStats, ShotStats,
    TaggedResponse, TeamStats, TAG_GLOBAL_PLAYERS, TAG_LINEUPS, TAG_PLAYERS, TAG_PLAYER_SHOTS,
    TAG_ROSTER, TAG_SHOTS, TAG_TEAM,
};

/// Every stat model a filter page consumes, fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBundle {
    pub team: TeamStats,
    pub roster: RosterStats,
    pub players: PlayerStats,
    pub global_players: PlayerStats,
    pub shots: ShotStats,
    pub player_shots: ShotStats,

    /// One entry per issued lineup request, in slot order.
    pub lineups: Vec<LineupStats>,
}

fn failed(status: u16) -> TaggedResponse {
    TaggedResponse {
        status,
        responses: Vec::new(),
    }
}

/// Demultiplex a batched reply against the requests that produced it.
///
/// `batch_status` is the transport-level outcome: when `batch_failed`
/// is set the per-tag payloads are ignored and every requested model
/// carries that status as its `error_code`.
pub fn demux(
    responses: &ResponseMap,
    requests: &[FilterRequestInfo],
    batch_status: u16,
    batch_failed: bool,
) -> StatBundle {
    let sentinel = failed(batch_status);
    let lookup = |tag: &str| -> Option<&TaggedResponse> {
        if !requests.iter().any(|r| r.tag == tag) {
            return None;
        }
        if batch_failed {
            return Some(&sentinel);
        }
        Some(responses.get(tag).unwrap_or(&sentinel))
    };

    let mut bundle = StatBundle::default();
    if let Some(resp) = lookup(TAG_TEAM) {
        bundle.team = TeamStats::from_response(resp);
    }
    if let Some(resp) = lookup(TAG_ROSTER) {
        bundle.roster = RosterStats::from_response(resp);
    }
    if let Some(resp) = lookup(TAG_PLAYERS) {
        bundle.players = PlayerStats::from_response(resp);
    }
    if let Some(resp) = lookup(TAG_GLOBAL_PLAYERS) {
        bundle.global_players = PlayerStats::from_response(resp);
    }
    if let Some(resp) = lookup(TAG_SHOTS) {
        bundle.shots = ShotStats::from_response(resp);
    }
    if let Some(resp) = lookup(TAG_PLAYER_SHOTS) {
        bundle.player_shots = ShotStats::from_response(resp);
    }

    let mut n = 0;
    loop {
        let tag = format!("{}{}", TAG_LINEUPS, n);
        match lookup(&tag) {
            Some(resp) => bundle.lineups.push(LineupStats::from_response(resp)),
            None => break,
        }
        n += 1;
    }

    debug!(
        requested = requests.len(),
        received = responses.len(),
        batch_status,
        "demultiplexed batch"
    );
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParamPrefix;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request(tag: &str) -> FilterRequestInfo {
        FilterRequestInfo::new(tag, ParamPrefix::primary(), Default::default())
    }

    fn roster_response() -> TaggedResponse {
        TaggedResponse {
            status: 200,
            responses: vec![json!({
                "hits": { "hits": [ { "_source": { "player": "Flagg, Cooper" } } ] }
            })],
        }
    }

    #[test]
    fn test_missing_tag_yields_empty_sentinel() {
        let requests = vec![request(TAG_TEAM), request(TAG_ROSTER), request(TAG_SHOTS)];
        let mut responses = ResponseMap::new();
        responses.insert(TAG_ROSTER.to_string(), roster_response());

        let bundle = demux(&responses, &requests, 200, false);
        assert_eq!(bundle.roster.players.len(), 1);
        // Requested but absent from the reply: empty with the batch status
        assert_eq!(bundle.shots.zones, Vec::<serde_json::Value>::new());
        assert_eq!(bundle.shots.error_code, None);
        // Never requested: plain sentinel, no error
        assert_eq!(bundle.players, PlayerStats::empty());
    }

    #[test]
    fn test_batch_failure_marks_every_requested_model() {
        let requests = vec![request(TAG_TEAM), request(TAG_ROSTER), request(TAG_SHOTS)];
        let mut responses = ResponseMap::new();
        // Payload present but the batch failed: it must be ignored
        responses.insert(TAG_ROSTER.to_string(), roster_response());

        let bundle = demux(&responses, &requests, 503, true);
        assert_eq!(bundle.team.error_code, Some(503));
        assert_eq!(bundle.roster.error_code, Some(503));
        assert_eq!(bundle.roster.players, Vec::<serde_json::Value>::new());
        assert_eq!(bundle.shots.error_code, Some(503));
        // Unrequested models stay clean
        assert_eq!(bundle.players.error_code, None);
    }

    #[test]
    fn test_lineups_collected_in_slot_order() {
        let requests = vec![
            request(TAG_TEAM),
            request("lineups0"),
            request("lineups1"),
        ];
        let mut responses = ResponseMap::new();
        responses.insert(
            "lineups0".to_string(),
            TaggedResponse {
                status: 200,
                responses: vec![json!({
                    "aggregations": { "lineups": { "buckets": [{ "doc_count": 7 }] } }
                })],
            },
        );

        let bundle = demux(&responses, &requests, 200, false);
        assert_eq!(bundle.lineups.len(), 2);
        assert_eq!(bundle.lineups[0].lineups[0]["doc_count"], 7);
        assert_eq!(bundle.lineups[1], LineupStats::empty());
    }

    #[test]
    fn test_empty_everything_is_total() {
        let bundle = demux(&ResponseMap::new(), &[], 200, false);
        assert_eq!(bundle, StatBundle::default());
    }

    #[test]
    fn test_per_tag_error_status_carried_as_data() {
        let requests = vec![request(TAG_TEAM)];
        let mut responses = ResponseMap::new();
        responses.insert(TAG_TEAM.to_string(), failed(429));

        let bundle = demux(&responses, &requests, 200, false);
        assert_eq!(bundle.team.error_code, Some(429));
        assert_eq!(bundle.team.doc_count, 0);
    }
}
