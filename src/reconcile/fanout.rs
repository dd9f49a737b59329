//! Request fan-out: one filter submission to its batch of sub-requests.
//!
//! Every submission issues the team, roster and on/off player requests.
//! The rest are conditional: shot charts follow their view toggles,
//! lineup aggregations are issued once per non-empty slot when a
//! lineup-consuming view is on, and the season-wide player request is
//! issued only when the baseline actually diverges from the canonical
//! no-query baseline for that season, so the shared cache entry is
//! reused instead of refetched.

use serde_json::{json, Value};

use crate::codec::ParamMap;
use crate::models::{
    CommonFilterParams, FilterRequestInfo, ParamPrefix, QuerySlotSet, ScopeSnapshot, ViewFlags,
    TAG_GLOBAL_PLAYERS, TAG_LINEUPS, TAG_PLAYERS, TAG_PLAYER_SHOTS, TAG_ROSTER, TAG_SHOTS,
    TAG_TEAM,
};

use super::filter_str::build_filter_str_for_query;
use super::normalize::{canonical_hash, cleanse};
use super::slots::{build_slots, replace_roster_shortcut, BuildTarget, BuiltSlot, BuiltSlots};

fn slot_value(slot: &BuiltSlot) -> Value {
    serde_json::to_value(slot).unwrap_or(Value::Null)
}

/// Baseline params common to every sub-request: the scope, rank band
/// and fully rendered base query. Roster shortcuts and game selections
/// are resolved here, never in the persisted form.
fn baseline_params(common: &CommonFilterParams, scope: Option<&ScopeSnapshot>) -> ParamMap {
    let empty = ScopeSnapshot::default();
    let scope = scope.unwrap_or(&empty);

    let mut params = ParamMap::new();
    params.insert("team".to_string(), json!(common.team));
    params.insert("year".to_string(), json!(common.year));
    params.insert("gender".to_string(), json!(common.gender.to_string()));
    params.insert("minRank".to_string(), json!(common.min_rank));
    params.insert("maxRank".to_string(), json!(common.max_rank));
    params.insert(
        "baseQuery".to_string(),
        json!(replace_roster_shortcut(&common.base_query, &scope.roster)),
    );
    params.insert(
        "queryFilters".to_string(),
        json!(build_filter_str_for_query(
            &common.query_filters,
            &scope.games
        )),
    );
    if !common.filter_garbage {
        params.insert("filterGarbage".to_string(), json!(false));
    }
    params
}

fn full_params(baseline: &ParamMap, built: &BuiltSlots) -> ParamMap {
    let mut params = baseline.clone();
    if let Some(on) = &built.on {
        params.insert("on".to_string(), slot_value(on));
    }
    if let Some(off) = &built.off {
        params.insert("off".to_string(), slot_value(off));
    }
    if !built.others.is_empty() {
        params.insert(
            "others".to_string(),
            Value::Array(built.others.iter().map(slot_value).collect()),
        );
    }
    cleanse(&mut params);
    params
}

/// True when the baseline (everything but the team itself) diverges
/// from the canonical no-query baseline of the same season, in which
/// case the shared season-wide player cache cannot serve it.
fn baseline_diverges(baseline: &ParamMap, built: &BuiltSlots) -> bool {
    let mut subset = baseline.clone();
    subset.remove("team");
    if let Some(on) = &built.on {
        subset.insert("on".to_string(), slot_value(on));
    }
    if let Some(off) = &built.off {
        subset.insert("off".to_string(), slot_value(off));
    }

    let mut canonical = ParamMap::new();
    canonical.insert("year".to_string(), baseline["year"].clone());
    canonical.insert("gender".to_string(), baseline["gender"].clone());

    canonical_hash(&subset) != canonical_hash(&canonical)
}

/// Build the minimal request batch for one submission.
pub fn build_requests(
    common: &CommonFilterParams,
    slots: &QuerySlotSet,
    flags: &ViewFlags,
    prefix: &ParamPrefix,
    scope: Option<&ScopeSnapshot>,
) -> Vec<FilterRequestInfo> {
    let built = build_slots(slots, BuildTarget::Request, scope);
    let baseline = baseline_params(common, scope);
    let params = full_params(&baseline, &built);

    let mut requests = vec![
        FilterRequestInfo::new(TAG_TEAM, prefix.clone(), params.clone()),
        FilterRequestInfo::new(TAG_ROSTER, prefix.clone(), params.clone()).with_roster(),
        FilterRequestInfo::new(TAG_PLAYERS, prefix.clone(), params.clone()),
    ];

    if flags.shot_charts {
        requests.push(FilterRequestInfo::new(
            TAG_SHOTS,
            prefix.clone(),
            params.clone(),
        ));
    }
    if flags.player_shot_charts {
        requests.push(FilterRequestInfo::new(
            TAG_PLAYER_SHOTS,
            prefix.clone(),
            params.clone(),
        ));
    }

    if baseline_diverges(&baseline, &built) {
        let mut global = baseline.clone();
        global.remove("team");
        if let Some(on) = &built.on {
            global.insert("on".to_string(), slot_value(on));
        }
        if let Some(off) = &built.off {
            global.insert("off".to_string(), slot_value(off));
        }
        cleanse(&mut global);
        requests.push(FilterRequestInfo::new(
            TAG_GLOBAL_PLAYERS,
            prefix.clone(),
            global,
        ));
    }

    if flags.needs_lineups() {
        let mut lineup_slots: Vec<&BuiltSlot> = Vec::new();
        lineup_slots.extend(built.on.as_ref());
        lineup_slots.extend(built.off.as_ref());
        lineup_slots.extend(built.others.iter());

        for (n, slot) in lineup_slots.into_iter().enumerate() {
            let mut lineup = baseline.clone();
            lineup.insert("slot".to_string(), slot_value(slot));
            cleanse(&mut lineup);
            requests.push(FilterRequestInfo::new(
                format!("{}{}", TAG_LINEUPS, n),
                prefix.clone(),
                lineup,
            ));
        }
    }

    requests
}
