//! Preset matching: inferring the basic-mode selections from state.
//!
//! The basic UI shows two dropdowns (mode and split); the underlying
//! state is always the full common/slot form. Matching answers "could
//! this state have been produced by a preset pair?" so that
//! advanced-to-basic switches recover the original selections, and
//! anything a preset cannot express forces advanced mode instead of
//! silently dropping intent.

use regex::Regex;
use serde_json::json;
use std::sync::OnceLock;
use tracing::debug;

use crate::codec::ParamMap;
use crate::models::{
    CommonFilterParams, PresetSplit, QuerySlot, QuerySlotSet, SplitKey, SplitOverlay,
};
use crate::registry::{base_preset_common, PresetRegistry};

use super::filter_str::{build_filter_str, parse_filter};
use super::normalize::{cleanse, structurally_equal};
use super::overlay::merge_overlays;

/// Result of a preset match. A single-sided match is not usable: the
/// basic UI needs both dropdowns resolved or neither.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetMatch {
    pub mode: Option<String>,
    pub split: Option<SplitKey>,
}

impl PresetMatch {
    /// Both dimensions matched, or nothing.
    pub fn usable(&self) -> Option<(String, SplitKey)> {
        match (&self.mode, &self.split) {
            (Some(mode), Some(split)) => Some((mode.clone(), split.clone())),
            _ => None,
        }
    }
}

fn quoted_player_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^"([^"]+)"$"#).expect("valid regex"))
}

/// The player on/off shorthand: `on` names exactly one roster player
/// (a single quoted token) and `off` is exactly its negation, either
/// via auto-off derivation or the literal `NOT ("...")` form.
fn match_player_on_off(slots: &QuerySlotSet, roster: &[String]) -> Option<String> {
    if !slots.others.is_empty() || !slots.on.query_filters.is_empty() {
        return None;
    }
    let caps = quoted_player_re().captures(slots.on.query.trim())?;
    let name = caps.get(1)?.as_str();
    if !roster.iter().any(|p| p == name) {
        return None;
    }

    let negated = slots.auto_off
        || (slots.off.query_filters.is_empty()
            && slots.off.query.trim() == format!("NOT (\"{}\")", name));
    negated.then(|| name.to_string())
}

/// Canonical signature of a slot set for registry comparison: auto-off
/// folded (a derived off slot carries no content of its own) and empty
/// filters absent.
fn split_signature(slots: &QuerySlotSet) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("onQuery".to_string(), json!(slots.on.query.trim()));
    map.insert(
        "onFilters".to_string(),
        json!(build_filter_str(&slots.on.query_filters)),
    );
    map.insert("autoOff".to_string(), json!(slots.auto_off));
    if !slots.auto_off {
        map.insert("offQuery".to_string(), json!(slots.off.query.trim()));
        map.insert(
            "offFilters".to_string(),
            json!(build_filter_str(&slots.off.query_filters)),
        );
    }
    let others: Vec<serde_json::Value> = slots
        .non_empty_others()
        .iter()
        .map(|s| {
            json!({
                "query": s.query.trim(),
                "filters": build_filter_str(&s.query_filters),
            })
        })
        .collect();
    map.insert("others".to_string(), json!(others));

    cleanse(&mut map);
    map
}

fn overlay_signature(overlay: &SplitOverlay) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("onQuery".to_string(), json!(overlay.on_query));
    map.insert("onFilters".to_string(), json!(overlay.on_filters));
    map.insert("autoOff".to_string(), json!(overlay.auto_off));
    if !overlay.auto_off {
        map.insert("offQuery".to_string(), json!(overlay.off_query));
        map.insert("offFilters".to_string(), json!(overlay.off_filters));
    }
    cleanse(&mut map);
    map
}

/// Find the preset pair structurally equal to the current state.
///
/// Mode: first registry entry whose overlay (over the shared preset
/// base) leaves the common params unchanged. Split: the player on/off
/// shorthand, then registry entries in order.
pub fn match_preset(
    registry: &PresetRegistry,
    common: &CommonFilterParams,
    slots: &QuerySlotSet,
    roster: &[String],
) -> PresetMatch {
    let common_map = common.to_map();
    let base = base_preset_common();

    let mode = registry
        .modes()
        .iter()
        .find(|entry| {
            let overlaid = merge_overlays(&common_map, &[&base, &entry.common]);
            structurally_equal(&common_map, &overlaid)
        })
        .map(|entry| entry.key.clone());

    let split = match match_player_on_off(slots, roster) {
        Some(player) => Some(SplitKey::PlayerOnOff(player)),
        None => {
            let signature = split_signature(slots);
            registry
                .splits()
                .iter()
                .find(|entry| overlay_signature(&entry.overlay) == signature)
                .map(|entry| SplitKey::Named(entry.key.clone()))
        }
    };

    debug!(?mode, ?split, "preset match");
    PresetMatch { mode, split }
}

fn apply_split(split: &PresetSplit, season: &str) -> QuerySlotSet {
    let overlay = &split.overlay;
    let mut slots = QuerySlotSet {
        on: QuerySlot::new(overlay.on_query.clone())
            .with_filters(parse_filter(&overlay.on_filters, season)),
        off: QuerySlot::default(),
        auto_off: overlay.auto_off,
        others: Vec::new(),
    };
    if !overlay.auto_off {
        slots.off = QuerySlot::new(overlay.off_query.clone())
            .with_filters(parse_filter(&overlay.off_filters, season));
    }
    slots
}

/// Reconstruct the state a preset pair stands for, keeping the scope
/// (team/year/gender) of the supplied common params. Returns `None`
/// for an unknown named key.
pub fn apply_preset(
    registry: &PresetRegistry,
    scope_common: &CommonFilterParams,
    mode_key: &str,
    split_key: &SplitKey,
) -> Option<(CommonFilterParams, QuerySlotSet)> {
    let mode = registry.mode(mode_key)?;

    let mut scoped = CommonFilterParams {
        team: scope_common.team.clone(),
        year: scope_common.year.clone(),
        gender: scope_common.gender,
        ..Default::default()
    }
    .to_map();
    scoped = merge_overlays(&scoped, &[&base_preset_common(), &mode.common]);
    let common = CommonFilterParams::from_map(&scoped);

    let slots = match split_key {
        SplitKey::Named(key) => apply_split(registry.split(key)?, &common.year),
        SplitKey::PlayerOnOff(player) => QuerySlotSet {
            on: QuerySlot::new(format!("\"{}\"", player)),
            ..Default::default()
        },
    };

    Some((common, slots))
}
