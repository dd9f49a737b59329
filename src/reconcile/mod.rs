//! The filter-state reconciler.
//!
//! One parameterized implementation serves every filter page; the
//! pages differ only in their [`FilterProfile`]: which params
//! namespaces they keep on the URL and which views they enable by
//! default. All functions are pure over their inputs, so the same
//! state always reconciles to the same requests.

pub mod bridge;
pub mod demux;
pub mod fanout;
pub mod filter_str;
pub mod normalize;
pub mod overlay;
pub mod presets;
pub mod slots;

pub use bridge::{to_basic, toggle_mode, BasicSelections, FilterEditMode};
pub use demux::{demux, StatBundle};
pub use fanout::build_requests;
pub use filter_str::{build_filter_str, build_filter_str_for_query, parse_filter};
pub use normalize::{canonical, canonical_hash, cleanse, structurally_equal};
pub use overlay::merge_overlays;
pub use presets::{apply_preset, match_preset, PresetMatch};
pub use slots::{build_slots, BuildTarget, BuiltSlot, BuiltSlots};

use serde::{Deserialize, Serialize};

use crate::codec::{self, ParamMap};
use crate::models::{
    CommonFilterParams, FilterRequestInfo, ParamPrefix, QuerySlotSet, ResponseMap, ScopeSnapshot,
    SplitKey, ViewFlags,
};
use crate::registry::PresetRegistry;

/// Full editable state of one params namespace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub common: CommonFilterParams,
    pub slots: QuerySlotSet,
}

impl FilterState {
    /// Canonical params map: common fields and slot state flattened
    /// into one object, defaults elided.
    pub fn to_params(&self) -> ParamMap {
        let mut params = self.common.to_map();
        params.extend(self.slots.to_map());
        cleanse(&mut params);
        params
    }

    /// Rebuild from a params map; missing fields take their defaults.
    pub fn from_params(params: &ParamMap) -> Self {
        Self {
            common: CommonFilterParams::from_map(params),
            slots: QuerySlotSet::from_map(params),
        }
    }
}

/// Which filter page a reconciler serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterProfile {
    /// Single-namespace game page.
    Game,
    /// Game page plus an independent lineup namespace.
    Lineup,
    /// Two teams side by side under "a." and "b.".
    Matchup,
}

impl FilterProfile {
    /// Params namespaces this page keeps on the URL, primary first.
    pub fn prefixes(&self) -> Vec<ParamPrefix> {
        match self {
            FilterProfile::Game => vec![ParamPrefix::primary()],
            FilterProfile::Lineup => {
                vec![ParamPrefix::primary(), ParamPrefix::named("lineup")]
            }
            FilterProfile::Matchup => {
                vec![ParamPrefix::named("a"), ParamPrefix::named("b")]
            }
        }
    }

    /// Views enabled before the user touches any toggle.
    pub fn default_flags(&self) -> ViewFlags {
        match self {
            FilterProfile::Lineup => ViewFlags {
                roster_breakdown: true,
                ..Default::default()
            },
            _ => ViewFlags::default(),
        }
    }
}

/// The reconciler for one filter page.
pub struct Reconciler {
    profile: FilterProfile,
    registry: PresetRegistry,
    flags: ViewFlags,
}

impl Reconciler {
    pub fn new(profile: FilterProfile) -> Self {
        Self {
            profile,
            registry: PresetRegistry::builtin(),
            flags: profile.default_flags(),
        }
    }

    pub fn with_registry(mut self, registry: PresetRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_flags(mut self, flags: ViewFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn profile(&self) -> FilterProfile {
        self.profile
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    /// Decode a persisted query string into one state per namespace.
    pub fn decode(&self, query: &str) -> Vec<(ParamPrefix, FilterState)> {
        let combined = codec::parse(query);
        self.profile
            .prefixes()
            .into_iter()
            .map(|prefix| {
                let params = if prefix.is_primary() {
                    codec::extract_primary(&combined)
                } else {
                    codec::extract_prefix(&combined, &prefix.0)
                };
                let state = FilterState::from_params(&params);
                (prefix, state)
            })
            .collect()
    }

    /// Encode namespace states back to one canonical query string.
    pub fn encode(&self, states: &[(ParamPrefix, FilterState)]) -> String {
        let mut combined = ParamMap::new();
        for (prefix, state) in states {
            let params = state.to_params();
            if prefix.is_primary() {
                combined.extend(params);
            } else {
                combined.extend(codec::with_prefix(&prefix.0, &params));
            }
        }
        codec::stringify(&combined)
    }

    /// Infer the basic-mode preset selections for a state.
    pub fn match_presets(&self, state: &FilterState, roster: &[String]) -> PresetMatch {
        match_preset(&self.registry, &state.common, &state.slots, roster)
    }

    /// Materialize a preset pair over a state's scope.
    pub fn apply_presets(
        &self,
        state: &FilterState,
        mode_key: &str,
        split_key: &SplitKey,
    ) -> Option<FilterState> {
        apply_preset(&self.registry, &state.common, mode_key, split_key)
            .map(|(common, slots)| FilterState { common, slots })
    }

    /// Resolve the basic-surface selections when leaving advanced mode.
    pub fn leave_advanced(&self, state: &FilterState, roster: &[String]) -> BasicSelections {
        to_basic(&self.registry, &state.common, &state.slots, roster)
    }

    /// Plan the request batch for one namespace's state.
    pub fn plan(
        &self,
        prefix: &ParamPrefix,
        state: &FilterState,
        scope: Option<&ScopeSnapshot>,
    ) -> Vec<FilterRequestInfo> {
        build_requests(&state.common, &state.slots, &self.flags, prefix, scope)
    }

    /// Demultiplex a batched reply for a previously planned batch.
    pub fn collect(
        &self,
        responses: &ResponseMap,
        requests: &[FilterRequestInfo],
        batch_status: u16,
        batch_failed: bool,
    ) -> StatBundle {
        demux(responses, requests, batch_status, batch_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuerySlot;
    use pretty_assertions::assert_eq;

    fn duke_state() -> FilterState {
        let mut state = FilterState::default();
        state.common.team = "Duke".to_string();
        state.slots.on = QuerySlot::new("\"Flagg, Cooper\"");
        state
    }

    #[test]
    fn test_state_params_round_trip() {
        let state = duke_state();
        let params = state.to_params();
        // Defaults are elided from the canonical form
        assert!(!params.contains_key("minRank"));
        assert!(!params.contains_key("autoOff"));
        assert_eq!(FilterState::from_params(&params), state);
    }

    #[test]
    fn test_game_page_single_namespace() {
        let reconciler = Reconciler::new(FilterProfile::Game);
        let qs = reconciler.encode(&[(ParamPrefix::primary(), duke_state())]);
        let decoded = reconciler.decode(&qs);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].1, duke_state());
    }

    #[test]
    fn test_matchup_page_two_namespaces() {
        let reconciler = Reconciler::new(FilterProfile::Matchup);
        let mut kansas = FilterState::default();
        kansas.common.team = "Kansas".to_string();

        let states = vec![
            (ParamPrefix::named("a"), duke_state()),
            (ParamPrefix::named("b"), kansas.clone()),
        ];
        let qs = reconciler.encode(&states);
        let decoded = reconciler.decode(&qs);

        assert_eq!(decoded[0].1.common.team, "Duke");
        assert_eq!(decoded[1].1, kansas);
    }

    #[test]
    fn test_lineup_profile_plans_lineup_requests() {
        let reconciler = Reconciler::new(FilterProfile::Lineup);
        let requests = reconciler.plan(&ParamPrefix::primary(), &duke_state(), None);
        // roster_breakdown is on by default for the lineup page
        assert!(requests.iter().any(|r| r.tag.starts_with("lineups")));
    }

    #[test]
    fn test_decode_ignores_foreign_namespace() {
        let reconciler = Reconciler::new(FilterProfile::Game);
        let decoded = reconciler.decode("team=Duke&lineup.team=Kansas");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].1.common.team, "Duke");
    }

    #[test]
    fn test_leave_advanced_flags_inexpressible_state() {
        let reconciler = Reconciler::new(FilterProfile::Game);
        let mut state = duke_state();
        state.slots.on = QuerySlot::new("period:1 AND clutch:true");
        let selections = reconciler.leave_advanced(&state, &[]);
        assert!(selections.discarded);
    }

    #[test]
    fn test_preset_round_trip_through_facade() {
        let reconciler = Reconciler::new(FilterProfile::Game);
        let state = FilterState {
            common: CommonFilterParams {
                team: "Duke".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let applied = reconciler
            .apply_presets(&state, "conf", &SplitKey::Named("clutch".to_string()))
            .unwrap();
        let m = reconciler.match_presets(&applied, &[]);
        assert_eq!(m.mode.as_deref(), Some("conf"));
        assert_eq!(m.split, Some(SplitKey::Named("clutch".to_string())));
    }
}
