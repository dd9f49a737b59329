//! Query-slot builder: UI slot state to canonical request slots.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

use crate::models::{QuerySlot, QuerySlotSet, ScopeSnapshot};

use super::filter_str::{build_filter_str, build_filter_str_for_query};

/// One canonical slot as sent to the search collaborator.
///
/// A literal slot carries `base_query`/`query_filters`. An auto-derived
/// off slot instead carries the on-slot's content marked for inversion
/// (`invert_base`/`invert_base_query_filters`): the backend applies a
/// native NOT-clause, since string-negating a complex boolean
/// expression is not generally sound.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltSlot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_filters: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert_base: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invert_base_query_filters: Option<String>,
}

/// The canonical slot set for one submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuiltSlots {
    pub on: Option<BuiltSlot>,
    pub off: Option<BuiltSlot>,
    pub others: Vec<BuiltSlot>,
}

/// How the built value will be used: sent as a request, or redisplayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// Expand roster shortcuts and resolve game selections.
    Request,
    /// Preserve shortcuts and unresolved descriptors for the UI.
    Display,
}

fn roster_shortcut_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@roster\b").expect("valid regex"))
}

/// Expand the `@roster` shortcut into an OR-list of quoted roster
/// names. Left intact when the roster is unknown, so the query still
/// round-trips for redisplay.
pub fn replace_roster_shortcut(query: &str, roster: &[String]) -> String {
    if !roster_shortcut_re().is_match(query) {
        return query.to_string();
    }
    if roster.is_empty() {
        warn!("roster shortcut used with no roster in scope");
        return query.to_string();
    }
    let expansion = format!(
        "({})",
        roster
            .iter()
            .map(|p| format!("\"{}\"", p))
            .collect::<Vec<_>>()
            .join(" OR ")
    );
    roster_shortcut_re().replace_all(query, expansion.as_str()).into_owned()
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn render_slot(slot: &QuerySlot, target: BuildTarget, scope: Option<&ScopeSnapshot>) -> (Option<String>, Option<String>) {
    let empty = ScopeSnapshot::default();
    let scope = scope.unwrap_or(&empty);
    let query = match target {
        BuildTarget::Request => replace_roster_shortcut(&slot.query, &scope.roster),
        BuildTarget::Display => slot.query.clone(),
    };
    let filters = match target {
        BuildTarget::Request => build_filter_str_for_query(&slot.query_filters, &scope.games),
        BuildTarget::Display => build_filter_str(&slot.query_filters),
    };
    (non_empty(query), non_empty(filters))
}

fn literal_slot(slot: &QuerySlot, target: BuildTarget, scope: Option<&ScopeSnapshot>) -> BuiltSlot {
    let (base_query, query_filters) = render_slot(slot, target, scope);
    BuiltSlot {
        base_query,
        query_filters,
        ..Default::default()
    }
}

/// Build the canonical slots for submission or redisplay.
pub fn build_slots(
    slots: &QuerySlotSet,
    target: BuildTarget,
    scope: Option<&ScopeSnapshot>,
) -> BuiltSlots {
    let on = slots
        .on
        .is_non_empty()
        .then(|| literal_slot(&slots.on, target, scope));

    let off = if slots.auto_off {
        // Derived off: the on-slot's content, marked for native inversion
        on.as_ref().map(|on_slot| BuiltSlot {
            invert_base: on_slot.base_query.clone(),
            invert_base_query_filters: on_slot.query_filters.clone(),
            ..Default::default()
        })
    } else {
        slots
            .off
            .is_non_empty()
            .then(|| literal_slot(&slots.off, target, scope))
    };

    let others = slots
        .non_empty_others()
        .into_iter()
        .map(|slot| literal_slot(slot, target, scope))
        .collect();

    BuiltSlots { on, off, others }
}
