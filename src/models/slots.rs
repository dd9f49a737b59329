//! On/off/other query slots and their state rules.

use serde::{Deserialize, Serialize};

use super::{fold_empty, StructuredFilter};

/// One named boolean query plus its structured sub-filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySlot {
    pub query: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_filters: Vec<StructuredFilter>,
}

impl QuerySlot {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            query_filters: Vec::new(),
        }
    }

    pub fn with_filters(mut self, filters: Vec<StructuredFilter>) -> Self {
        self.query_filters = filters;
        self
    }

    /// A slot participates in requests only when it has content.
    pub fn is_non_empty(&self) -> bool {
        !self.query.trim().is_empty() || !fold_empty(&self.query_filters).is_empty()
    }
}

/// The full slot state of one filter page: "A" (on), "B" (off) and any
/// extra rows "C", "D", ... (others).
///
/// Invariant: while `auto_off` holds, `off` is derived from `on` and is
/// never independently editable, and `others` must be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuerySlotSet {
    pub on: QuerySlot,
    pub off: QuerySlot,
    pub auto_off: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<QuerySlot>,
}

impl Default for QuerySlotSet {
    fn default() -> Self {
        Self {
            on: QuerySlot::default(),
            off: QuerySlot::default(),
            auto_off: true,
            others: Vec::new(),
        }
    }
}

impl QuerySlotSet {
    /// Enable auto-off derivation. Rejected while extra rows exist,
    /// since the derived negation is only sound against `on` alone.
    pub fn enable_auto_off(&mut self) -> bool {
        if !self.others.is_empty() {
            return false;
        }
        self.auto_off = true;
        self.off = QuerySlot::default();
        true
    }

    /// Switch off auto-derivation, keeping `off` editable from here on.
    pub fn disable_auto_off(&mut self) {
        self.auto_off = false;
    }

    /// Append an extra query row. Adding one disables auto-off.
    pub fn add_other(&mut self, slot: QuerySlot) {
        self.auto_off = false;
        self.others.push(slot);
    }

    /// Remove an extra query row.
    ///
    /// Removing the last row while `off` has no explicit content
    /// re-arms auto-off, so the page returns to the plain on/off view
    /// it started from.
    pub fn remove_other(&mut self, idx: usize) {
        if idx < self.others.len() {
            self.others.remove(idx);
        }
        if self.others.is_empty() && !self.off.is_non_empty() {
            self.auto_off = true;
            self.off = QuerySlot::default();
        }
    }

    /// All non-empty extra rows, in order.
    pub fn non_empty_others(&self) -> Vec<&QuerySlot> {
        self.others.iter().filter(|s| s.is_non_empty()).collect()
    }

    /// Serialize to a params map (camelCase keys).
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    /// Rebuild from a params map, defaulting malformed input.
    pub fn from_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        serde_json::from_value(serde_json::Value::Object(map.clone())).unwrap_or_default()
    }
}
