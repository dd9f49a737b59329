//! Preset definitions: named overlays over common params and slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Key of the mode preset selected when nothing else matches.
pub const DEFAULT_PRESET_MODE: &str = "season";

/// Key of the split preset selected when nothing else matches.
pub const DEFAULT_PRESET_SPLIT: &str = "no-split";

/// A "mode" preset: an overlay onto the common scope params
/// (rank band, base query, garbage filtering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMode {
    pub key: String,
    pub label: String,

    /// Registry iteration order; lower sorts first. Matching walks the
    /// registry in this order and the first structural match wins, so
    /// more specific presets must sort before broader ones.
    #[serde(default)]
    pub sort_order: u32,

    /// Partial common-params overlay (camelCase keys).
    #[serde(default)]
    pub common: Map<String, Value>,
}

/// Slot overlay carried by a split preset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOverlay {
    pub on_query: String,
    pub off_query: String,

    /// Raw filter strings in the `filter_str` grammar.
    pub on_filters: String,
    pub off_filters: String,

    pub auto_off: bool,
}

/// A "split" preset: an overlay onto the on/off query slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSplit {
    pub key: String,
    pub label: String,

    #[serde(default)]
    pub sort_order: u32,

    #[serde(default)]
    pub overlay: SplitOverlay,
}

/// A matched split selection. The player on/off shorthand is a dynamic
/// split derived from the roster, not a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitKey {
    Named(String),
    PlayerOnOff(String),
}

impl fmt::Display for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitKey::Named(key) => write!(f, "{}", key),
            SplitKey::PlayerOnOff(player) => write!(f, "player-on-off:{}", player),
        }
    }
}
