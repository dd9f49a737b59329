//! Basic/advanced editing-mode bridge.
//!
//! Advanced-to-basic is lossy: any state no preset pair can express is
//! replaced by the default pair. The bridge never applies that switch
//! silently; it reports whether intent would be discarded so the
//! caller can confirm with the user first. Basic-to-advanced changes
//! nothing, since presets are only a view over the full state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    CommonFilterParams, QuerySlotSet, SplitKey, DEFAULT_PRESET_MODE, DEFAULT_PRESET_SPLIT,
};
use crate::registry::PresetRegistry;

use super::presets::match_preset;

/// Which editing surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterEditMode {
    #[default]
    Basic,
    Advanced,
}

/// Outcome of switching to the basic surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicSelections {
    pub mode: String,
    pub split: SplitKey,

    /// The current state could not be expressed by any preset pair and
    /// would be replaced by the defaults above. Confirm before applying.
    pub discarded: bool,
}

/// Resolve the basic-mode dropdown selections for the current state.
pub fn to_basic(
    registry: &PresetRegistry,
    common: &CommonFilterParams,
    slots: &QuerySlotSet,
    roster: &[String],
) -> BasicSelections {
    match match_preset(registry, common, slots, roster).usable() {
        Some((mode, split)) => BasicSelections {
            mode,
            split,
            discarded: false,
        },
        None => {
            debug!("state not expressible as a preset pair, basic switch would discard it");
            BasicSelections {
                mode: DEFAULT_PRESET_MODE.to_string(),
                split: SplitKey::Named(DEFAULT_PRESET_SPLIT.to_string()),
                discarded: true,
            }
        }
    }
}

/// Flip the editing surface. Switching to advanced carries no data
/// change, so the selections are `None`; switching to basic resolves
/// the dropdown selections (and the discard flag) for the caller to
/// apply once confirmed.
pub fn toggle_mode(
    current: FilterEditMode,
    registry: &PresetRegistry,
    common: &CommonFilterParams,
    slots: &QuerySlotSet,
    roster: &[String],
) -> (FilterEditMode, Option<BasicSelections>) {
    match current {
        FilterEditMode::Basic => (FilterEditMode::Advanced, None),
        FilterEditMode::Advanced => (
            FilterEditMode::Basic,
            Some(to_basic(registry, common, slots, roster)),
        ),
    }
}
