//! Layered overlay merge for params maps.
//!
//! Precedence is positional and explicit: later layers win. Callers
//! order layers scope-default < preset overlay < user edit, so a user
//! edit always survives a preset and a preset always survives the
//! scope default. This replaces ad-hoc spread-order merging, where
//! reordering two spreads silently changed precedence.

use crate::codec::ParamMap;

/// Merge overlay layers onto a base map. Later layers win per key.
/// Only top-level keys are merged; an overlay value replaces the base
/// value wholesale (a slot overlay is one intent, not a patch).
pub fn merge_overlays(base: &ParamMap, layers: &[&ParamMap]) -> ParamMap {
    let mut merged = base.clone();
    for layer in layers {
        for (key, value) in layer.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
