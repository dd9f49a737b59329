//! Preset registry: named mode and split overlays.
//!
//! The registry is static data consumed read-only by the preset
//! matcher. A built-in registry ships with the crate; a TOML preset
//! pack can be layered over it (same key replaces, new key appends).
//! Matching walks entries in `sort_order`, so packs must keep more
//! specific presets ahead of broader ones. The catch-all "season"
//! mode sorts last.

use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::codec::ParamMap;
use crate::models::{PresetMode, PresetSplit, SplitOverlay};

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read preset pack: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse preset pack: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid preset registry: {0}")]
    ValidationError(String),
}

/// Common-param fields every mode preset pins. Mode overlays extend
/// this, so a custom rank band or garbage setting falls out of every
/// preset and forces advanced mode.
pub fn base_preset_common() -> ParamMap {
    match json!({
        "minRank": "1",
        "maxRank": "400",
        "filterGarbage": true,
        "queryFilters": []
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn common_overlay(base_query: &str) -> ParamMap {
    let mut map = ParamMap::new();
    map.insert("baseQuery".to_string(), json!(base_query));
    map
}

/// On-disk preset pack.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PresetPack {
    modes: Vec<PresetMode>,
    splits: Vec<PresetSplit>,
}

/// The mode and split preset registries for one filter page.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRegistry {
    modes: Vec<PresetMode>,
    splits: Vec<PresetSplit>,
}

impl PresetRegistry {
    /// The built-in registry.
    pub fn builtin() -> Self {
        let modes = vec![
            PresetMode {
                key: "vs-t100".to_string(),
                label: "Vs Top-100 opponents".to_string(),
                sort_order: 10,
                common: common_overlay("opponent.rank:[1 TO 100]"),
            },
            PresetMode {
                key: "conf".to_string(),
                label: "Conference games".to_string(),
                sort_order: 20,
                common: common_overlay("game_type:Conf"),
            },
            PresetMode {
                key: "close-games".to_string(),
                label: "Close games".to_string(),
                sort_order: 30,
                common: common_overlay("end_margin:[-5 TO 5]"),
            },
            PresetMode {
                key: "season".to_string(),
                label: "Whole season".to_string(),
                sort_order: 100,
                common: common_overlay(""),
            },
        ];

        let splits = vec![
            PresetSplit {
                key: "halves".to_string(),
                label: "1st half / 2nd half".to_string(),
                sort_order: 10,
                overlay: SplitOverlay {
                    on_query: "period:1".to_string(),
                    off_query: "period:2".to_string(),
                    auto_off: false,
                    ..Default::default()
                },
            },
            PresetSplit {
                key: "home-away".to_string(),
                label: "Home / Away".to_string(),
                sort_order: 20,
                overlay: SplitOverlay {
                    on_query: "location_type:Home".to_string(),
                    off_query: "location_type:Away".to_string(),
                    auto_off: false,
                    ..Default::default()
                },
            },
            PresetSplit {
                key: "clutch".to_string(),
                label: "Clutch / non-clutch".to_string(),
                sort_order: 30,
                overlay: SplitOverlay {
                    on_query: "clutch:true".to_string(),
                    auto_off: true,
                    ..Default::default()
                },
            },
            PresetSplit {
                key: "no-split".to_string(),
                label: "No split".to_string(),
                sort_order: 100,
                overlay: SplitOverlay {
                    auto_off: true,
                    ..Default::default()
                },
            },
        ];

        let mut registry = Self { modes, splits };
        registry.sort();
        registry
    }

    /// Layer a TOML preset pack over the built-ins.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        let pack: PresetPack = toml::from_str(&contents)?;

        let mut registry = Self::builtin();
        for mode in pack.modes {
            match registry.modes.iter_mut().find(|m| m.key == mode.key) {
                Some(existing) => *existing = mode,
                None => registry.modes.push(mode),
            }
        }
        for split in pack.splits {
            match registry.splits.iter_mut().find(|s| s.key == split.key) {
                Some(existing) => *existing = split,
                None => registry.splits.push(split),
            }
        }

        registry.sort();
        registry.validate()?;
        info!(
            modes = registry.modes.len(),
            splits = registry.splits.len(),
            "loaded preset pack"
        );
        Ok(registry)
    }

    fn sort(&mut self) {
        self.modes.sort_by_key(|m| m.sort_order);
        self.splits.sort_by_key(|s| s.sort_order);
    }

    /// Validate registry invariants.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = std::collections::HashSet::new();
        for mode in &self.modes {
            if mode.key.trim().is_empty() || mode.label.trim().is_empty() {
                return Err(RegistryError::ValidationError(
                    "mode presets need a key and a label".to_string(),
                ));
            }
            if !seen.insert(mode.key.clone()) {
                return Err(RegistryError::ValidationError(format!(
                    "duplicate mode key: {}",
                    mode.key
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for split in &self.splits {
            if split.key.trim().is_empty() || split.label.trim().is_empty() {
                return Err(RegistryError::ValidationError(
                    "split presets need a key and a label".to_string(),
                ));
            }
            if !seen.insert(split.key.clone()) {
                return Err(RegistryError::ValidationError(format!(
                    "duplicate split key: {}",
                    split.key
                )));
            }
            if split.overlay.auto_off
                && (!split.overlay.off_query.is_empty() || !split.overlay.off_filters.is_empty())
            {
                return Err(RegistryError::ValidationError(format!(
                    "split '{}' derives its off slot but also specifies one",
                    split.key
                )));
            }
        }
        Ok(())
    }

    /// Mode entries in matching order.
    pub fn modes(&self) -> &[PresetMode] {
        &self.modes
    }

    /// Split entries in matching order.
    pub fn splits(&self) -> &[PresetSplit] {
        &self.splits
    }

    pub fn mode(&self, key: &str) -> Option<&PresetMode> {
        self.modes.iter().find(|m| m.key == key)
    }

    pub fn split(&self, key: &str) -> Option<&PresetSplit> {
        self.splits.iter().find(|s| s.key == key)
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
