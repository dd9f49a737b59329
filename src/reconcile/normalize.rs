//! Canonical-form normalization of params maps.
//!
//! The canonical (submitted/persisted) form of a params object never
//! carries a field equal to its documented default: defaults are
//! elided so URLs stay compact and structural-equality checks compare
//! intent, not incidental state.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::codec::ParamMap;
use crate::models::{DEFAULT_MAX_RANK, DEFAULT_MIN_RANK, DEFAULT_YEAR};
use crate::models::{DEFAULT_PRESET_MODE, DEFAULT_PRESET_SPLIT};

/// Documented default for a top-level params key, if any.
pub fn default_for(key: &str) -> Option<Value> {
    match key {
        "minRank" => Some(Value::String(DEFAULT_MIN_RANK.to_string())),
        "maxRank" => Some(Value::String(DEFAULT_MAX_RANK.to_string())),
        "gender" => Some(Value::String("Men".to_string())),
        "year" => Some(Value::String(DEFAULT_YEAR.to_string())),
        "baseQuery" | "onQuery" | "offQuery" => Some(Value::String(String::new())),
        "filterGarbage" | "autoOff" => Some(Value::Bool(true)),
        "presetMode" => Some(Value::String(DEFAULT_PRESET_MODE.to_string())),
        "presetSplit" => Some(Value::String(DEFAULT_PRESET_SPLIT.to_string())),
        "queryFilters" => Some(Value::Array(Vec::new())),
        _ => None,
    }
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn strip_vacant(value: &mut Value) {
    if let Value::Object(map) = value {
        for (_, v) in map.iter_mut() {
            strip_vacant(v);
        }
        map.retain(|_, v| !is_vacant(v));
    }
}

/// Remove every key whose value equals its documented default or is
/// empty/nil, in place. Nested objects are stripped of empty members
/// and fold to absent when nothing remains. Idempotent.
pub fn cleanse(params: &mut ParamMap) {
    for (_, value) in params.iter_mut() {
        strip_vacant(value);
    }
    params.retain(|key, value| {
        if is_vacant(value) {
            return false;
        }
        match default_for(key) {
            Some(default) => *value != default,
            None => true,
        }
    });
}

/// Cleansed copy of a params map.
pub fn canonical(params: &ParamMap) -> ParamMap {
    let mut copy = params.clone();
    cleanse(&mut copy);
    copy
}

/// Structural equality on canonical forms.
pub fn structurally_equal(a: &ParamMap, b: &ParamMap) -> bool {
    canonical(a) == canonical(b)
}

/// Short content hash of the canonical form. Key order is stable
/// (params maps are ordered by key), so equal intent hashes equal.
pub fn canonical_hash(params: &ParamMap) -> String {
    let canon = canonical(params);
    let serialized =
        serde_json::to_string(&Value::Object(canon)).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let digest = hasher.finalize();
    let hash = hex::encode(&digest[..8]);
    trace!(hash, "canonical hash");
    hash
}

/// Merge-friendly check: does applying `overlay` onto `base` change its
/// canonical form?
pub fn overlay_is_noop(base: &ParamMap, overlay: &ParamMap) -> bool {
    let mut merged = base.clone();
    for (k, v) in overlay {
        merged.insert(k.clone(), v.clone());
    }
    structurally_equal(base, &merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> ParamMap {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_cleanse_elides_default_rank_band() {
        let mut params = map(json!({
            "minRank": "1",
            "maxRank": "400",
            "team": "Duke"
        }));
        cleanse(&mut params);
        assert_eq!(params, map(json!({ "team": "Duke" })));
    }

    #[test]
    fn test_cleanse_keeps_non_defaults() {
        let mut params = map(json!({
            "minRank": "1",
            "maxRank": "100",
            "gender": "Women",
            "filterGarbage": false
        }));
        cleanse(&mut params);
        assert_eq!(
            params,
            map(json!({
                "maxRank": "100",
                "gender": "Women",
                "filterGarbage": false
            }))
        );
    }

    #[test]
    fn test_cleanse_removes_vacant_values() {
        let mut params = map(json!({
            "team": "Duke",
            "baseQuery": "",
            "queryFilters": [],
            "extra": null,
            "nested": { "query": "", "queryFilters": [] }
        }));
        cleanse(&mut params);
        assert_eq!(params, map(json!({ "team": "Duke" })));
    }

    #[test]
    fn test_cleanse_strips_nested_members() {
        let mut params = map(json!({
            "on": { "query": "\"Flagg, Cooper\"", "queryFilters": [] }
        }));
        cleanse(&mut params);
        assert_eq!(
            params,
            map(json!({ "on": { "query": "\"Flagg, Cooper\"" } }))
        );
    }

    #[test]
    fn test_cleanse_idempotent() {
        let mut once = map(json!({
            "minRank": "1",
            "team": "Duke",
            "autoOff": true,
            "on": { "query": "x", "queryFilters": [] },
            "others": [{ "query": "y" }]
        }));
        cleanse(&mut once);
        let mut twice = once.clone();
        cleanse(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_structural_equality_ignores_defaults() {
        let a = map(json!({ "team": "Duke", "minRank": "1" }));
        let b = map(json!({ "team": "Duke", "gender": "Men" }));
        assert!(structurally_equal(&a, &b));

        let c = map(json!({ "team": "Kansas" }));
        assert!(!structurally_equal(&a, &c));
    }

    #[test]
    fn test_canonical_hash_stable_across_defaults() {
        let a = map(json!({ "team": "Duke", "maxRank": "400" }));
        let b = map(json!({ "team": "Duke" }));
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
        assert_eq!(canonical_hash(&a).len(), 16);

        let c = map(json!({ "team": "Duke", "maxRank": "100" }));
        assert_ne!(canonical_hash(&a), canonical_hash(&c));
    }

    #[test]
    fn test_overlay_noop_detection() {
        let base = map(json!({ "team": "Duke", "maxRank": "100" }));
        assert!(overlay_is_noop(&base, &map(json!({ "maxRank": "100" }))));
        assert!(overlay_is_noop(&base, &map(json!({ "minRank": "1" }))));
        assert!(!overlay_is_noop(&base, &map(json!({ "maxRank": "25" }))));
    }
}
