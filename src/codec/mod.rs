//! Persisted query-string codec for params maps.
//!
//! Each top-level params object serializes to `key=value&...` pairs.
//! Array/object-valued fields are carried as JSON text inside the
//! value; booleans round-trip as `true`/`false`. Numeric-looking
//! strings stay strings, so rank bounds survive the round trip
//! unchanged. A dotted prefix (`lineup.key=value`) namespaces a second
//! independent params object on the same URL.
//!
//! Parsing is total: anything that is not JSON or a boolean is kept as
//! a plain string. The fallback is "show less data", never fail.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Flat params object, camelCase keys.
pub type ParamMap = Map<String, Value>;

fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn decode_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if raw.starts_with('[') || raw.starts_with('{') {
        if let Ok(v) = serde_json::from_str::<Value>(raw) {
            return v;
        }
    }
    Value::String(raw.to_string())
}

/// Serialize a params map to a query string, keys sorted for a stable
/// persisted form. Callers cleanse the map first; stringify itself
/// elides nothing.
pub fn stringify(params: &ParamMap) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    let mut ser = form_urlencoded::Serializer::new(String::new());
    for key in keys {
        ser.append_pair(key, &encode_value(&params[key.as_str()]));
    }
    ser.finish()
}

/// Parse a query string back into a params map. Repeated keys keep the
/// last occurrence.
pub fn parse(query: &str) -> ParamMap {
    let mut map = ParamMap::new();
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        map.insert(key.into_owned(), decode_value(&value));
    }
    map
}

/// Namespace every key of `params` under `prefix.`.
pub fn with_prefix(prefix: &str, params: &ParamMap) -> ParamMap {
    params
        .iter()
        .map(|(k, v)| (format!("{}.{}", prefix, k), v.clone()))
        .collect()
}

/// Extract the sub-map stored under `prefix.`, stripping the prefix.
pub fn extract_prefix(params: &ParamMap, prefix: &str) -> ParamMap {
    let needle = format!("{}.", prefix);
    params
        .iter()
        .filter_map(|(k, v)| k.strip_prefix(&needle).map(|rest| (rest.to_string(), v.clone())))
        .collect()
}

/// The un-namespaced (primary) keys of a combined map.
pub fn extract_primary(params: &ParamMap) -> ParamMap {
    params
        .iter()
        .filter(|(k, _)| !k.contains('.'))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
