//! Views: a URL-bound filter state plus the request cells it drives

pub mod job_explorer;
pub mod plans;

use analytics_sdk::ClientError;
use tracing::warn;
use view_state::{FilterState, ParamValue, QsConfig};

/// Partial filter state from `key=value` pairs, typed after `config`
///
/// Repeated keys accumulate when the key defaults to a list; otherwise the
/// last value wins. Integer fields that do not parse are skipped.
#[must_use]
pub fn filters_from_pairs(config: &QsConfig, pairs: &[(String, String)]) -> FilterState {
    let mut state = FilterState::new();
    for (key, value) in pairs {
        let next = if config.is_integer_field(key) {
            if let Ok(v) = value.trim().parse::<i64>() {
                ParamValue::Int(v)
            } else {
                warn!(key = %key, value = %value, "Ignoring non-integer filter value");
                continue;
            }
        } else if matches!(config.default_for(key), Some(ParamValue::List(_))) {
            let mut items = match state.remove(key) {
                Some(ParamValue::List(items)) => items,
                _ => Vec::new(),
            };
            items.push(value.clone());
            ParamValue::List(items)
        } else {
            ParamValue::Str(value.clone())
        };
        state.insert(key.clone(), next);
    }
    state
}

/// Text cell for a JSON value; missing and null render as `-`
#[must_use]
pub fn cell(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".to_owned(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// What a view shows instead of its data, if anything
#[derive(Debug, Clone, PartialEq)]
pub enum Blocked {
    /// The authorization check failed
    NotAuthorized(ClientError),
    /// A data or options request failed
    Failed(ClientError),
}
