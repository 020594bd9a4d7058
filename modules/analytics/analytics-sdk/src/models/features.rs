use serde::{Deserialize, Serialize};

use super::ApiJson;

/// Feature-flag map; empty when flags could not be fetched
///
/// A flag is on when its value is `true` or an object with `"enabled": true`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(pub ApiJson);

impl FeatureFlags {
    /// Whether flag `name` is on; unknown flags are off
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(serde_json::Value::Bool(on)) => *on,
            Some(serde_json::Value::Object(flag)) => flag
                .get("enabled")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// No flags known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flag names with their on/off state
    #[must_use = "iterators are lazy"]
    pub fn flags(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.keys().map(|name| (name.as_str(), self.is_enabled(name)))
    }
}
