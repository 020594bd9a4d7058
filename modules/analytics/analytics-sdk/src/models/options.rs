use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a filter option: backend ids are numbers, enum values are strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionKey {
    /// Numeric id
    Int(i64),
    /// Enum value
    Str(String),
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// One selectable value of a toolbar filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent back in filters
    pub key: OptionKey,

    /// Label shown to the user
    pub value: String,

    /// Longer description, when the backend has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Options endpoint body: filter name to its selectable values
///
/// Members that are not option lists (sort hints, metadata) are kept as raw
/// JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterOptions(pub BTreeMap<String, serde_json::Value>);

impl FilterOptions {
    /// Options of filter `name`; empty if absent or not an option list
    #[must_use]
    pub fn options_for(&self, name: &str) -> Vec<FilterOption> {
        self.0
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Label of `key` under filter `name`, if known
    #[must_use]
    pub fn label_for(&self, name: &str, key: &str) -> Option<String> {
        self.options_for(name)
            .into_iter()
            .find(|option| option.key.to_string() == key)
            .map(|option| option.value)
    }

    /// Filter names in this body
    #[must_use = "iterators are lazy"]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// No filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
