//! Namespaced querystring codec
//!
//! Every view owns a namespace; its parameters are written to the URL as
//! `"{namespace}.{key}"` so several filtered views can share one address bar.
//! Values equal to the view's configured default are left out of the URL and
//! restored on parse. Pairs that belong to other namespaces are carried along
//! untouched.
//!
//! Lists are encoded as repeated keys: `ns.status=failed&ns.status=successful`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::trace;
use url::form_urlencoded;

/// Query parameter key holding the page offset.
pub const OFFSET: &str = "offset";
/// Query parameter key holding the page size.
pub const LIMIT: &str = "limit";
/// Query parameter key holding the sort expression.
pub const SORT_BY: &str = "sort_by";

/// Current filters and pagination of one view, keyed by un-namespaced name.
pub type FilterState = BTreeMap<String, ParamValue>;

/// A single filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer-typed field (`limit`, `offset`, ids)
    Int(i64),
    /// Free-form string
    Str(String),
    /// Multi-select value, encoded as a repeated key
    List(Vec<String>),
}

impl ParamValue {
    /// Integer value, if this is an integer
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String value, if this is a plain string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// List items, if this is a list
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// True for a list without elements
    #[must_use]
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Self::List(v) if v.is_empty())
    }

    fn query_values(&self) -> Vec<String> {
        match self {
            Self::Int(v) => vec![v.to_string()],
            Self::Str(v) => vec![v.clone()],
            Self::List(v) => v.clone(),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_owned).collect())
    }
}

/// Querystring configuration of one view
///
/// Built once per view and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QsConfig {
    namespace: String,
    default_params: FilterState,
    integer_fields: BTreeSet<String>,
}

impl QsConfig {
    /// Create a configuration
    ///
    /// # Arguments
    /// * `namespace` - URL key prefix; an empty namespace claims un-prefixed keys
    /// * `default_params` - every participating key with its default value
    /// * `integer_fields` - keys parsed as integers (typically `limit`, `offset`)
    #[must_use]
    pub fn new<I, S>(namespace: impl Into<String>, default_params: FilterState, integer_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            default_params,
            integer_fields: integer_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The URL namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Configured defaults
    #[must_use]
    pub const fn default_params(&self) -> &FilterState {
        &self.default_params
    }

    /// Default of a single key
    #[must_use]
    pub fn default_for(&self, key: &str) -> Option<&ParamValue> {
        self.default_params.get(key)
    }

    /// Whether `key` is parsed as an integer
    #[must_use]
    pub fn is_integer_field(&self, key: &str) -> bool {
        self.integer_fields.contains(key)
    }

    /// Whether `value` equals the configured default of `key`
    ///
    /// An empty list counts as default when the default is absent or is an
    /// empty list too.
    #[must_use]
    pub fn is_default(&self, key: &str, value: &ParamValue) -> bool {
        match self.default_params.get(key) {
            Some(default) => default == value,
            None => value.is_empty_list(),
        }
    }

    fn namespaced_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.namespace)
        }
    }

    fn strip_namespace<'a>(&self, raw: &'a str) -> Option<&'a str> {
        if self.namespace.is_empty() {
            return Some(raw);
        }
        raw.strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|key| !key.is_empty())
    }
}

fn trim_search(search: &str) -> &str {
    search.strip_prefix('?').unwrap_or(search)
}

/// Parse the view's filter state out of a raw search string
///
/// Only keys in the config's namespace are read. Integer fields that do not
/// parse fall back to their default; every configured key missing from the
/// URL is filled with its default.
#[must_use]
pub fn parse_query_string(config: &QsConfig, search: &str) -> FilterState {
    let mut raw: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(trim_search(search).as_bytes()) {
        if let Some(key) = config.strip_namespace(&key) {
            raw.entry(key.to_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    let mut state = config.default_params.clone();
    for (key, values) in raw {
        if let Some(value) = coerce(config, &key, values) {
            state.insert(key, value);
        }
    }
    state
}

fn coerce(config: &QsConfig, key: &str, mut values: Vec<String>) -> Option<ParamValue> {
    if config.is_integer_field(key) {
        let last = values.pop()?;
        return match last.trim().parse::<i64>() {
            Ok(v) => Some(ParamValue::Int(v)),
            Err(_) => {
                trace!(
                    namespace = %config.namespace,
                    key,
                    value = %last,
                    "Malformed integer in querystring, using default"
                );
                config.default_for(key).cloned()
            }
        };
    }

    let list_default = matches!(config.default_for(key), Some(ParamValue::List(_)));
    if list_default || values.len() > 1 {
        return Some(ParamValue::List(values));
    }
    values.pop().map(ParamValue::Str)
}

/// All pairs of `search` that do not belong to the config's namespace, in order
#[must_use]
pub fn foreign_params(config: &QsConfig, search: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(trim_search(search).as_bytes())
        .filter(|(key, _)| config.strip_namespace(key).is_none())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn non_default_pairs(config: &QsConfig, params: &FilterState) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(key, value)| !config.is_default(key, value))
        .flat_map(|(key, value)| {
            let ns_key = config.namespaced_key(key);
            value
                .query_values()
                .into_iter()
                .map(move |v| (ns_key.clone(), v))
        })
        .collect()
}

fn serialize_pairs(mut pairs: Vec<(String, String)>) -> String {
    // Stable: list elements keep their relative order under one key.
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Encode `params` into the config's namespace, merged with `foreign` pairs
///
/// Keys equal to their default are dropped. Foreign pairs that happen to sit
/// in the config's namespace are replaced by `params`. Output is sorted by
/// key, so equal inputs always encode to equal strings.
#[must_use]
pub fn encode_non_default_query_string(
    config: &QsConfig,
    params: &FilterState,
    foreign: &[(String, String)],
) -> String {
    let mut pairs = non_default_pairs(config, params);
    pairs.extend(
        foreign
            .iter()
            .filter(|(key, _)| config.strip_namespace(key).is_none())
            .cloned(),
    );
    serialize_pairs(pairs)
}

/// Join a pathname and an encoded query; an empty query yields the bare path
#[must_use]
pub fn url_with_query(pathname: &str, query: &str) -> String {
    if query.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{query}")
    }
}

/// Build a deep link into a page, seeding one or more views' filters
///
/// Used to jump from one page into another with filters preselected, for
/// example from a savings plan card into the job explorer.
#[must_use]
pub fn create_url(pathname: &str, views: &[(&QsConfig, &FilterState)]) -> String {
    let pairs = views
        .iter()
        .flat_map(|(config, params)| non_default_pairs(config, params))
        .collect();
    url_with_query(pathname, &serialize_pairs(pairs))
}

