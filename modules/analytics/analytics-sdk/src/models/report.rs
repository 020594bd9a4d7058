use serde::{Deserialize, Serialize};

use super::ApiJson;

/// Paged report: one page of rows plus aggregate metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse<T = ApiJson> {
    /// Rows of the current page
    #[serde(default)]
    pub items: Vec<T>,

    /// Totals over all pages
    #[serde(default)]
    pub meta: ReportMeta,
}

impl<T> Default for ReportResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: ReportMeta::default(),
        }
    }
}

impl<T> ReportResponse<T> {
    /// Total number of rows over all pages
    #[must_use]
    pub const fn count(&self) -> i64 {
        self.meta.count
    }
}

/// Aggregate metadata of a paged report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Total number of rows
    #[serde(default)]
    pub count: i64,

    /// Per-status counters
    #[serde(default)]
    pub counts: ApiJson,

    /// Chart legend entries
    #[serde(default)]
    pub legend: Vec<serde_json::Value>,

    /// Report-specific members
    #[serde(flatten)]
    pub extra: ApiJson,
}

/// Job explorer page
pub type JobExplorerResponse = ReportResponse<ApiJson>;
