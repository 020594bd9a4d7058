//! Typed request and response bodies of the analytics API
//!
//! Report rows are kept as open JSON objects; the row schema differs per
//! report and grows with the backend.

mod features;
mod options;
mod plan;
mod report;

pub use features::FeatureFlags;
pub use options::{FilterOption, FilterOptions, OptionKey};
pub use plan::{AutomationStatus, Plan, Projections, SeriesStat, TemplateDetails};
pub use report::{JobExplorerResponse, ReportMeta, ReportResponse};

use serde::{Deserialize, Serialize};

/// Open JSON object returned by endpoints without a fixed schema
pub type ApiJson = serde_json::Map<String, serde_json::Value>;

/// Body of the authorization check
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreflightResponse {
    /// Optional status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}
