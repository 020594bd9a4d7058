//! Endpoint catalogue of the analytics API
//!
//! Paths are absolute and resolved against the configured origin. Item
//! endpoints (`PLAN`) take the id appended directly.

macro_rules! tower_analytics {
    (v0 $path:literal) => {
        concat!("/api/tower-analytics/v0", $path)
    };
    (v1 $path:literal) => {
        concat!("/api/tower-analytics/v1", $path)
    };
}

/// Prefix of the v0 API
pub const API_V0: &str = tower_analytics!(v0 "");

/// Prefix of the v1 API
pub const API_V1: &str = tower_analytics!(v1 "");

/// Authorization check
pub const AUTHORIZED: &str = tower_analytics!(v0 "/authorized/");
/// Cluster list
pub const CLUSTERS: &str = tower_analytics!(v0 "/clusters/");
/// Notification list
pub const NOTIFICATIONS: &str = tower_analytics!(v0 "/notifications/");

/// Job explorer report
pub const JOB_EXPLORER: &str = tower_analytics!(v1 "/job_explorer/");
/// Host explorer report
pub const HOST_EXPLORER: &str = tower_analytics!(v1 "/host_explorer/");
/// Event explorer report
pub const EVENT_EXPLORER: &str = tower_analytics!(v1 "/event_explorer/");
/// Automation calculator (ROI) templates
pub const ROI_TEMPLATES: &str = tower_analytics!(v1 "/roi_templates/");
/// Savings plan list
pub const PLANS: &str = tower_analytics!(v1 "/plans/");
/// Single savings plan, id appended
pub const PLAN: &str = tower_analytics!(v1 "/plan/");

/// Job explorer filter options
pub const JOB_EXPLORER_OPTIONS: &str = tower_analytics!(v1 "/job_explorer_options/");
/// Automation calculator filter options
pub const ROI_TEMPLATES_OPTIONS: &str = tower_analytics!(v1 "/roi_templates_options/");
/// Organization statistics filter options
pub const ORG_OPTIONS: &str = tower_analytics!(v1 "/dashboard_organization_statistics_options/");
/// Clusters dashboard filter options
pub const CLUSTERS_OPTIONS: &str = tower_analytics!(v1 "/dashboard_clusters_options/");
/// Savings plan filter options
pub const PLAN_OPTIONS: &str = tower_analytics!(v1 "/plan_options/");

/// Feature flags
pub const FEATURE_FLAGS: &str = "/api/featureflags/v0";

/// Path of one item under an item endpoint
#[must_use]
pub fn item_path(endpoint: &str, id: &str) -> String {
    format!("{endpoint}{id}")
}
