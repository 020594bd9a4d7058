//! Analytics SDK - client library for the automation analytics API
//!
//! Wraps the report, options, savings plan, cluster and notification
//! endpoints behind typed async methods.
//!
//! # Features
//!
//! - **Auth gate**: every call first awaits an injected [`AuthGate`]; a
//!   refusal short-circuits before any HTTP traffic
//! - **JSON error bodies**: non-2xx answers surface as [`ClientError::Api`]
//!   carrying the decoded [`ApiFailure`]
//! - **Paginated reports**: `limit`, `offset` and `sort_by` are mirrored from
//!   the filter body into the querystring
//! - **Best-effort feature flags**: any failure degrades to an empty map
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use analytics_sdk::{AnalyticsClient, AnalyticsClientConfig, StaticTokenGate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalyticsClientConfig::from_env()?;
//!     let gate = Arc::new(StaticTokenGate::new("admin", "secret"));
//!     let client = AnalyticsClient::from_config(&config, gate)?;
//!
//!     let plans = client
//!         .read_plans(&serde_json::json!({"limit": 10, "offset": 0}))
//!         .await?;
//!     for plan in plans.items {
//!         println!("{}: {:?}", plan.name, plan.projected_savings());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;

mod transport;

pub use auth::{AllowAll, AuthGate, CurrentUser, StaticTokenGate};
pub use client::AnalyticsClient;
pub use config::AnalyticsClientConfig;
pub use error::{ApiFailure, ClientError, FailureDetail, Result, ValidationError};
pub use models::{
    ApiJson, FeatureFlags, FilterOption, FilterOptions, JobExplorerResponse, OptionKey, Plan,
    PreflightResponse, ReportMeta, ReportResponse,
};

pub use http::StatusCode;
