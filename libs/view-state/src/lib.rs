//! View state for analytics pages
//!
//! This library keeps the filter/pagination state of a list view in the URL
//! querystring and turns asynchronous API calls into observable state cells.
//! It is framework-agnostic: navigation is reached through the [`History`]
//! trait and change propagation uses `tokio::sync::watch` channels plus plain
//! callbacks, so the same code drives a browser shell or a terminal host.
//!
//! # Building blocks
//!
//! - [`qs`]: namespaced querystring codec with default-value suppression
//! - [`QueryParams`]: URL-bound filter state with toolbar/pagination setters
//! - [`RequestState`]: loading/success/error/result cell around a request function
//! - [`DismissableError`] and [`DeleteItems`]: error display helpers
//! - [`pagination`]: offset/limit to page-number arithmetic
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use view_state::{FilterState, MemoryHistory, QsConfig, QueryParams, ParamValue};
//!
//! let defaults = FilterState::from([
//!     ("limit".to_owned(), ParamValue::Int(10)),
//!     ("offset".to_owned(), ParamValue::Int(0)),
//!     ("sort_by".to_owned(), ParamValue::from("-created")),
//! ]);
//! let config = QsConfig::new("job-explorer", defaults, ["limit", "offset"]);
//! let history = Arc::new(MemoryHistory::new("/job-explorer?job-explorer.limit=20"));
//! let params = QueryParams::new(config, history);
//!
//! assert_eq!(params.query_params()["limit"], ParamValue::Int(20));
//! params.set_from_pagination(40, None);
//! ```

#![forbid(unsafe_code)]

pub mod history;
pub mod pagination;
pub mod qs;
pub mod query_params;
pub mod request;

pub use history::{History, Location, MemoryHistory};
pub use pagination::{PageChange, PageInfo};
pub use qs::{FilterState, ParamValue, QsConfig};
pub use query_params::{ListenerId, QueryAction, QueryParams};
pub use request::{DeleteItems, DismissableError, RequestSnapshot, RequestState};
