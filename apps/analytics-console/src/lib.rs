//! Analytics console
//!
//! Terminal front end over the analytics API: each view keeps its filters in
//! a namespaced page URL, fetches through [`analytics_sdk`] and renders as
//! plain text.

#![forbid(unsafe_code)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod views;

pub use commands::{JobExplorerArgs, Output};
pub use config::ConsoleConfig;
