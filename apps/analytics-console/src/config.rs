//! Console configuration
//!
//! Loaded layered: built-in defaults, then an optional YAML file, then
//! `ANALYTICS__`-prefixed environment variables
//! (`ANALYTICS__API__BASE_URL=https://...` maps to `api.base_url`).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use analytics_sdk::{AllowAll, AnalyticsClientConfig, AuthGate, StaticTokenGate};
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ANALYTICS__";

/// Whole console configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Analytics API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Page sizes and paths of the views
    #[serde(default)]
    pub views: ViewsConfig,
}

/// Analytics API access
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ApiConfig {
    /// API origin
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User name reported by the auth gate
    pub username: String,
    /// Bearer token; requests are anonymous without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: analytics_sdk::config::DEFAULT_BASE_URL.to_owned(),
            timeout_secs: analytics_sdk::config::DEFAULT_TIMEOUT_SECS,
            username: "anonymous".to_owned(),
            token: None,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Default level directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

/// Page sizes and paths of the views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ViewsConfig {
    /// Default page size of the job explorer
    pub job_explorer_limit: i64,
    /// Default page size of the savings planner
    pub plans_limit: i64,
    /// Path of the job explorer page, used for deep links
    pub job_explorer_path: String,
    /// Path of the savings planner page
    pub plans_path: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            job_explorer_limit: 5,
            plans_limit: 10,
            job_explorer_path: "/job-explorer".to_owned(),
            plans_path: "/savings-planner".to_owned(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration: defaults, then `config_path` if given, then environment
    ///
    /// # Errors
    /// Returns an error if the file is missing or any layer fails to extract.
    pub fn load_layered(config_path: Option<&Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Yaml},
        };

        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            ensure!(
                path.is_file(),
                "config file does not exist: {}",
                path.to_string_lossy()
            );
            figment = figment.merge(Yaml::file(path));
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .context("Failed to extract config from figment")?;
        ensure!(
            config.views.job_explorer_limit > 0 && config.views.plans_limit > 0,
            "views.*_limit must be positive"
        );
        Ok(config)
    }

    /// Serialize configuration to YAML with the token redacted
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.api.token.is_some() {
            shown.api.token = Some("[REDACTED]".to_owned());
        }
        serde_saphyr::to_string(&shown).context("Failed to serialize config to YAML")
    }

    /// Apply `-v` flags: one for debug, two or more for trace
    pub fn apply_cli_overrides(&mut self, verbose: u8) {
        match verbose {
            0 => {}
            1 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// SDK client configuration
    #[must_use]
    pub fn client_config(&self) -> AnalyticsClientConfig {
        AnalyticsClientConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
    }

    /// Auth gate for the configured credentials
    #[must_use]
    pub fn auth_gate(&self) -> Arc<dyn AuthGate> {
        match &self.api.token {
            Some(token) => Arc::new(StaticTokenGate::new(self.api.username.clone(), token.clone())),
            None => Arc::new(AllowAll),
        }
    }
}
