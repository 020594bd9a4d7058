#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for layered console configuration

use std::io::Write;
use std::time::Duration;

use analytics_console::ConsoleConfig;

fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_file_or_env() {
    temp_env::with_vars_unset(
        [
            "ANALYTICS__API__BASE_URL",
            "ANALYTICS__API__TOKEN",
            "ANALYTICS__LOGGING__LEVEL",
        ],
        || {
            let config = ConsoleConfig::load_layered(None).unwrap();
            assert_eq!(config, ConsoleConfig::default());
            assert_eq!(config.api.base_url, "http://localhost:8000");
            assert_eq!(config.views.job_explorer_limit, 5);
            assert_eq!(config.views.plans_limit, 10);
            assert_eq!(config.logging.level, "warn");
        },
    );
}

#[test]
fn test_file_then_env_layering() {
    let file = yaml_file(
        r"
api:
  base_url: https://analytics.example.com
  timeout_secs: 12
views:
  job_explorer_limit: 20
logging:
  json: true
",
    );

    temp_env::with_vars(
        [
            ("ANALYTICS__API__BASE_URL", None),
            ("ANALYTICS__API__TOKEN", Some("secret-token")),
            ("ANALYTICS__VIEWS__PLANS_LIMIT", Some("25")),
        ],
        || {
            let config = ConsoleConfig::load_layered(Some(file.path())).unwrap();
            assert_eq!(config.api.base_url, "https://analytics.example.com");
            assert_eq!(config.api.timeout_secs, 12);
            assert_eq!(config.api.token.as_deref(), Some("secret-token"));
            assert_eq!(config.views.job_explorer_limit, 20);
            assert_eq!(config.views.plans_limit, 25);
            assert!(config.logging.json);
            assert_eq!(config.views.job_explorer_path, "/job-explorer");

            let client = config.client_config();
            assert_eq!(client.base_url, "https://analytics.example.com");
            assert_eq!(client.timeout, Duration::from_secs(12));
        },
    );
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");

    let err = ConsoleConfig::load_layered(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("config file does not exist"));
}

#[test]
fn test_unknown_keys_are_rejected() {
    let file = yaml_file("api:\n  base_uri: http://typo\n");
    temp_env::with_vars_unset(["ANALYTICS__API__BASE_URL"], || {
        assert!(ConsoleConfig::load_layered(Some(file.path())).is_err());
    });
}

#[test]
fn test_non_positive_page_size_is_rejected() {
    let file = yaml_file("views:\n  plans_limit: 0\n");
    temp_env::with_vars_unset(["ANALYTICS__VIEWS__PLANS_LIMIT"], || {
        let err = ConsoleConfig::load_layered(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    });
}

#[test]
fn test_to_yaml_redacts_token() {
    let mut config = ConsoleConfig::default();
    config.api.token = Some("secret-token".to_owned());

    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("[REDACTED]"));
    assert!(!yaml.contains("secret-token"));
    assert!(yaml.contains("job_explorer_limit: 5"));
    assert_eq!(config.api.token.as_deref(), Some("secret-token"));
}

#[test]
#[allow(clippy::use_debug)]
fn test_debug_redacts_token() {
    let mut config = ConsoleConfig::default();
    config.api.token = Some("secret-token".to_owned());

    let debug = format!("{:?}", config.api);
    assert!(!debug.contains("secret-token"));
}

#[test]
fn test_verbosity_overrides_level() {
    let mut config = ConsoleConfig::default();
    config.apply_cli_overrides(0);
    assert_eq!(config.logging.level, "warn");

    config.apply_cli_overrides(1);
    assert_eq!(config.logging.level, "debug");

    config.apply_cli_overrides(3);
    assert_eq!(config.logging.level, "trace");
}
