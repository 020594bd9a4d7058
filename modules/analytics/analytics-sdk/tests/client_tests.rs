#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for AnalyticsClient
//!
//! These tests use httpmock to simulate the analytics API

use std::sync::Arc;
use std::time::Duration;

use analytics_sdk::{
    AllowAll, AnalyticsClient, AnalyticsClientConfig, AuthGate, ClientError, StaticTokenGate,
    StatusCode, endpoints,
};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer, auth: Arc<dyn AuthGate>) -> AnalyticsClient {
    let config =
        AnalyticsClientConfig::new(server.base_url()).with_timeout(Duration::from_secs(10));
    AnalyticsClient::from_config(&config, auth).unwrap()
}

#[tokio::test]
async fn test_read_job_explorer_mirrors_pagination_into_query() {
    let server = MockServer::start();

    let filters = json!({
        "limit": 5,
        "offset": 10,
        "sort_by": "-created",
        "status": ["failed", "successful"],
        "quick_date_range": "last_30_days"
    });

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::JOB_EXPLORER)
            .query_param("limit", "5")
            .query_param("offset", "10")
            .query_param("sort_by", "-created")
            .header("content-type", "application/json")
            .json_body(filters.clone());
        then.status(200).json_body(json!({
            "items": [{"id": 1, "status": "failed"}],
            "meta": {"count": 42, "counts": {"failed": 12}, "legend": []}
        }));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let page = client.read_job_explorer(&filters).await.unwrap();

    assert_eq!(page.count(), 42);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0]["status"], "failed");
    assert_eq!(page.meta.counts["failed"], 12);

    mock.assert();
}

#[tokio::test]
async fn test_post_with_pagination_without_pagination_keys() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::ROI_TEMPLATES)
            .json_body(json!({"template_id": [3]}));
        then.status(200).json_body(json!({"items": [], "meta": {"count": 0}}));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let page = client
        .read_roi(&json!({"template_id": [3]}))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.count(), 0);
    mock.assert();
}

#[tokio::test]
async fn test_options_decode_into_filter_options() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER_OPTIONS);
        then.status(200).json_body(json!({
            "status": [
                {"key": "failed", "value": "Failed"},
                {"key": "successful", "value": "Successful"}
            ],
            "org_id": [{"key": 7, "value": "Engineering", "description": "R&D"}],
            "meta": {"rbac": true}
        }));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let options = client.read_job_explorer_options(&json!({})).await.unwrap();

    assert_eq!(options.options_for("status").len(), 2);
    assert_eq!(options.label_for("org_id", "7").as_deref(), Some("Engineering"));
    assert!(options.options_for("meta").is_empty());
    assert!(options.options_for("missing").is_empty());
    mock.assert();
}

#[tokio::test]
async fn test_validation_error_surfaces_messages() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER);
        then.status(422).json_body(json!({
            "detail": [{"loc": ["query", "limit"], "msg": "ensure this value is greater than 0", "type": "value_error"}]
        }));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let err = client
        .read_job_explorer(&json!({"limit": -1}))
        .await
        .unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.http_status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.messages(), vec!["ensure this value is greater than 0"]);
}

#[tokio::test]
async fn test_preflight_forbidden() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(endpoints::AUTHORIZED);
        then.status(403).json_body(json!({"detail": "User not authorized"}));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let err = client.preflight().await.unwrap_err();

    assert_eq!(err.http_status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.messages(), vec!["User not authorized"]);
}

#[tokio::test]
async fn test_preflight_ok() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path(endpoints::AUTHORIZED);
        then.status(200).json_body(json!({"msg": "Authorized"}));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let preflight = client.preflight().await.unwrap();

    assert_eq!(preflight.msg.as_deref(), Some("Authorized"));
    mock.assert();
}

#[tokio::test]
async fn test_auth_gate_refusal_short_circuits() {
    // No mocks: any request that reached the server would come back as a 404 API error.
    let server = MockServer::start();

    let client = client_for(&server, Arc::new(StaticTokenGate::new("admin", "")));
    let err = client.read_clusters().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("admin"));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(endpoints::CLUSTERS)
            .header("authorization", "Bearer s3cret");
        then.status(200).json_body(json!({"templates": []}));
    });

    let client = client_for(&server, Arc::new(StaticTokenGate::new("admin", "s3cret")));
    let clusters = client.read_clusters().await.unwrap();

    assert!(clusters.contains_key("templates"));
    mock.assert();
}

#[tokio::test]
async fn test_get_flattens_params_into_query() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(endpoints::NOTIFICATIONS)
            .query_param("limit", "5")
            .query_param("severity", "error")
            .query_param("severity", "warning");
        then.status(200).json_body(json!({"notifications": []}));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let notifications = client
        .read_notifications(&json!({
            "limit": 5,
            "severity": ["error", "warning"],
            "cluster_id": null
        }))
        .await
        .unwrap();

    assert!(notifications.contains_key("notifications"));
    mock.assert();
}

#[tokio::test]
async fn test_plan_crud_paths() {
    let server = MockServer::start();

    let read = server.mock(|when, then| {
        when.method(GET).path("/api/tower-analytics/v1/plan/7/");
        then.status(200).json_body(json!({"items": [{"id": 7}]}));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/tower-analytics/v1/plan/7")
            .json_body(json!({"name": "Nightly backups"}));
        then.status(200).json_body(json!({"id": 7, "name": "Nightly backups"}));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::PLAN)
            .json_body(json!({"name": "New plan"}));
        then.status(201).json_body(json!({"id": 8}));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/tower-analytics/v1/plan/7");
        then.status(204);
    });

    let client = client_for(&server, Arc::new(AllowAll));

    assert!(client.read_plan("7").await.unwrap().contains_key("items"));
    let updated = client
        .update_plan("7", &json!({"name": "Nightly backups"}))
        .await
        .unwrap();
    assert_eq!(updated["name"], "Nightly backups");
    let created = client.create_plan(&json!({"name": "New plan"})).await.unwrap();
    assert_eq!(created["id"], 8);
    assert_eq!(client.delete_plan("7").await.unwrap(), serde_json::Value::Null);

    read.assert();
    update.assert();
    create.assert();
    delete.assert();
}

#[tokio::test]
async fn test_read_plans_exposes_projected_savings() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::PLANS)
            .query_param("limit", "10")
            .query_param("offset", "0");
        then.status(200).json_body(json!({
            "items": [{
                "id": 3,
                "name": "Patch servers",
                "category": "system",
                "frequency_period": "weekly",
                "template_details": {"id": 12, "name": "patch.yml"},
                "automation_status": {"status": ["successful", "None"], "last_known_month": "2024-05"},
                "projections": {"series_stats": [
                    {"cumulative_net_benefits": 100.0},
                    {"cumulative_net_benefits": 1250.5}
                ]}
            }, {
                "id": 4,
                "name": "Unlinked",
                "template_details": {}
            }],
            "meta": {"count": 2}
        }));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let plans = client
        .read_plans(&json!({"limit": 10, "offset": 0}))
        .await
        .unwrap();

    let patch = &plans.items[0];
    assert!((patch.projected_savings().unwrap() - 1250.5).abs() < f64::EPSILON);
    assert_eq!(patch.linked_template().unwrap().id, Some(12));
    let status = patch.automation_status.as_ref().unwrap();
    assert_eq!(status.statuses(), vec!["successful", "None"]);
    assert_eq!(status.last_reported(), Some("2024-05"));

    let unlinked = &plans.items[1];
    assert!(unlinked.projected_savings().is_none());
    assert!(unlinked.linked_template().is_none());
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path(endpoints::HOST_EXPLORER);
        then.status(200).body("<html>maintenance</html>");
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let err = client.read_host_explorer(&json!({})).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_connection_refused() {
    let config = AnalyticsClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(5));
    let client = AnalyticsClient::from_config(&config, Arc::new(AllowAll)).unwrap();

    let err = client.read_event_explorer(&json!({})).await.unwrap_err();

    assert!(err.is_connection() || err.is_timeout());
}

#[tokio::test]
async fn test_feature_flags() {
    let server = MockServer::start();

    let mock = server.mock(|when, then| {
        when.method(GET).path(endpoints::FEATURE_FLAGS);
        then.status(200).json_body(json!({
            "newAutomationCalculator": true,
            "moduleReports": {"enabled": false},
            "betaSavingsPlanner": {"enabled": true}
        }));
    });

    let client = client_for(&server, Arc::new(AllowAll));
    let flags = client.get_features().await;

    assert!(flags.is_enabled("newAutomationCalculator"));
    assert!(flags.is_enabled("betaSavingsPlanner"));
    assert!(!flags.is_enabled("moduleReports"));
    assert!(!flags.is_enabled("unknown"));
    assert_eq!(flags.flags().filter(|(_, on)| *on).count(), 2);
    mock.assert();
}

#[tokio::test]
async fn test_feature_flags_degrade_to_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(endpoints::FEATURE_FLAGS);
        then.status(500).body("boom");
    });
    let client = client_for(&server, Arc::new(AllowAll));
    assert!(client.get_features().await.is_empty());

    let refused = client_for(&server, Arc::new(StaticTokenGate::new("admin", " ")));
    assert!(refused.get_features().await.is_empty());

    let unreachable = AnalyticsClient::from_config(
        &AnalyticsClientConfig::new("http://127.0.0.1:1"),
        Arc::new(AllowAll),
    )
    .unwrap();
    assert!(unreachable.get_features().await.is_empty());
}

#[test]
fn test_invalid_base_url_is_config_error() {
    let err = AnalyticsClient::from_config(&AnalyticsClientConfig::new("not a url"), Arc::new(AllowAll))
        .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
