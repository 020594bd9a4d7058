#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end command tests against a mocked analytics API

use std::sync::Arc;

use analytics_console::ConsoleConfig;
use analytics_console::commands::{self, JobExplorerArgs, pager_change};
use analytics_sdk::{AllowAll, AnalyticsClient, AnalyticsClientConfig, endpoints};
use httpmock::prelude::*;
use serde_json::json;
use view_state::{PageChange, PageInfo};

fn setup(server: &MockServer) -> (ConsoleConfig, Arc<AnalyticsClient>) {
    let mut config = ConsoleConfig::default();
    config.api.base_url = server.base_url();
    let client =
        AnalyticsClient::from_config(&AnalyticsClientConfig::new(server.base_url()), Arc::new(AllowAll))
            .unwrap();
    (config, Arc::new(client))
}

fn mock_preflight(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(endpoints::AUTHORIZED);
        then.status(200).json_body(json!({"msg": "Authorized"}));
    })
}

fn jobs(ids: &[i64]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "status": "failed",
                "job_type": "job",
                "cluster_name": "prod",
                "org_name": "Default",
                "started": "2026-10-01T10:00:00",
                "elapsed": 12.5
            })
        })
        .collect();
    json!({"items": items, "meta": {"count": 12}})
}

#[test]
fn test_pager_change() {
    let info = PageInfo::new(0, 5, 12);

    assert_eq!(pager_change(&info, None, None), None);
    assert_eq!(
        pager_change(&info, Some(3), None),
        Some(PageChange {
            offset: 10,
            limit: None
        })
    );
    // Page 3 does not exist with 10 per page; lands on the last page.
    assert_eq!(
        pager_change(&info, Some(3), Some(10)),
        Some(PageChange {
            offset: 10,
            limit: Some(10)
        })
    );
}

#[tokio::test]
async fn test_job_explorer_filters_and_pages() {
    let server = MockServer::start();
    let preflight = mock_preflight(&server);
    let _options = server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER_OPTIONS);
        then.status(200)
            .json_body(json!({"status": [{"key": "failed", "value": "Failed"}]}));
    });
    let first_page = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::JOB_EXPLORER)
            .query_param("limit", "5")
            .query_param("offset", "0")
            .query_param("sort_by", "created:desc");
        then.status(200).json_body(jobs(&[101, 102, 103, 104, 105]));
    });
    let second_page = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::JOB_EXPLORER)
            .query_param("offset", "5");
        then.status(200).json_body(jobs(&[106, 107, 108, 109, 110]));
    });

    let (config, client) = setup(&server);
    let args = JobExplorerArgs {
        filters: vec![("status".to_owned(), "failed".to_owned())],
        page: Some(2),
        ..JobExplorerArgs::default()
    };
    let output = commands::job_explorer(&config, &client, &args).await;

    assert!(output.success, "{}", output.text);
    assert!(output.text.starts_with("Job Explorer\n"));
    assert!(output.text.contains("106"));
    assert!(!output.text.contains("101"));
    assert!(output.text.contains("page 2 of 3 (12 items)"));
    assert!(output
        .text
        .contains("url: /job-explorer?job-explorer.offset=5&job-explorer.status=failed"));

    preflight.assert();
    first_page.assert();
    second_page.assert();
}

#[tokio::test]
async fn test_job_explorer_keeps_foreign_params_from_url() {
    let server = MockServer::start();
    let _preflight = mock_preflight(&server);
    server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER_OPTIONS);
        then.status(200).json_body(json!({}));
    });
    let data = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::JOB_EXPLORER)
            .query_param("limit", "10")
            .query_param("offset", "0");
        then.status(200)
            .json_body(json!({"items": [], "meta": {"count": 0}}));
    });

    let (config, client) = setup(&server);
    let args = JobExplorerArgs {
        url: Some("/job-explorer?job-explorer.limit=10&tab=reports".to_owned()),
        ..JobExplorerArgs::default()
    };
    let output = commands::job_explorer(&config, &client, &args).await;

    assert!(output.success);
    assert!(output.text.contains("No results found"));
    assert!(output.text.contains("page 1 of 1 (0 items)"));
    assert!(output
        .text
        .contains("url: /job-explorer?job-explorer.limit=10&tab=reports"));
    data.assert();
}

#[tokio::test]
async fn test_job_explorer_not_authorized() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(endpoints::AUTHORIZED);
        then.status(403)
            .json_body(json!({"detail": "User is not authorized"}));
    });

    let (config, client) = setup(&server);
    let output = commands::job_explorer(&config, &client, &JobExplorerArgs::default()).await;

    assert!(!output.success);
    assert!(output.text.starts_with("Not authorized\n"));
    assert!(output.text.contains("403 Forbidden"));
}

#[tokio::test]
async fn test_job_explorer_validation_error() {
    let server = MockServer::start();
    let _preflight = mock_preflight(&server);
    server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER_OPTIONS);
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(POST).path(endpoints::JOB_EXPLORER);
        then.status(422).json_body(json!({
            "detail": [{"loc": ["body", "quick_date_range"], "msg": "unknown date range", "type": "value_error"}]
        }));
    });

    let (config, client) = setup(&server);
    let args = JobExplorerArgs {
        filters: vec![("quick_date_range".to_owned(), "someday".to_owned())],
        ..JobExplorerArgs::default()
    };
    let output = commands::job_explorer(&config, &client, &args).await;

    assert!(!output.success);
    assert!(output.text.starts_with("Error\n  unknown date range\n"));
}

#[tokio::test]
async fn test_plans_render_cards_with_deep_links() {
    let server = MockServer::start();
    let _preflight = mock_preflight(&server);
    server.mock(|when, then| {
        when.method(GET).path(endpoints::PLAN_OPTIONS);
        then.status(200).json_body(json!({
            "frequency_period": [{"key": "weekly", "value": "Weekly"}],
            "category": [{"key": "system", "value": "System"}]
        }));
    });
    let plans = server.mock(|when, then| {
        when.method(POST)
            .path(endpoints::PLANS)
            .query_param("limit", "10")
            .query_param("offset", "0")
            .query_param("sort_by", "modified:desc");
        then.status(200).json_body(json!({
            "items": [{
                "id": 7,
                "name": "Backups",
                "category": "system",
                "frequency_period": "weekly",
                "template_details": {"id": 12, "name": "Nightly backup"},
                "projections": {"series_stats": [{"cumulative_net_benefits": 1250.5}]}
            }],
            "meta": {"count": 1}
        }));
    });

    let (config, client) = setup(&server);
    let output = commands::plans(&config, &client, None).await;

    assert!(output.success, "{}", output.text);
    assert!(output.text.starts_with("Savings Planner\n"));
    assert!(output.text.contains("Backups (#7)"));
    assert!(output.text.contains("Frequency: Weekly"));
    assert!(output.text.contains(
        "Template: Nightly backup -> /job-explorer?job-explorer.quick_date_range=last_30_days\
         &job-explorer.status=failed&job-explorer.status=successful&job-explorer.template_id=12"
    ));
    assert!(output.text.contains("Projected savings: $1,250.50"));
    assert!(output.text.contains("page 1 of 1 (1 items)"));
    plans.assert();
}

#[tokio::test]
async fn test_delete_plan() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE).path(format!("{}7", endpoints::PLAN));
        then.status(204);
    });

    let (_, client) = setup(&server);
    let output = commands::delete_plan(&client, "7").await;

    assert!(output.success);
    assert_eq!(output.text, "Deleted plan 7\n");
    delete.assert();
}

#[tokio::test]
async fn test_delete_plan_failure_renders_error_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path(format!("{}404", endpoints::PLAN));
        then.status(404).json_body(json!({"detail": "Not found."}));
    });

    let (_, client) = setup(&server);
    let output = commands::delete_plan(&client, "404").await;

    assert!(!output.success);
    assert_eq!(output.text, "Error\n  Not found.\n");
}

#[tokio::test]
async fn test_flags() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(endpoints::FEATURE_FLAGS);
        then.status(200)
            .json_body(json!({"newNav": true, "savingsPlanner": {"enabled": false}}));
    });

    let (_, client) = setup(&server);
    let output = commands::flags(&client).await;

    assert!(output.success);
    assert_eq!(output.text, "newNav: on\nsavingsPlanner: off\n");
}

#[tokio::test]
async fn test_flags_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(endpoints::FEATURE_FLAGS);
        then.status(500);
    });

    let (_, client) = setup(&server);
    let output = commands::flags(&client).await;

    assert!(output.success);
    assert_eq!(output.text, "No feature flags\n");
}
