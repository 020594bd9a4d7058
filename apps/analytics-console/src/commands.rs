//! Console commands
//!
//! Each command drives one view against the API and returns what to print.

use std::fmt::Write as _;
use std::sync::Arc;

use analytics_sdk::AnalyticsClient;
use tracing::{debug, info};
use view_state::{DeleteItems, History, MemoryHistory, PageChange, PageInfo};

use crate::config::ConsoleConfig;
use crate::render;
use crate::views::filters_from_pairs;
use crate::views::job_explorer::{self, JobExplorerView};
use crate::views::plans::{self, PlansView};

/// Rendered command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Text for stdout
    pub text: String,
    /// Whether the command succeeded
    pub success: bool,
}

/// Job explorer command input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobExplorerArgs {
    /// Starting page URL; defaults to the configured job explorer path
    pub url: Option<String>,
    /// Toolbar filters as `key=value` pairs
    pub filters: Vec<(String, String)>,
    /// Page to jump to after the first fetch
    pub page: Option<i64>,
    /// Page size to switch to after the first fetch
    pub per_page: Option<i64>,
}

/// Pager change requested by `page` and `per_page`, if any
#[must_use]
pub fn pager_change(info: &PageInfo, page: Option<i64>, per_page: Option<i64>) -> Option<PageChange> {
    match (page, per_page) {
        (_, Some(per_page)) => Some(info.set_per_page(per_page, page.unwrap_or(info.page))),
        (Some(page), None) => Some(info.set_page(page)),
        (None, None) => None,
    }
}

/// Show one page of the job explorer
pub async fn job_explorer(
    config: &ConsoleConfig,
    client: &Arc<AnalyticsClient>,
    args: &JobExplorerArgs,
) -> Output {
    let start = args
        .url
        .clone()
        .unwrap_or_else(|| config.views.job_explorer_path.clone());
    let history = Arc::new(MemoryHistory::new(&start));
    let view = JobExplorerView::new(
        client,
        job_explorer::qs_config(config.views.job_explorer_limit),
        Arc::clone(&history) as Arc<dyn History>,
    );

    if let Some(error) = view.authorize().await {
        info!(error = %error, "Job explorer preflight failed");
        return Output {
            text: render::not_authorized_state(&error),
            success: false,
        };
    }

    let mut changes = view.params().subscribe();
    if !args.filters.is_empty() {
        let partial = filters_from_pairs(view.params().config(), &args.filters);
        view.params().set_from_toolbar(partial);
    }
    changes.mark_unchanged();
    view.fetch().await;

    if view.blocked().is_none()
        && let Some(change) = pager_change(&view.page_info(), args.page, args.per_page)
    {
        debug!(offset = change.offset, limit = ?change.limit, "Applying pager change");
        view.params().set_from_pagination(change.offset, change.limit);
        view.refetch_if_changed(&mut changes).await;
    }

    let mut text = view.render();
    _ = writeln!(text, "url: {}", history.location().href());
    view.unmount();
    Output {
        text,
        success: view.blocked().is_none(),
    }
}

/// Show savings plan cards
pub async fn plans(config: &ConsoleConfig, client: &Arc<AnalyticsClient>, url: Option<&str>) -> Output {
    let start = url.unwrap_or(&config.views.plans_path);
    let history: Arc<dyn History> = Arc::new(MemoryHistory::new(start));
    let view = PlansView::new(
        client,
        plans::qs_config(config.views.plans_limit),
        history,
    );

    if let Some(error) = view.authorize().await {
        info!(error = %error, "Savings planner preflight failed");
        return Output {
            text: render::not_authorized_state(&error),
            success: false,
        };
    }
    view.fetch().await;

    let job_explorer = job_explorer::qs_config(config.views.job_explorer_limit);
    let text = view.render(&job_explorer, &config.views.job_explorer_path);
    view.unmount();
    Output {
        text,
        success: view.blocked().is_none(),
    }
}

/// Print the feature-flag map
pub async fn flags(client: &AnalyticsClient) -> Output {
    let flags = client.get_features().await;
    let text = if flags.is_empty() {
        "No feature flags\n".to_owned()
    } else {
        let mut text = String::new();
        for (name, enabled) in flags.flags() {
            _ = writeln!(text, "{name}: {}", if enabled { "on" } else { "off" });
        }
        text
    };
    Output {
        text,
        success: true,
    }
}

/// Delete one savings plan
pub async fn delete_plan(client: &Arc<AnalyticsClient>, id: &str) -> Output {
    let deletion = {
        let client = Arc::clone(client);
        let id = id.to_owned();
        DeleteItems::new(move || {
            let client = Arc::clone(&client);
            let id = id.clone();
            async move { client.delete_plan(&id).await.map(|_| ()) }
        })
    };

    deletion.delete_items().await;

    if let Some(error) = deletion.deletion_error() {
        let text = render::error_state(&error);
        deletion.clear_deletion_error();
        deletion.unmount();
        return Output {
            text,
            success: false,
        };
    }
    info!(plan_id = id, "Deleted savings plan");
    Output {
        text: format!("Deleted plan {id}\n"),
        success: true,
    }
}
