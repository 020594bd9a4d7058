//! Savings planner: plan cards with projected savings

use std::fmt::Write as _;
use std::sync::Arc;

use analytics_sdk::{AnalyticsClient, ClientError, FilterOptions, Plan, PreflightResponse, ReportResponse};
use view_state::qs::{LIMIT, OFFSET, SORT_BY, create_url};
use view_state::{FilterState, History, PageInfo, ParamValue, QsConfig, QueryParams, RequestState};

use super::Blocked;
use crate::render;

/// URL namespace of the savings planner
pub const NAMESPACE: &str = "savings-planner";

/// Default filters with a page size of `limit`
#[must_use]
pub fn default_params(limit: i64) -> FilterState {
    FilterState::from([
        (LIMIT.to_owned(), ParamValue::Int(limit)),
        (OFFSET.to_owned(), ParamValue::Int(0)),
        (SORT_BY.to_owned(), ParamValue::from("modified:desc")),
        ("name".to_owned(), ParamValue::from("")),
        ("category".to_owned(), ParamValue::List(Vec::new())),
        ("frequency_period".to_owned(), ParamValue::List(Vec::new())),
        ("automation_status".to_owned(), ParamValue::List(Vec::new())),
        ("template_id".to_owned(), ParamValue::List(Vec::new())),
    ])
}

/// Querystring configuration of the savings planner
#[must_use]
pub fn qs_config(limit: i64) -> QsConfig {
    QsConfig::new(NAMESPACE, default_params(limit), [LIMIT, OFFSET])
}

/// Job explorer deep link listing the last 30 days of finished jobs of `template_id`
#[must_use]
pub fn job_explorer_link(job_explorer: &QsConfig, path: &str, template_id: i64) -> String {
    let mut seed = job_explorer.default_params().clone();
    seed.insert("quick_date_range".to_owned(), ParamValue::from("last_30_days"));
    seed.insert(
        "status".to_owned(),
        ParamValue::from(vec!["failed", "successful"]),
    );
    seed.insert(
        "template_id".to_owned(),
        ParamValue::List(vec![template_id.to_string()]),
    );
    create_url(path, &[(job_explorer, &seed)])
}

/// One plan as a text card
///
/// `template_link` is the deep link of the linked template, if any.
#[must_use]
pub fn render_card(plan: &Plan, options: &FilterOptions, template_link: Option<&str>) -> String {
    let mut out = String::new();
    _ = writeln!(out, "{} (#{})", plan.name, plan.id);
    if let Some(description) = plan.description.as_deref().filter(|d| !d.is_empty()) {
        _ = writeln!(out, "  {description}");
    }

    let frequency = plan.frequency_period.as_deref().map_or_else(
        || "None".to_owned(),
        |f| render::option_label(options, "frequency_period", f),
    );
    _ = writeln!(out, "  Frequency: {frequency}");

    match (plan.linked_template(), template_link) {
        (Some(template), Some(link)) => {
            let name = template.name.as_deref().unwrap_or("unnamed template");
            _ = writeln!(out, "  Template: {name} -> {link}");
        }
        (Some(template), None) => {
            let name = template.name.as_deref().unwrap_or("unnamed template");
            _ = writeln!(out, "  Template: {name}");
        }
        (None, _) => out.push_str("  Template: None - link a template\n"),
    }

    if let Some(status) = &plan.automation_status {
        let statuses: Vec<String> = status
            .statuses()
            .into_iter()
            .map(|s| if s == "None" { "Not Running".to_owned() } else { s })
            .collect();
        let shown = if statuses.is_empty() {
            "Not Running".to_owned()
        } else {
            statuses.join(", ")
        };
        if let Some(when) = status.last_reported() {
            _ = writeln!(out, "  Last job status: {shown} (last reported {when})");
        } else {
            _ = writeln!(out, "  Last job status: {shown}");
        }
    }

    if let Some(savings) = plan.projected_savings().filter(|v| v.abs() > f64::EPSILON) {
        _ = writeln!(out, "  Projected savings: {}", render::format_currency(savings));
    }
    if let Some(modified) = &plan.modified {
        _ = writeln!(out, "  Last updated: {modified}");
    }
    if let Some(category) = &plan.category {
        _ = writeln!(
            out,
            "  Category: {}",
            render::option_label(options, "category", category)
        );
    }
    out
}

/// Savings planner state: filters from the URL, options and one page of plans
pub struct PlansView {
    params: QueryParams,
    preflight: RequestState<(), PreflightResponse, ClientError>,
    options: RequestState<(), FilterOptions, ClientError>,
    plans: RequestState<FilterState, ReportResponse<Plan>, ClientError>,
}

impl PlansView {
    /// Bind a view to `history` and fetch through `client`
    #[must_use]
    pub fn new(client: &Arc<AnalyticsClient>, config: QsConfig, history: Arc<dyn History>) -> Self {
        let preflight = {
            let client = Arc::clone(client);
            RequestState::new(
                move |()| {
                    let client = Arc::clone(&client);
                    async move { client.preflight().await }
                },
                PreflightResponse::default(),
            )
        };
        let options = {
            let client = Arc::clone(client);
            RequestState::new(
                move |()| {
                    let client = Arc::clone(&client);
                    async move { client.read_plan_options(&()).await }
                },
                FilterOptions::default(),
            )
        };
        let plans = {
            let client = Arc::clone(client);
            RequestState::new(
                move |filters: FilterState| {
                    let client = Arc::clone(&client);
                    async move { client.read_plans(&filters).await }
                },
                ReportResponse::default(),
            )
        };

        Self {
            params: QueryParams::new(config, history),
            preflight,
            options,
            plans,
        }
    }

    /// URL-bound filter state
    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Run the authorization check; returns its error, if any
    pub async fn authorize(&self) -> Option<ClientError> {
        self.preflight.request(()).await;
        self.preflight.error()
    }

    /// Fetch options and the current page of plans
    pub async fn fetch(&self) {
        let filters = self.params.query_params();
        tokio::join!(self.options.request(()), self.plans.request(filters));
    }

    /// Current page of plans
    #[must_use]
    pub fn plans(&self) -> Vec<Plan> {
        self.plans.result().items
    }

    /// Pager state for the current filters and plan count
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        PageInfo::from_params(&self.params.query_params(), self.plans.result().count())
    }

    /// What replaces the plan list, if anything
    #[must_use]
    pub fn blocked(&self) -> Option<Blocked> {
        if let Some(error) = self.preflight.error() {
            return Some(Blocked::NotAuthorized(error));
        }
        self.plans
            .error()
            .or_else(|| self.options.error())
            .map(Blocked::Failed)
    }

    /// Render all cards with deep links into the job explorer at `job_explorer_path`
    #[must_use]
    pub fn render(&self, job_explorer: &QsConfig, job_explorer_path: &str) -> String {
        match self.blocked() {
            Some(Blocked::NotAuthorized(error)) => return render::not_authorized_state(&error),
            Some(Blocked::Failed(error)) => return render::error_state(&error),
            None => {}
        }

        let mut out = String::from("Savings Planner\n\n");
        let snapshot = self.plans.snapshot();
        let options = self.options.result();
        if snapshot.is_loading {
            out.push_str("Loading...\n");
        } else if snapshot.is_success && snapshot.result.items.is_empty() {
            out.push_str(render::NO_RESULTS);
        }
        for plan in &snapshot.result.items {
            let link = plan
                .linked_template()
                .and_then(|t| t.id)
                .map(|id| job_explorer_link(job_explorer, job_explorer_path, id));
            out.push_str(&render_card(plan, &options, link.as_deref()));
            out.push('\n');
        }
        out.push_str(&render::pager_line(&self.page_info()));
        out.push('\n');
        out
    }

    /// Detach all request cells; later settles are ignored
    pub fn unmount(&self) {
        self.preflight.unmount();
        self.options.unmount();
        self.plans.unmount();
    }
}

impl std::fmt::Debug for PlansView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlansView")
            .field("params", &self.params)
            .field("plans", &self.plans)
            .finish_non_exhaustive()
    }
}
