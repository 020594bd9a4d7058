//! Job explorer: filterable, paginated list of automation jobs

use std::sync::Arc;

use analytics_sdk::{AnalyticsClient, ClientError, FilterOptions, JobExplorerResponse, PreflightResponse};
use tokio::sync::watch;
use view_state::qs::{LIMIT, OFFSET, SORT_BY};
use view_state::{FilterState, History, PageInfo, ParamValue, QsConfig, QueryParams, RequestState};

use super::{Blocked, cell};
use crate::render;

/// URL namespace of the job explorer
pub const NAMESPACE: &str = "job-explorer";

/// Row attributes requested from the backend
pub const ATTRIBUTES: [&str; 10] = [
    "id",
    "status",
    "job_type",
    "started",
    "finished",
    "elapsed",
    "created",
    "cluster_name",
    "org_name",
    "most_failed_tasks",
];

const COLUMNS: [&str; 7] = [
    "id",
    "status",
    "job_type",
    "cluster_name",
    "org_name",
    "started",
    "elapsed",
];

/// Default filters with a page size of `limit`
#[must_use]
pub fn default_params(limit: i64) -> FilterState {
    let list = |items: &[&str]| ParamValue::List(items.iter().map(|s| (*s).to_owned()).collect());
    FilterState::from([
        (LIMIT.to_owned(), ParamValue::Int(limit)),
        (OFFSET.to_owned(), ParamValue::Int(0)),
        (SORT_BY.to_owned(), ParamValue::from("created:desc")),
        ("quick_date_range".to_owned(), ParamValue::from("last_2_weeks")),
        ("status".to_owned(), list(&[])),
        ("job_type".to_owned(), list(&["workflowjob", "job"])),
        ("org_id".to_owned(), list(&[])),
        ("cluster_id".to_owned(), list(&[])),
        ("template_id".to_owned(), list(&[])),
        ("inventory_id".to_owned(), list(&[])),
        ("attributes".to_owned(), list(&ATTRIBUTES)),
    ])
}

/// Querystring configuration of the job explorer
#[must_use]
pub fn qs_config(limit: i64) -> QsConfig {
    QsConfig::new(NAMESPACE, default_params(limit), [LIMIT, OFFSET])
}

/// Job explorer state: filters from the URL, options and one page of jobs
pub struct JobExplorerView {
    params: QueryParams,
    preflight: RequestState<(), PreflightResponse, ClientError>,
    options: RequestState<FilterState, FilterOptions, ClientError>,
    data: RequestState<FilterState, JobExplorerResponse, ClientError>,
}

impl JobExplorerView {
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
                move |filters: FilterState| {
                    let client = Arc::clone(&client);
                    async move { client.read_job_explorer_options(&filters).await }
                },
                FilterOptions::default(),
            )
        };
        let data = {
            let client = Arc::clone(client);
            RequestState::new(
                move |filters: FilterState| {
                    let client = Arc::clone(&client);
                    async move { client.read_job_explorer(&filters).await }
                },
                JobExplorerResponse::default(),
            )
        };

        Self {
            params: QueryParams::new(config, history),
            preflight,
            options,
            data,
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

    /// Fetch options and the current page for the current filters
    pub async fn fetch(&self) {
        let filters = self.params.query_params();
        tokio::join!(
            self.options.request(filters.clone()),
            self.data.request(filters)
        );
    }

    /// Refetch if the filters changed since `changes` was last marked seen
    ///
    /// Returns whether a fetch happened.
    pub async fn refetch_if_changed(&self, changes: &mut watch::Receiver<FilterState>) -> bool {
        if !changes.has_changed().unwrap_or(false) {
            return false;
        }
        changes.mark_unchanged();
        self.fetch().await;
        true
    }

    /// Current page of jobs
    #[must_use]
    pub fn jobs(&self) -> JobExplorerResponse {
        self.data.result()
    }

    /// Pager state for the current filters and job count
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        PageInfo::from_params(&self.params.query_params(), self.data.result().count())
    }

    /// What replaces the job list, if anything
    #[must_use]
    pub fn blocked(&self) -> Option<Blocked> {
        if let Some(error) = self.preflight.error() {
            return Some(Blocked::NotAuthorized(error));
        }
        self.options
            .error()
            .or_else(|| self.data.error())
            .map(Blocked::Failed)
    }

    /// Render the view
    #[must_use]
    pub fn render(&self) -> String {
        match self.blocked() {
            Some(Blocked::NotAuthorized(error)) => return render::not_authorized_state(&error),
            Some(Blocked::Failed(error)) => return render::error_state(&error),
            None => {}
        }

        let mut out = String::from("Job Explorer\n\n");
        let data = self.data.snapshot();
        if data.is_loading {
            out.push_str("Loading...\n");
        } else if data.is_success && data.result.items.is_empty() {
            out.push_str(render::NO_RESULTS);
        } else if data.is_success {
            let rows: Vec<Vec<String>> = data
                .result
                .items
                .iter()
                .map(|job| COLUMNS.iter().map(|c| cell(job.get(*c))).collect())
                .collect();
            out.push_str(&render::table(&COLUMNS, &rows));
        }
        out.push('\n');
        out.push_str(&render::pager_line(&self.page_info()));
        out.push('\n');
        out
    }

    /// Detach all request cells; later settles are ignored
    pub fn unmount(&self) {
        self.preflight.unmount();
        self.options.unmount();
        self.data.unmount();
    }
}

impl std::fmt::Debug for JobExplorerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobExplorerView")
            .field("params", &self.params)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
