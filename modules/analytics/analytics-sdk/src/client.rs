//! Analytics client - main public API
//!
//! One method per backend operation. Report and option bodies are any
//! serializable filter object; a view usually passes its URL-derived filter
//! state straight through.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::AuthGate;
use crate::config::AnalyticsClientConfig;
use crate::endpoints;
use crate::error::Result;
use crate::models::{
    ApiJson, FeatureFlags, FilterOptions, JobExplorerResponse, Plan, PreflightResponse,
    ReportResponse,
};
use crate::transport::HttpTransport;

/// Analytics API client
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use analytics_sdk::{AllowAll, AnalyticsClient, AnalyticsClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AnalyticsClientConfig::from_env()?;
/// let client = AnalyticsClient::from_config(&config, Arc::new(AllowAll))?;
///
/// client.preflight().await?;
/// let page = client
///     .read_job_explorer(&serde_json::json!({"limit": 5, "offset": 0}))
///     .await?;
/// println!("{} jobs", page.meta.count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AnalyticsClient {
    transport: HttpTransport,
}

impl AnalyticsClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `config` - API origin and timeout
    /// * `auth` - gate awaited before every request
    ///
    /// # Errors
    /// Returns [`ClientError::Config`](crate::ClientError::Config) if the base
    /// URL is invalid or the HTTP client cannot be built
    pub fn from_config(config: &AnalyticsClientConfig, auth: Arc<dyn AuthGate>) -> Result<Self> {
        let transport = HttpTransport::new(config, auth)?;
        debug!(base_url = %transport.base_url(), "Created AnalyticsClient");
        Ok(Self { transport })
    }

    /// Origin requests are sent to
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// GET `endpoint` with `params` as the querystring
    ///
    /// Arrays become repeated keys, nulls are dropped.
    ///
    /// # Errors
    /// Returns error if the gate refuses, the request fails, the API answers
    /// non-2xx or the body does not decode into `T`
    pub async fn get<T, P>(&self, endpoint: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        self.transport.get(endpoint, params).await
    }

    /// POST `body` as JSON to `endpoint`
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.transport.post(endpoint, body).await
    }

    /// POST `body` as JSON, copying its `limit`, `offset` and `sort_by` into
    /// the querystring
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn post_with_pagination<T, B>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.transport.post_with_pagination(endpoint, body).await
    }

    /// DELETE `{endpoint}{id}`
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn delete_by_id<T>(&self, endpoint: &str, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.transport.delete_by_id(endpoint, id).await
    }

    /// PUT `body` as JSON to `{endpoint}{id}`
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn update_by_id<T, B>(&self, endpoint: &str, id: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.transport.update_by_id(endpoint, id, body).await
    }

    /// Authorization check run before a view's first data request
    ///
    /// # Errors
    /// Returns [`ClientError::Api`](crate::ClientError::Api) with status 401/403
    /// when the user may not use analytics
    pub async fn preflight(&self) -> Result<PreflightResponse> {
        self.get(endpoints::AUTHORIZED, &()).await
    }

    /// Job explorer page for `filters`
    ///
    /// # Errors
    /// Same as [`get`](Self::get); validation failures come back as status 422
    pub async fn read_job_explorer<B>(&self, filters: &B) -> Result<JobExplorerResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post_with_pagination(endpoints::JOB_EXPLORER, filters)
            .await
    }

    /// Toolbar options of the job explorer
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_job_explorer_options<B>(&self, filters: &B) -> Result<FilterOptions>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoints::JOB_EXPLORER_OPTIONS, filters).await
    }

    /// Event explorer page
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_event_explorer<B>(&self, filters: &B) -> Result<ReportResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post_with_pagination(endpoints::EVENT_EXPLORER, filters)
            .await
    }

    /// Host explorer page
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_host_explorer<B>(&self, filters: &B) -> Result<ReportResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post_with_pagination(endpoints::HOST_EXPLORER, filters)
            .await
    }

    /// Automation calculator templates page
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_roi<B>(&self, filters: &B) -> Result<ReportResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post_with_pagination(endpoints::ROI_TEMPLATES, filters)
            .await
    }

    /// Toolbar options of the automation calculator
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_roi_options<B>(&self, filters: &B) -> Result<FilterOptions>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoints::ROI_TEMPLATES_OPTIONS, filters).await
    }

    /// Toolbar options of the organization statistics dashboard
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_org_options<B>(&self, filters: &B) -> Result<FilterOptions>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoints::ORG_OPTIONS, filters).await
    }

    /// Savings plans page
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_plans<B>(&self, filters: &B) -> Result<ReportResponse<Plan>>
    where
        B: Serialize + ?Sized,
    {
        self.post_with_pagination(endpoints::PLANS, filters).await
    }

    /// Create a savings plan
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn create_plan<B>(&self, plan: &B) -> Result<ApiJson>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoints::PLAN, plan).await
    }

    /// One savings plan
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_plan(&self, id: &str) -> Result<ApiJson> {
        let path = format!("{}/", endpoints::item_path(endpoints::PLAN, id));
        self.get(&path, &()).await
    }

    /// Replace a savings plan
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn update_plan<B>(&self, id: &str, plan: &B) -> Result<ApiJson>
    where
        B: Serialize + ?Sized,
    {
        self.update_by_id(endpoints::PLAN, id, plan).await
    }

    /// Delete a savings plan
    ///
    /// An empty success body decodes as `null`.
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn delete_plan(&self, id: &str) -> Result<serde_json::Value> {
        self.delete_by_id(endpoints::PLAN, id).await
    }

    /// Toolbar options of the savings planner
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_plan_options<P>(&self, params: &P) -> Result<FilterOptions>
    where
        P: Serialize + ?Sized,
    {
        self.get(endpoints::PLAN_OPTIONS, params).await
    }

    /// Cluster list
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_clusters(&self) -> Result<ApiJson> {
        self.get(endpoints::CLUSTERS, &()).await
    }

    /// Toolbar options of the clusters dashboard
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_clusters_options<B>(&self, filters: &B) -> Result<FilterOptions>
    where
        B: Serialize + ?Sized,
    {
        self.post(endpoints::CLUSTERS_OPTIONS, filters).await
    }

    /// Notification list
    ///
    /// # Errors
    /// Same as [`get`](Self::get)
    pub async fn read_notifications<P>(&self, params: &P) -> Result<ApiJson>
    where
        P: Serialize + ?Sized,
    {
        self.get(endpoints::NOTIFICATIONS, params).await
    }

    /// Feature flags; empty when they cannot be fetched for any reason
    pub async fn get_features(&self) -> FeatureFlags {
        match self.get(endpoints::FEATURE_FLAGS, &()).await {
            Ok(flags) => flags,
            Err(e) => {
                warn!(error = %e, "Feature flags unavailable, continuing without them");
                FeatureFlags::default()
            }
        }
    }
}
