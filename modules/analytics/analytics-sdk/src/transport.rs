//! HTTP transport for the analytics API using reqwest
//!
//! Every call awaits the auth gate first, then sends JSON to an absolute
//! endpoint path resolved against the configured origin.

use std::sync::Arc;
use std::time::Duration;

use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthGate;
use crate::config::AnalyticsClientConfig;
use crate::error::{ApiFailure, ClientError};

/// Body keys mirrored into the querystring of paginated reports
const PAGINATION_KEYS: [&str; 3] = ["limit", "offset", "sort_by"];

pub struct HttpTransport {
    base_url: Url,
    http_client: reqwest::Client,
    auth: Arc<dyn AuthGate>,
}

impl HttpTransport {
    /// Create a transport
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &AnalyticsClientConfig, auth: Arc<dyn AuthGate>) -> Result<Self, ClientError> {
        let base_url = config.parsed_base_url()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("cf-analytics-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        debug!(
            base_url = %base_url,
            timeout_secs = config.timeout.as_secs(),
            "Created analytics HTTP transport"
        );

        Ok(Self {
            base_url,
            http_client,
            auth,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET with `params` flattened into the querystring
    pub async fn get<T, P>(&self, endpoint: &str, params: &P) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let pairs = query_pairs(&to_value(params)?);
        let url = self.url(endpoint, pairs)?;
        self.send(Method::GET, url, None).await
    }

    /// POST `body` as JSON
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint, Vec::new())?;
        self.send(Method::POST, url, Some(to_bytes(body)?)).await
    }

    /// POST `body` as JSON, mirroring its pagination keys into the querystring
    pub async fn post_with_pagination<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = to_value(body)?;
        let pagination: serde_json::Map<String, Value> = PAGINATION_KEYS
            .iter()
            .filter_map(|key| {
                value
                    .get(*key)
                    .map(|v| ((*key).to_owned(), v.clone()))
            })
            .collect();
        let url = self.url(endpoint, query_pairs(&Value::Object(pagination)))?;
        self.send(Method::POST, url, Some(to_bytes(&value)?)).await
    }

    /// DELETE `{endpoint}{id}`
    pub async fn delete_by_id<T>(&self, endpoint: &str, id: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(&format!("{endpoint}{id}"), Vec::new())?;
        self.send(Method::DELETE, url, None).await
    }

    /// PUT `body` as JSON to `{endpoint}{id}`
    pub async fn update_by_id<T, B>(&self, endpoint: &str, id: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(&format!("{endpoint}{id}"), Vec::new())?;
        self.send(Method::PUT, url, Some(to_bytes(body)?)).await
    }

    fn url(&self, endpoint: &str, pairs: Vec<(String, String)>) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ClientError::Request(format!("Invalid endpoint '{endpoint}': {e}")))?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn send<T>(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let user = self.auth.current_user().await?;

        trace!(
            url = %url,
            method = %method,
            user = %user.username,
            "Executing analytics API request"
        );

        let mut req_builder = self
            .http_client
            .request(method, url.clone())
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &user.bearer_token {
            req_builder = req_builder.bearer_auth(token);
        }
        if let Some(body) = body {
            req_builder = req_builder.body(body);
        }

        let resp = req_builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(&url, &e))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(&url, &e))?;

        trace!(
            status = %status,
            body_len = bytes.len(),
            "Received analytics API response"
        );

        decode_response(status, &bytes)
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|e| ClientError::Request(format!("Failed to encode request parameters: {e}")))
}

fn to_bytes<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(body)
        .map_err(|e| ClientError::Request(format!("Failed to encode request body: {e}")))
}

fn map_reqwest_error(url: &Url, e: &reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout(format!("Request to {url} timed out"))
    } else if e.is_connect() {
        ClientError::Connection(format!("Connection to {url} failed: {e}"))
    } else {
        ClientError::Request(format!("Request to {url} failed: {e}"))
    }
}

/// Flatten a JSON object into sorted querystring pairs
///
/// Arrays become repeated keys; nulls and nested objects are skipped.
fn query_pairs(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    let mut pairs: Vec<(String, String)> = map
        .iter()
        .flat_map(|(key, v)| {
            let items = match v {
                Value::Array(items) => items.iter().filter_map(scalar).collect(),
                other => scalar(other).into_iter().collect::<Vec<_>>(),
            };
            items.into_iter().map(move |item| (key.clone(), item))
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ClientError> {
    if !status.is_success() {
        let failure = ApiFailure::from_body(body);
        debug!(status = %status, failure = %failure, "Analytics API returned an error");
        return Err(ClientError::Api { status, failure });
    }

    // Empty 2xx bodies (e.g. 204 on delete) decode as JSON null.
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
