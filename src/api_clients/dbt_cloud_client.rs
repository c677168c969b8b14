//! # dbt Cloud API Client
//!
//! HTTP client for the dbt Cloud v2 REST API. Provides generic JSON GET/POST
//! helpers plus the two domain calls used by pipelines: triggering a job run
//! and reading a run's status.
//!
//! Every call is a single request/response round trip. There is no retry and
//! no polling loop; callers repeat `get_run_status` themselves until the run
//! reaches a terminal state.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{ApiId, JobRunId, RunStatus, TriggerRunRequest};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Client for the dbt Cloud v2 API
///
/// # Examples
///
/// ```rust,no_run
/// use dbt_cloud_client::{ClientConfig, DbtCloudClient};
///
/// # async fn example() -> dbt_cloud_client::ClientResult<()> {
/// let config = ClientConfig::new("my-api-token").with_account_id("12345");
/// let client = DbtCloudClient::new(config)?;
///
/// let run_id = client.trigger_job_run(67890, None).await?;
/// let status = client.get_run_status(run_id).await?;
/// println!("run {} is {:?}", run_id, status.status_humanized());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DbtCloudClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    account_id: Option<String>,
    headers: HeaderMap,
}

impl std::fmt::Debug for DbtCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbtCloudClient")
            .field("base_url", &self.base_url)
            .field("account_id", &self.account_id)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl DbtCloudClient {
    /// Create a client backed by the `reqwest` transport
    ///
    /// A missing `account_id` is accepted here; calls that need it fail with
    /// [`ClientError::InvalidCredentials`] instead.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config.timeout_ms)?;
        Self::with_transport(config, transport)
    }

    /// Create a client for `api_token` against the default API root
    pub fn from_token(
        api_token: impl Into<String>,
        account_id: Option<String>,
    ) -> ClientResult<Self> {
        let mut config = ClientConfig::new(api_token);
        config.account_id = account_id;
        Self::new(config)
    }

    /// Create a client that sends its requests through `transport`
    pub fn with_transport<T>(config: ClientConfig, transport: T) -> ClientResult<Self>
    where
        T: HttpTransport + 'static,
    {
        let base_url = config.base_url();
        Url::parse(&base_url).map_err(|e| {
            ClientError::config_error(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        let headers = build_headers(&config.api_token)?;

        info!(
            base_url = %base_url,
            account_id = ?config.account_id,
            transport = transport.transport_name(),
            "Created dbt Cloud API client"
        );

        Ok(Self {
            transport: Arc::new(transport),
            base_url,
            account_id: config.account_id,
            headers,
        })
    }

    /// Versioned API root every path is appended to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// `accounts/{account_id}` prefix of the account-scoped endpoints
    #[must_use]
    pub fn accounts_path(&self) -> String {
        format!("accounts/{}", self.account_id.as_deref().unwrap_or("None"))
    }

    /// Headers sent with every request
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// GET `{base_url}/{path}` and return the parsed JSON body unmodified
    pub async fn get_endpoint(&self, path: &str) -> ClientResult<Value> {
        let url = self.endpoint_url(path)?;
        debug!(url = %url, "GET dbt Cloud endpoint");

        self.transport.get_json(&url, &self.headers).await
    }

    /// POST `body` to `{base_url}/{path}` and return the parsed JSON body unmodified
    pub async fn post_endpoint(&self, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let url = self.endpoint_url(path)?;
        debug!(url = %url, has_body = body.is_some(), "POST dbt Cloud endpoint");

        self.transport.post_json(&url, &self.headers, body).await
    }

    /// Trigger a run of `job_id` and return the id of the enqueued run
    ///
    /// POST `accounts/{account_id}/jobs/{job_id}/run`
    ///
    /// `data` is copied into the request body as-is; see
    /// [`TriggerRunRequest`] for the fields the API recognizes.
    pub async fn trigger_job_run(
        &self,
        job_id: impl Into<ApiId>,
        data: Option<&Map<String, Value>>,
    ) -> ClientResult<JobRunId> {
        let job_id = job_id.into();
        let account_id = self.require_ids("job_id", &job_id, "")?;

        let mut json_body = Map::new();
        if let Some(data) = data {
            json_body.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        debug!(
            account_id = %account_id,
            job_id = %job_id,
            fields = json_body.len(),
            "Triggering dbt Cloud job run"
        );

        let response = self
            .post_endpoint(
                &format!("accounts/{}/jobs/{}/run", account_id, job_id),
                Some(&Value::Object(json_body)),
            )
            .await?;

        let run_id = extract_run_id(&response)?;
        info!(
            account_id = %account_id,
            job_id = %job_id,
            run_id = run_id,
            "Triggered dbt Cloud job run"
        );

        Ok(run_id)
    }

    /// Trigger a run of `job_id` with a typed request body
    pub async fn trigger_job_run_with(
        &self,
        job_id: impl Into<ApiId>,
        request: &TriggerRunRequest,
    ) -> ClientResult<JobRunId> {
        let body = request.to_body()?;
        self.trigger_job_run(job_id, Some(&body)).await
    }

    /// Get the current state of run `run_id`
    ///
    /// GET `accounts/{account_id}/runs/{run_id}`
    pub async fn get_run_status(&self, run_id: impl Into<ApiId>) -> ClientResult<RunStatus> {
        let run_id = run_id.into();
        let account_id = self.require_ids("run_id", &run_id, ".")?;

        let response = self
            .get_endpoint(&format!("accounts/{}/runs/{}", account_id, run_id))
            .await?;

        match response.get("data") {
            Some(Value::Object(data)) => {
                let status = RunStatus::new(data.clone());
                debug!(
                    run_id = %run_id,
                    status = ?status.status(),
                    status_humanized = ?status.status_humanized(),
                    "Retrieved dbt Cloud run status"
                );
                Ok(status)
            }
            Some(other) => Err(ClientError::invalid_response(
                "data",
                format!("expected a JSON object, got {}", other),
            )),
            None => Err(ClientError::invalid_response(
                "data",
                "missing from run status response",
            )),
        }
    }

    fn endpoint_url(&self, path: &str) -> ClientResult<Url> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse(&url)
            .map_err(|e| ClientError::config_error(format!("Invalid URL '{}': {}", url, e)))
    }

    /// Account id, provided both it and the per-call id are present
    ///
    /// `terminator` ends the error message; the run-status message carries a
    /// trailing period, the trigger message does not.
    fn require_ids(&self, id_role: &str, id: &ApiId, terminator: &str) -> ClientResult<&str> {
        match self.account_id.as_deref() {
            Some(account_id) if !account_id.is_empty() && id.is_present() => Ok(account_id),
            account_id => Err(ClientError::invalid_credentials(format!(
                "account_id and {role} are required, got account_id: {} and {role}: {}{}",
                account_id.unwrap_or("None"),
                id,
                terminator,
                role = id_role,
            ))),
        }
    }
}

fn build_headers(api_token: &str) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut authorization = HeaderValue::from_str(&format!("Token {}", api_token))
        .map_err(|e| ClientError::config_error(format!("Invalid API token: {}", e)))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// `data.id` of a trigger response, coerced to an integer
fn extract_run_id(response: &Value) -> ClientResult<JobRunId> {
    let id = response
        .get("data")
        .ok_or_else(|| ClientError::invalid_response("data", "missing from trigger response"))?
        .get("id")
        .ok_or_else(|| ClientError::invalid_response("data.id", "missing from trigger response"))?;

    match id {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                // Whole-valued floats such as 42.0 still name a run.
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| {
                ClientError::invalid_response("data.id", format!("{} is not an integer", number))
            }),
        Value::String(text) => text.trim().parse::<JobRunId>().map_err(|e| {
            ClientError::invalid_response("data.id", format!("'{}' is not an integer: {}", text, e))
        }),
        other => Err(ClientError::invalid_response(
            "data.id",
            format!("expected an integer, got {}", other),
        )),
    }
}
