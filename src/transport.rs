//! # HTTP Transport Abstraction
//!
//! The client talks to the API through [`HttpTransport`], so the same code
//! runs against `reqwest` in production and against an in-memory stub in
//! tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dbt_cloud_client::{ClientConfig, DbtCloudClient, ReqwestTransport};
//!
//! let transport = ReqwestTransport::new(Some(30_000))?;
//! let client = DbtCloudClient::with_transport(ClientConfig::load()?, transport)?;
//! let status = client.get_run_status(314).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::{ClientError, ClientResult};

/// One JSON-over-HTTP round trip per call.
///
/// Implementations must not retry. Non-2xx responses surface as
/// [`ClientError::ApiError`], unparsable bodies as
/// [`ClientError::SerializationError`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Get the transport name for debugging/logging.
    fn transport_name(&self) -> &'static str;

    /// GET `url` and parse the body as JSON.
    async fn get_json(&self, url: &Url, headers: &HeaderMap) -> ClientResult<Value>;

    /// POST `body` as JSON to `url` and parse the response body as JSON.
    ///
    /// A `None` body sends the request without a payload.
    async fn post_json(
        &self,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> ClientResult<Value>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport; `timeout_ms` of `None` keeps reqwest's default.
    pub fn new(timeout_ms: Option<u64>) -> ClientResult<Self> {
        let mut client_builder = Client::builder()
            .user_agent(format!("dbt-cloud-client/{}", env!("CARGO_PKG_VERSION")));

        if let Some(timeout_ms) = timeout_ms {
            client_builder = client_builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = client_builder.build().map_err(|e| {
            ClientError::config_error(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    /// Wrap an already configured `reqwest::Client`
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn handle_response(
        response: reqwest::Response,
        operation: &str,
    ) -> ClientResult<Value> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            let value = serde_json::from_slice(&body)?;
            debug!(status = %status, "Completed {} request", operation);
            Ok(value)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Failed {} request", operation);
            Err(ClientError::api_error(status.as_u16(), error_text))
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn transport_name(&self) -> &'static str {
        "reqwest"
    }

    async fn get_json(&self, url: &Url, headers: &HeaderMap) -> ClientResult<Value> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;

        Self::handle_response(response, "GET").await
    }

    async fn post_json(
        &self,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let mut request = self.client.post(url.clone()).headers(headers.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        Self::handle_response(response, "POST").await
    }
}
