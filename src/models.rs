//! # API Models
//!
//! Identifier, request body and response types exchanged with the dbt Cloud
//! v2 API. Responses stay opaque JSON objects; the accessors here only read
//! fields the server reports and never fail.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ClientError, ClientResult};

/// Server-assigned identifier of a triggered job run
pub type JobRunId = i64;

/// Job or run identifier as accepted by the API path segments.
///
/// dbt Cloud ids are integers, but callers frequently carry them around as
/// strings (environment variables, config files). Both are accepted. An id is
/// *present* when it is a non-zero integer or a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiId {
    Int(i64),
    Str(String),
    Missing,
}

impl ApiId {
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            ApiId::Int(id) => *id != 0,
            ApiId::Str(id) => !id.is_empty(),
            ApiId::Missing => false,
        }
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiId::Int(id) => write!(f, "{id}"),
            ApiId::Str(id) => write!(f, "{id}"),
            ApiId::Missing => write!(f, "None"),
        }
    }
}

impl From<i64> for ApiId {
    fn from(id: i64) -> Self {
        ApiId::Int(id)
    }
}

impl From<i32> for ApiId {
    fn from(id: i32) -> Self {
        ApiId::Int(i64::from(id))
    }
}

impl From<u32> for ApiId {
    fn from(id: u32) -> Self {
        ApiId::Int(i64::from(id))
    }
}

impl From<u64> for ApiId {
    fn from(id: u64) -> Self {
        i64::try_from(id).map_or_else(|_| ApiId::Str(id.to_string()), ApiId::Int)
    }
}

impl From<&str> for ApiId {
    fn from(id: &str) -> Self {
        ApiId::Str(id.to_string())
    }
}

impl From<String> for ApiId {
    fn from(id: String) -> Self {
        ApiId::Str(id)
    }
}

impl From<&String> for ApiId {
    fn from(id: &String) -> Self {
        ApiId::Str(id.clone())
    }
}

impl<T: Into<ApiId>> From<Option<T>> for ApiId {
    fn from(id: Option<T>) -> Self {
        id.map_or(ApiId::Missing, Into::into)
    }
}

/// Body of a trigger-run request.
///
/// All fields are optional and omitted from the payload when unset. The
/// values are passed to the API verbatim; nothing is validated locally.
///
/// # Examples
///
/// ```rust
/// use dbt_cloud_client::TriggerRunRequest;
///
/// let body = TriggerRunRequest::with_cause("nightly")
///     .git_branch("main")
///     .steps_override(vec!["dbt build".to_string()])
///     .to_body()
///     .unwrap();
///
/// assert_eq!(body["cause"], "nightly");
/// assert_eq!(body["git_branch"], "main");
/// assert!(!body.contains_key("git_sha"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerRunRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_pull_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_pull_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_merge_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dbt_version_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads_override: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_docs_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds_override: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_override: Option<Vec<String>>,
}

impl TriggerRunRequest {
    /// Start a request carrying only a `cause`
    #[must_use]
    pub fn with_cause(cause: impl Into<String>) -> Self {
        Self {
            cause: Some(cause.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn git_sha(mut self, sha: impl Into<String>) -> Self {
        self.git_sha = Some(sha.into());
        self
    }

    #[must_use]
    pub fn git_branch(mut self, branch: impl Into<String>) -> Self {
        self.git_branch = Some(branch.into());
        self
    }

    #[must_use]
    pub fn azure_pull_request_id(mut self, id: i64) -> Self {
        self.azure_pull_request_id = Some(id);
        self
    }

    #[must_use]
    pub fn github_pull_request_id(mut self, id: i64) -> Self {
        self.github_pull_request_id = Some(id);
        self
    }

    #[must_use]
    pub fn gitlab_merge_request_id(mut self, id: i64) -> Self {
        self.gitlab_merge_request_id = Some(id);
        self
    }

    #[must_use]
    pub fn schema_override(mut self, schema: impl Into<String>) -> Self {
        self.schema_override = Some(schema.into());
        self
    }

    #[must_use]
    pub fn dbt_version_override(mut self, version: impl Into<String>) -> Self {
        self.dbt_version_override = Some(version.into());
        self
    }

    #[must_use]
    pub fn threads_override(mut self, threads: u32) -> Self {
        self.threads_override = Some(threads);
        self
    }

    #[must_use]
    pub fn target_name_override(mut self, target: impl Into<String>) -> Self {
        self.target_name_override = Some(target.into());
        self
    }

    #[must_use]
    pub fn generate_docs_override(mut self, generate: bool) -> Self {
        self.generate_docs_override = Some(generate);
        self
    }

    #[must_use]
    pub fn timeout_seconds_override(mut self, seconds: u64) -> Self {
        self.timeout_seconds_override = Some(seconds);
        self
    }

    #[must_use]
    pub fn steps_override(mut self, steps: Vec<String>) -> Self {
        self.steps_override = Some(steps);
        self
    }

    /// Serialize into the JSON object accepted by `trigger_job_run`
    pub fn to_body(&self) -> ClientResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ClientError::invalid_response(
                "trigger_run_request",
                format!("expected a JSON object, got {other}"),
            )),
        }
    }
}

/// Run object returned by `GET accounts/{account_id}/runs/{run_id}`.
///
/// Kept as the raw `data` mapping the server sent. The typed readers below
/// return `None` for anything absent or of an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunStatus(Map<String, Value>);

impl RunStatus {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    /// Numeric run status code (queued, starting, running, success, error, cancelled)
    #[must_use]
    pub fn status(&self) -> Option<i64> {
        self.0.get("status").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn status_humanized(&self) -> Option<&str> {
        self.0.get("status_humanized").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_complete(&self) -> Option<bool> {
        self.0.get("is_complete").and_then(Value::as_bool)
    }

    #[must_use]
    pub fn is_success(&self) -> Option<bool> {
        self.0.get("is_success").and_then(Value::as_bool)
    }

    #[must_use]
    pub fn is_error(&self) -> Option<bool> {
        self.0.get("is_error").and_then(Value::as_bool)
    }

    #[must_use]
    pub fn is_cancelled(&self) -> Option<bool> {
        self.0.get("is_cancelled").and_then(Value::as_bool)
    }
}

impl From<Map<String, Value>> for RunStatus {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<RunStatus> for Map<String, Value> {
    fn from(status: RunStatus) -> Self {
        status.0
    }
}
