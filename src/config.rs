//! # Client Configuration
//!
//! Connection settings for the dbt Cloud client.
//! Supports environment variables, config files, and programmatic overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Default dbt Cloud API root, without the version segment
pub const DEFAULT_BASE_API_URL: &str = "https://cloud.getdbt.com/api";

/// API version segment appended to the base API URL
pub const API_VERSION: &str = "v2";

/// Client configuration for API connections
///
/// # Examples
///
/// ```rust
/// use dbt_cloud_client::config::{ClientConfig, DEFAULT_BASE_API_URL};
///
/// let config = ClientConfig::new("secret-token").with_account_id("12345");
/// assert_eq!(config.base_api_url, DEFAULT_BASE_API_URL);
/// assert_eq!(config.base_url(), "https://cloud.getdbt.com/api/v2");
/// assert_eq!(config.account_id.as_deref(), Some("12345"));
/// ```
///
/// ```rust,no_run
/// use dbt_cloud_client::config::ClientConfig;
///
/// // Load configuration from environment and config files
/// let config = ClientConfig::load().expect("Failed to load config");
/// println!("dbt Cloud URL: {}", config.base_url());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service or personal API token sent as `Authorization: Token {api_token}`
    #[serde(default)]
    pub api_token: String,
    /// Account the jobs and runs belong to; checked when a call needs it
    #[serde(default)]
    pub account_id: Option<String>,
    /// API root without the version segment
    #[serde(default = "default_base_api_url")]
    pub base_api_url: String,
    /// Request timeout in milliseconds; transport default when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_base_api_url() -> String {
    DEFAULT_BASE_API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            account_id: None,
            base_api_url: default_base_api_url(),
            timeout_ms: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("base_api_url", &self.base_api_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for `api_token` against the default API root
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn with_base_api_url(mut self, base_api_url: impl Into<String>) -> Self {
        self.base_api_url = base_api_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Versioned API root, `{base_api_url}/v2`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.base_api_url, API_VERSION)
    }

    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (./dbt-cloud.toml, ~/.dbt-cloud/config.toml, ...)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            debug!("Loading config from: {}", config_path.display());
            match Self::load_from_file(&config_path) {
                Ok(file_config) => config = file_config,
                Err(e) => {
                    debug!("Failed to load config file: {}", e);
                }
            }
        }

        config.apply_env_overrides();

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ClientError::config_error(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./dbt-cloud.toml"),
            PathBuf::from("./config/dbt-cloud.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            possible_paths.push(home.join(".dbt-cloud").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("dbt-cloud").join("client.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    /// Apply environment variable overrides
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("DBT_CLOUD_API_TOKEN") {
            self.api_token = token;
        }
        if let Ok(account_id) = std::env::var("DBT_CLOUD_ACCOUNT_ID") {
            self.account_id = Some(account_id);
        }
        if let Ok(url) = std::env::var("DBT_CLOUD_BASE_URL") {
            self.base_api_url = url;
        }
        if let Ok(timeout) = std::env::var("DBT_CLOUD_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.timeout_ms = Some(timeout_ms);
            }
        }
    }
}
