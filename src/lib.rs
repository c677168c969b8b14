#![allow(clippy::doc_markdown)] // Allow technical terms like dbt, JSON in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections

//! # dbt Cloud Client
//!
//! Minimal authenticated client for the dbt Cloud v2 API: trigger a job run
//! and read a run's status.
//!
//! ## Module Organization
//!
//! - [`api_clients`] - The [`DbtCloudClient`] and its endpoint methods
//! - [`transport`] - HTTP transport seam and the `reqwest` implementation
//! - [`models`] - Identifiers, trigger request body, run status
//! - [`config`] - Configuration from files and environment
//! - [`error`] - Structured error handling
//! - [`logging`] - Optional `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbt_cloud_client::{ClientConfig, DbtCloudClient, TriggerRunRequest};
//!
//! # async fn example() -> dbt_cloud_client::ClientResult<()> {
//! let client = DbtCloudClient::new(ClientConfig::load()?)?;
//!
//! let request = TriggerRunRequest::with_cause("Triggered by pipeline").git_branch("main");
//! let run_id = client.trigger_job_run_with(67890, &request).await?;
//!
//! let status = client.get_run_status(run_id).await?;
//! if status.is_complete() == Some(true) {
//!     println!("run {} finished: {:?}", run_id, status.status_humanized());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api_clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod transport;

// Re-export commonly used types for convenience
pub use api_clients::DbtCloudClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use models::{ApiId, JobRunId, RunStatus, TriggerRunRequest};
pub use transport::{HttpTransport, ReqwestTransport};
