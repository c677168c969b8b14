//! API Client Modules
//!
//! HTTP clients for the dbt Cloud REST API.

pub mod dbt_cloud_client;

pub use dbt_cloud_client::DbtCloudClient;
