//! Report Client - HTTP client for the report backend
//!
//! Provides network-based calls to the template store and the report
//! generation service.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{ReportApi, ReportClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
