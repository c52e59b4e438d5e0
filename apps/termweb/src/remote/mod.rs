//! Boundary to the command execution service.
//!
//! The session controller only ever sees [`RemoteShell`]; the HTTP client in
//! [`http`] is the production implementation.

pub mod http;

use async_trait::async_trait;
use std::time::Duration;
use termweb_proto::CommandResponse;
use thiserror::Error;

pub use http::HttpRemoteShell;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote call ended without a response: {0}")]
    Aborted(String),
}

/// Executes one trimmed command line remotely.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    async fn execute(&self, command: &str) -> Result<CommandResponse, RemoteError>;
}
