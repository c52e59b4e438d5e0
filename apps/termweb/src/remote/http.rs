use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use termweb_proto::{COMMAND_PATH, CommandRequest, CommandResponse};
use tracing::{debug, trace};

use super::{RemoteError, RemoteShell};

/// Posts commands as JSON to `{base}/api/command`.
#[derive(Debug, Clone)]
pub struct HttpRemoteShell {
    client: Client,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl HttpRemoteShell {
    /// `timeout` bounds each request end to end; `None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let invalid = |reason: String| RemoteError::InvalidEndpoint {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        let endpoint = base
            .join(COMMAND_PATH)
            .map_err(|err| invalid(err.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RemoteError::Request)?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> RemoteError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => RemoteError::Timeout(timeout),
            _ => RemoteError::Request(err),
        }
    }
}

#[async_trait]
impl RemoteShell for HttpRemoteShell {
    async fn execute(&self, command: &str) -> Result<CommandResponse, RemoteError> {
        trace!(target: "termweb::remote", endpoint = %self.endpoint, command, "sending command");
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&CommandRequest::new(command))
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body = response.bytes().await.map_err(|err| self.classify(err))?;
        let decoded: CommandResponse = serde_json::from_slice(&body)?;
        debug!(
            target: "termweb::remote",
            status = ?decoded.status,
            cwd = %decoded.cwd,
            clear = decoded.clear,
            output_len = decoded.output.len(),
            "command response received"
        );
        Ok(decoded)
    }
}
