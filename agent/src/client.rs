//! Client for dispatching commands to a remote agent
//!
//! This is the controller side of the protocol: the management panel posts a
//! command to `http://<host>:6969` with the `Senha` header and reads back the
//! JSON result.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{CommandRequest, CommandResponse};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Agent rejected the shared secret")]
    Unauthorized,

    #[error("Agent rejected the request method")]
    MethodNotAllowed,

    #[error("Agent could not decode the request: {0}")]
    BadRequest(String),

    #[error("Unexpected status {status} from agent: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client bound to one agent
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
    timeout: Option<Duration>,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            secret: secret.into(),
            timeout: None,
        }
    }

    /// Give up on requests that take longer than `timeout`.
    ///
    /// The command keeps running on the agent; only the caller stops waiting.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send one command and decode the agent's answer.
    ///
    /// A command that ran but failed is `Ok` with `success == false`.
    pub async fn execute(&self, command: &str) -> Result<CommandResponse, ClientError> {
        let mut request = self
            .http
            .post(&self.base_url)
            .header("Senha", &self.secret)
            .json(&CommandRequest::new(command));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Dispatching command to {}", self.base_url);
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::METHOD_NOT_ALLOWED => Err(ClientError::MethodNotAllowed),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(
                response.text().await?.trim_end().to_string(),
            )),
            status => Err(ClientError::UnexpectedStatus {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
