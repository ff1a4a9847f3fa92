//! Wire types and error definitions for the command agent

use std::process::ExitStatus;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned when a command finishes with exit status 0
pub const SUCCESS_MESSAGE: &str = "Comando executado com sucesso";

// ============================================================================
// Request / Response Types
// ============================================================================

/// Body of a command request: `{"comando": "<shell text>"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    #[serde(rename = "comando")]
    pub command: String,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Result of one command execution, returned with HTTP 200
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    /// Combined stdout/stderr; omitted when empty or on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl CommandResponse {
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            data: (!output.is_empty()).then_some(output),
        }
    }

    pub fn failure(err: &ExecError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            data: None,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Launcher-level failure while running a command
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("erro ao executar comando: {0}")]
    Spawn(#[source] std::io::Error),

    /// The shell ran but did not exit cleanly; `output` is what it printed
    #[error("erro ao executar comando: {status}")]
    Exit { status: ExitStatus, output: String },

    #[error("erro ao executar comando: {0}")]
    Io(#[from] std::io::Error),
}

/// Gate failures that end a request before any command runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectError {
    #[error("Não autorizado!")]
    Unauthorized,

    #[error("Método não permitido")]
    MethodNotAllowed,

    #[error("Erro ao decodificar JSON")]
    BadJson,
}

impl RejectError {
    pub fn status(&self) -> StatusCode {
        match self {
            RejectError::Unauthorized => StatusCode::UNAUTHORIZED,
            RejectError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RejectError::BadJson => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for RejectError {
    fn into_response(self) -> Response {
        // Plain text, newline-terminated like a classic HTTP error page
        (self.status(), format!("{}\n", self)).into_response()
    }
}
