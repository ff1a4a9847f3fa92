//! Command execution handler
//!
//! Reached for every path once authentication has passed.

use axum::{body::Bytes, extract::State, http::Method, Json};

use super::state::AppState;
use crate::types::{CommandRequest, CommandResponse, ExecError, RejectError};

/// Run the command in the request body and report the outcome.
///
/// Only method and decode problems produce non-200 statuses; a failing command
/// is reported in the JSON body with `success: false`.
pub async fn run_command(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<CommandResponse>, RejectError> {
    if method != Method::POST {
        tracing::warn!("Rejected {} request", method);
        return Err(RejectError::MethodNotAllowed);
    }

    let request = decode_request(&body)?;

    tracing::info!(command = %request.command, "Executing command");

    let response = match state.executor.run(&request.command).await {
        Ok(output) => CommandResponse::success(output),
        Err(err) => {
            if let ExecError::Exit { output, .. } = &err {
                tracing::debug!(output = %output, "Discarding output of failed command");
            }
            tracing::warn!(command = %request.command, "{}", err);
            CommandResponse::failure(&err)
        }
    };

    Ok(Json(response))
}

/// Decode the first JSON value in the body; anything after it is ignored
fn decode_request(body: &[u8]) -> Result<CommandRequest, RejectError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<CommandRequest>()
        .next()
    {
        Some(Ok(request)) => Ok(request),
        Some(Err(e)) => {
            tracing::warn!("Failed to decode command request: {}", e);
            Err(RejectError::BadJson)
        }
        None => {
            tracing::warn!("Empty command request body");
            Err(RejectError::BadJson)
        }
    }
}
