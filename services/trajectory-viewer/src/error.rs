//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hysplit_runner::RunnerError;
use serde::{Deserialize, Serialize};
use tdump_parser::TdumpError;
use thiserror::Error;

/// Errors surfaced by the API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The trajectory dump could not be parsed or held no records.
    #[error(transparent)]
    Tdump(#[from] TdumpError),

    /// The model could not be run or produced no output.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Malformed request outside of the dump itself.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable, machine-readable error kind
    pub error: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Tdump(TdumpError::FieldDecode { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Tdump(TdumpError::EmptyInput) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Tdump(TdumpError::InvalidEncoding(_)) => StatusCode::BAD_REQUEST,
            ApiError::Tdump(TdumpError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Runner(RunnerError::InvalidControl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Runner(RunnerError::TimedOut(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Runner(_) => StatusCode::BAD_GATEWAY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Tdump(TdumpError::FieldDecode { .. }) => "field_decode",
            ApiError::Tdump(TdumpError::EmptyInput) => "empty_input",
            ApiError::Tdump(TdumpError::InvalidEncoding(_)) => "invalid_encoding",
            ApiError::Tdump(TdumpError::IoError(_)) => "io_error",
            ApiError::Runner(err) => runner_failure_reason(err),
            ApiError::BadRequest(_) => "bad_request",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let line = match self {
            ApiError::Tdump(err) => err.line(),
            _ => None,
        };
        ErrorBody {
            error: self.kind().to_string(),
            detail: self.to_string(),
            line,
        }
    }
}

/// Short label for a runner failure, used in error bodies and metrics.
pub fn runner_failure_reason(err: &RunnerError) -> &'static str {
    match err {
        RunnerError::InvalidControl(_) => "invalid_control",
        RunnerError::ExecutableNotFound(_) => "executable_not_found",
        RunnerError::Spawn { .. } => "spawn_failed",
        RunnerError::NonZeroExit { .. } => "model_failed",
        RunnerError::TimedOut(_) => "model_timeout",
        RunnerError::MissingOutput(_) => "missing_output",
        RunnerError::IoError(_) => "io_error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            tracing::warn!(error = %self, kind = self.kind(), "Request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}
