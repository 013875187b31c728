use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::Value;
use thiserror::Error;

use crate::apis::schemas::ErrorResponse;

pub const GENERIC_FAILURE: &str = "Failed to process invite";
pub const AUTH_FAILURE: &str = "Failed to get Trustpilot access token";

/// Every way an invite request can fail.
///
/// `Validation` is the only client-side failure; everything else surfaces as a
/// 500 carrying the most specific text available.
#[derive(Debug, Error)]
pub enum InviteError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to get Trustpilot access token: {0}")]
    Auth(String),

    #[error("Trustpilot responded with {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Request to Trustpilot failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl InviteError {
    pub fn upstream(status: u16, body: String) -> Self {
        InviteError::Upstream { status, body }
    }

    // The outward-facing body; full detail stays in the error log
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            InviteError::Validation(message) => ErrorResponse {
                message: message.clone(),
                error: None,
            },
            InviteError::Auth(detail) => ErrorResponse {
                message: AUTH_FAILURE.to_string(),
                error: Some(detail.clone()),
            },
            InviteError::Upstream { body, .. } => ErrorResponse {
                message: upstream_message(body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                error: Some(body.clone()),
            },
            InviteError::Network(err) => ErrorResponse {
                message: GENERIC_FAILURE.to_string(),
                error: Some(err.to_string()),
            },
            InviteError::Config(detail) => ErrorResponse {
                message: GENERIC_FAILURE.to_string(),
                error: Some(detail.clone()),
            },
        }
    }
}

// Pull the `message` field out of an upstream JSON error body
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

impl ResponseError for InviteError {
    fn status_code(&self) -> StatusCode {
        match self {
            InviteError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}
