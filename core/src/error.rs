//! Error types for the health API client.
//!
//! # Design
//! Every failure carries an HTTP status code. Backend rejections keep the
//! original status and whatever body the backend sent; failures that happen
//! before a usable response exists (transport errors, undecodable success
//! bodies) report status `0`. Callers that only need "did it work and what
//! status" can use [`ApiError::status`] without matching variants.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by `HealthClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("API request failed: {reason} (HTTP {status})")]
    Rejected {
        status: u16,
        reason: String,
        body: ErrorBody,
    },

    /// No response was obtained (DNS, connection, I/O).
    #[error("Network request failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("request payload could not be serialized: {0}")]
    Serialization(String),

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("response body could not be deserialized: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Build a rejection from a raw non-2xx response, keeping the body as
    /// JSON when it parses and as text otherwise.
    pub fn rejected(status: u16, body: &str) -> Self {
        let reason = ureq::http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        ApiError::Rejected {
            status,
            reason,
            body: ErrorBody::parse(body),
        }
    }

    /// HTTP status of the failure; `0` when no response was obtained.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Rejected { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }
}

/// Error payload returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Json(Value),
    Text(String),
}

impl ErrorBody {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(raw.to_string()),
        }
    }

    /// The `detail` message of a JSON error body, if the backend sent one as
    /// a plain string.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value.get("detail").and_then(Value::as_str),
            ErrorBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{value}"),
            ErrorBody::Text(text) => f.write_str(text),
        }
    }
}
