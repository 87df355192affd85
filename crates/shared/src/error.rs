use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status class of a non-2xx response, as far as the book page cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Internal,
    Other,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            500 => Self::Internal,
            _ => Self::Other,
        }
    }
}

/// Error body the StoryCircle server attaches to failed requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Parses a response body, tolerating non-JSON and shape mismatches.
    pub fn parse(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("HTTP {status} ({code:?}): {}", .message.as_deref().unwrap_or("<no message>"))]
pub struct ApiException {
    pub status: u16,
    pub code: ErrorCode,
    pub message: Option<String>,
}

impl ApiException {
    pub fn new(status: u16, body: ErrorBody) -> Self {
        Self {
            status,
            code: ErrorCode::from_status(status),
            message: body.message,
        }
    }
}
