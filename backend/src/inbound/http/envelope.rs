//! JSON envelope shared by every registration reply.
//!
//! Success replies carry `message` and `metadata`. Failure replies carry
//! `error`, the machine-readable `code`, the request `traceId`, and optional
//! `details`. Absent members are omitted.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Error, ErrorCode};

/// Response envelope.
///
/// # Examples
/// ```
/// use hostwatch::inbound::http::ApiResponse;
/// use serde_json::json;
///
/// let body = ApiResponse::success("User created successfully!", json!({ "id": "1" }));
/// assert_eq!(
///     serde_json::to_value(&body).expect("serialise"),
///     json!({ "message": "User created successfully!", "metadata": { "id": "1" } })
/// );
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, metadata: T) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
            metadata: Some(metadata),
            code: None,
            trace_id: None,
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Render a domain error as sent to the client.
    pub fn failure(error: &Error) -> Self {
        Self {
            message: None,
            error: Some(error.message().to_owned()),
            metadata: None,
            code: Some(error.code()),
            trace_id: error.trace_id().map(str::to_owned),
            details: error.details().cloned(),
        }
    }
}
