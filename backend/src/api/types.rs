//! REST API types for dashboard clients.
//!
//! The parsed document is returned as-is; collaborators own any further
//! lifecycle (sent, received, processed).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ServerError;
use crate::models::ParsedDocument;
use crate::summary::summarize;

/// Response sent to the client after an EDI file is parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    /// Unique job identifier
    pub job_id: String,

    /// When the server finished parsing
    pub processed_at: DateTime<Utc>,

    /// Fixed-format text summary
    pub summary: String,

    /// The parsed document with segments and diagnostics
    pub document: ParsedDocument,
}

impl From<ParsedDocument> for ParseResponse {
    fn from(document: ParsedDocument) -> Self {
        ParseResponse {
            job_id: Uuid::new_v4().to_string(),
            processed_at: Utc::now(),
            summary: summarize(&document),
            document,
        }
    }
}

/// JSON body for parsing text that is already in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParseRequest {
    pub file_name: String,
    pub content: String,
}

/// One entry of the segment dictionary listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentInfo {
    pub tag: String,
    pub description: String,
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServerError::Ingest(inner) => inner.to_string(),
            other => other.to_string(),
        };
        (self.status_code(), Json(error_response(&message))).into_response()
    }
}
