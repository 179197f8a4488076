//! Submission gateway: hands a finished draft to the onboarding endpoint.
//!
//! The gateway never retries and never errors out to the caller: transport
//! failures and server rejections come back as a failed `SubmissionResult`
//! carrying the message to show the user.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::onboarding::draft::DraftSnapshot;
use crate::onboarding::registry::Role;

pub use http::HttpSubmissionGateway;

/// Message shown when the endpoint could not be reached.
pub const NETWORK_FAILURE_MESSAGE: &str = "Network error. Please try again.";

/// Message shown when the endpoint rejected the draft without saying why.
pub const REJECTION_FALLBACK_MESSAGE: &str = "Onboarding failed";

/// Everything the gateway needs for one submission.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub role: Role,
    /// Endpoint path relative to the API base, e.g. `/api/patients/onboarding`.
    pub endpoint: String,
    pub fields: DraftSnapshot,
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    /// Identifier assigned by the server, when it returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Message to show the user on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Parsed response body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    pub finished_at: DateTime<Utc>,
}

impl SubmissionResult {
    pub fn succeeded(id: Option<String>, response: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            id,
            error: None,
            response,
            finished_at: Utc::now(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(message.into()),
            response: None,
            finished_at: Utc::now(),
        }
    }

    /// Failure reason, falling back to the generic network text so a failed
    /// result always has something to show.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or(NETWORK_FAILURE_MESSAGE)
    }
}

/// Sends a draft snapshot to the onboarding endpoint.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, request: SubmissionRequest) -> SubmissionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_always_has_a_message() {
        let mut result = SubmissionResult::failed("DB unavailable");
        assert_eq!(result.error_message(), "DB unavailable");
        result.error = None;
        assert_eq!(result.error_message(), NETWORK_FAILURE_MESSAGE);
    }

    #[test]
    fn success_serializes_without_error() {
        let result = SubmissionResult::succeeded(Some("p-1".into()), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], "p-1");
        assert!(json.get("error").is_none());
    }
}
