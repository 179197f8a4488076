//! Multipart HTTP implementation of the submission gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{
    NETWORK_FAILURE_MESSAGE, REJECTION_FALLBACK_MESSAGE, SubmissionGateway, SubmissionRequest,
    SubmissionResult,
};
use crate::config::{Config, join_url};
use crate::error::SubmissionError;
use crate::onboarding::draft::{DraftSnapshot, FileHandle, Value};

/// Posts the draft as `multipart/form-data`: scalars as text parts, files as
/// binary parts named after their field.
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSubmissionGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SubmissionError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    fn url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    async fn try_submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<Option<serde_json::Value>, SubmissionError> {
        let form = build_form(&request.fields).await?;

        let resp = self
            .client
            .post(self.url(&request.endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        let json = serde_json::from_str::<serde_json::Value>(&body).ok();

        if !status.is_success() {
            let message = json
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(String::from);
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(json)
    }

    fn classify(&self, err: reqwest::Error) -> SubmissionError {
        if err.is_timeout() {
            SubmissionError::Timeout(self.timeout)
        } else {
            SubmissionError::Network(err)
        }
    }
}

#[async_trait]
impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, request: SubmissionRequest) -> SubmissionResult {
        tracing::info!(
            role = %request.role,
            endpoint = %request.endpoint,
            fields = request.fields.len(),
            "Submitting onboarding draft"
        );

        match self.try_submit(&request).await {
            Ok(response) => {
                let id = response.as_ref().and_then(extract_id);
                tracing::info!(role = %request.role, id = ?id, "Onboarding submission accepted");
                SubmissionResult::succeeded(id, response)
            }
            Err(SubmissionError::Rejected { status, message }) => {
                tracing::warn!(
                    role = %request.role,
                    status,
                    message = ?message,
                    "Onboarding submission rejected"
                );
                SubmissionResult::failed(
                    message.unwrap_or_else(|| REJECTION_FALLBACK_MESSAGE.to_string()),
                )
            }
            Err(e @ SubmissionError::Attachment { .. }) => {
                tracing::warn!(role = %request.role, "Onboarding submission aborted: {}", e);
                SubmissionResult::failed(e.to_string())
            }
            Err(e) => {
                tracing::warn!(role = %request.role, "Onboarding submission failed: {}", e);
                SubmissionResult::failed(NETWORK_FAILURE_MESSAGE)
            }
        }
    }
}

/// Build the multipart body. Lists travel comma-joined and booleans as
/// `true`/`false`, matching what a browser form post would send.
pub(crate) async fn build_form(fields: &DraftSnapshot) -> Result<Form, SubmissionError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            Value::Text(s) => form.text(name.clone(), s.clone()),
            Value::Bool(b) => form.text(name.clone(), b.to_string()),
            Value::List(items) => form.text(name.clone(), items.join(",")),
            Value::File(handle) => form.part(name.clone(), file_part(name, handle).await?),
        };
    }
    Ok(form)
}

async fn file_part(field: &str, handle: &FileHandle) -> Result<Part, SubmissionError> {
    let bytes = tokio::fs::read(handle.path())
        .await
        .map_err(|source| SubmissionError::Attachment {
            field: field.to_string(),
            source,
        })?;
    let part = Part::bytes(bytes).file_name(handle.name().to_string());
    if !looks_like_media_type(handle.media_type()) {
        tracing::debug!(field, media_type = handle.media_type(), "Sending attachment without media type");
        return Ok(part);
    }
    part.mime_str(handle.media_type())
        .map_err(|e| SubmissionError::Attachment {
            field: field.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        })
}

fn looks_like_media_type(s: &str) -> bool {
    match s.split_once('/') {
        Some((kind, sub)) => {
            !kind.is_empty()
                && !sub.is_empty()
                && !sub.contains('/')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn extract_id(body: &serde_json::Value) -> Option<String> {
    ["id", "_id"]
        .iter()
        .filter_map(|key| body.get(*key))
        .chain(body.get("user").and_then(|u| u.get("id")))
        .find_map(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_id_variants() {
        assert_eq!(
            extract_id(&serde_json::json!({"id": "abc"})),
            Some("abc".to_string())
        );
        assert_eq!(extract_id(&serde_json::json!({"_id": 42})), Some("42".to_string()));
        assert_eq!(
            extract_id(&serde_json::json!({"user": {"id": "u-1"}})),
            Some("u-1".to_string())
        );
        assert_eq!(extract_id(&serde_json::json!({"ok": true})), None);
    }

    #[test]
    fn url_joins_endpoint() {
        let gateway = HttpSubmissionGateway::new("http://api.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            gateway.url("/api/patients/onboarding"),
            "http://api.test/api/patients/onboarding"
        );
    }

    #[test]
    fn media_type_shape() {
        assert!(looks_like_media_type("application/pdf"));
        assert!(looks_like_media_type("image/png"));
        assert!(!looks_like_media_type("pdf"));
        assert!(!looks_like_media_type("image/"));
        assert!(!looks_like_media_type("a/b/c"));
    }

    #[tokio::test]
    async fn missing_attachment_is_reported() {
        let mut fields = DraftSnapshot::new();
        fields.insert(
            "govId".into(),
            Value::File(FileHandle::new("/definitely/not/here.pdf", "here.pdf", 1, "application/pdf")),
        );
        let err = build_form(&fields).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Attachment { field, .. } if field == "govId"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_network_message() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let gateway = HttpSubmissionGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let request = SubmissionRequest {
            role: crate::onboarding::registry::Role::Patient,
            endpoint: "/api/patients/onboarding".into(),
            fields: DraftSnapshot::new(),
        };
        let result = gateway.submit(request).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(NETWORK_FAILURE_MESSAGE));
    }
}
