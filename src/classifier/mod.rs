mod http;

pub use http::HttpClassifier;

use base64::Engine;
use serde::Serialize;

use crate::analysis::RawAnalysis;

/// Request sent to the classification service: a signed reference to the
/// stored audio, or the bytes inline for deployments that cannot fetch URLs.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
    pub content_type: String,
}

impl ClassifyRequest {
    pub fn from_url(
        session_id: impl Into<String>,
        audio_url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            audio_url: Some(audio_url.into()),
            audio_b64: None,
            content_type: content_type.into(),
        }
    }

    pub fn from_bytes(
        session_id: impl Into<String>,
        bytes: &[u8],
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            audio_url: None,
            audio_b64: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            content_type: content_type.into(),
        }
    }
}

/// Classification failures, split so callers can tell the user whether to
/// retry or to re-record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    /// The service refused the payload (typically an unsupported audio
    /// encoding). Retrying the same bytes will not help.
    #[error("the classifier rejected this recording: {0}")]
    PayloadRejected(String),

    /// Network or service trouble. Safe to retry.
    #[error("the classifier is unavailable: {0}")]
    Transient(String),
}

/// The opaque external inference endpoint.
#[async_trait::async_trait]
pub trait ClassifierService: Send + Sync {
    async fn classify(&self, request: &ClassifyRequest) -> Result<RawAnalysis, ClassifyError>;
}
