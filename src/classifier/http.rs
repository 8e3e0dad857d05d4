//! HTTP implementation of the classifier service.
//!
//! Posts the classify request as JSON and maps transport and status failures
//! onto the retryable/rejected split the session lifecycle reports upward.

use anyhow::{Context, Result};
use std::time::Duration;

use super::{ClassifierService, ClassifyError, ClassifyRequest};
use crate::analysis::RawAnalysis;
use crate::config::ClassifierConfig;

pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build classifier HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/classify", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait::async_trait]
impl ClassifierService for HttpClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<RawAnalysis, ClassifyError> {
        tracing::debug!(
            session_id = %request.session_id,
            endpoint = %self.endpoint,
            inline = request.audio_b64.is_some(),
            "Sending classify request"
        );

        let response = match self.client.post(&self.endpoint).json(request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let message = if e.is_connect() {
                    "failed to connect to the classification service".to_string()
                } else if e.is_timeout() {
                    "the classification service did not respond in time".to_string()
                } else {
                    format!("network error: {e}")
                };
                return Err(ClassifyError::Transient(message));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());

            // 4xx payload complaints mean the audio itself was refused, most
            // often an unsupported encoding; everything else is retryable.
            return Err(match status.as_u16() {
                400 | 415 | 422 => ClassifyError::PayloadRejected(body),
                429 => ClassifyError::Transient(
                    "the classification service is rate limiting requests".to_string(),
                ),
                _ => ClassifyError::Transient(format!("service error (status {status}): {body}")),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClassifyError::Transient(format!("failed to read response: {e}")))?;

        serde_json::from_slice::<RawAnalysis>(&body).map_err(|e| {
            ClassifyError::Transient(format!("unrecognized classifier response shape: {e}"))
        })
    }
}
