//! HTTP client for the remote detection service
//!
//! The service provides higher-accuracy detection and redaction. Every error
//! here is recoverable: the merger falls back to local detection and the user
//! never sees a hard failure.

use crate::config::RemoteConfig;
use crate::domain::errors::RemoteError;
use crate::remote::models::{DetectRequest, RemoteDetection, ReplaceWithFakeRequest};
use crate::session::settings::LabelSettings;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Abstraction over the remote detection collaborator
///
/// The pipeline and merger depend only on this trait so tests can substitute
/// scripted implementations.
#[async_trait]
pub trait RemoteDetector: Send + Sync {
    /// `POST /detect_pii` with the raw text
    async fn detect_pii(&self, text: &str) -> Result<RemoteDetection, RemoteError>;

    /// `POST /replace_with_fake` with the text and the enabled label set
    async fn replace_with_fake(
        &self,
        text: &str,
        labels: &LabelSettings,
    ) -> Result<RemoteDetection, RemoteError>;
}

/// reqwest-based implementation of [`RemoteDetector`]
pub struct HttpRemoteDetector {
    client: Client,
    base_url: String,
}

impl HttpRemoteDetector {
    /// Create a client from configuration
    ///
    /// A request timeout is only installed when configured; by default a
    /// hanging service stalls only the issuing surface's pending session.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut builder = ClientBuilder::new().connect_timeout(Duration::from_secs(30));
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the detection service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RemoteDetection, RemoteError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<RemoteDetection>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RemoteDetector for HttpRemoteDetector {
    async fn detect_pii(&self, text: &str) -> Result<RemoteDetection, RemoteError> {
        tracing::debug!(len = text.len(), "Calling remote /detect_pii");
        self.post_json("/detect_pii", &DetectRequest { text }).await
    }

    async fn replace_with_fake(
        &self,
        text: &str,
        labels: &LabelSettings,
    ) -> Result<RemoteDetection, RemoteError> {
        let enabled_labels = labels.to_wire_map();
        tracing::debug!(
            len = text.len(),
            labels = enabled_labels.len(),
            "Calling remote /replace_with_fake"
        );
        self.post_json(
            "/replace_with_fake",
            &ReplaceWithFakeRequest {
                text,
                enabled_labels,
            },
        )
        .await
    }
}
