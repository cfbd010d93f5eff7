//! HTTP client for the claim analysis service.
//!
//! The service takes the raw document as a `text/plain` POST body and answers
//! with a JSON array of claims. Every failure is mapped onto [`ClaimsError`]
//! so the page can show it instead of failing the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;

use super::ClaimAnalyzer;
use crate::config::ApiConfig;
use crate::domain::ClaimAnalysisResult;

/// Content type of the request body
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const USER_AGENT: &str = concat!("sciclaims/", env!("CARGO_PKG_VERSION"));

/// Bytes of an error body kept for the error message
const ERROR_BODY_PREVIEW: usize = 200;

/// Claim analysis failures
#[derive(Debug, Clone, Error)]
pub enum ClaimsError {
    #[error("Claim analysis request failed: {0}")]
    Transport(String),

    #[error("Claim analysis request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Claim analysis service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode claim analysis response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ClaimsError {
    /// Short machine-readable kind, used in logs and on the page
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimsError::Transport(_) => "transport",
            ClaimsError::Timeout(_) => "timeout",
            ClaimsError::Status { .. } => "status",
            ClaimsError::Decode(_) => "decode",
            ClaimsError::Client(_) => "client",
        }
    }
}

/// Claim analysis over HTTP
pub struct ClaimsApiClient {
    endpoint: String,
    timeout: Duration,
    client: Client,
}

impl ClaimsApiClient {
    /// Build a client for the configured endpoint
    ///
    /// Certificate validation stays on unless `accept_invalid_certs` is set.
    pub fn new(config: &ApiConfig) -> Result<Self, ClaimsError> {
        if config.accept_invalid_certs {
            tracing::warn!(
                endpoint = %config.claims,
                "TLS certificate validation is DISABLED for the claim analysis endpoint"
            );
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClaimsError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: config.claims.clone(),
            timeout: config.timeout(),
            client,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ClaimsError {
        if err.is_timeout() {
            ClaimsError::Timeout(self.timeout)
        } else if err.is_decode() {
            ClaimsError::Decode(err.to_string())
        } else {
            ClaimsError::Transport(err.to_string())
        }
    }
}

fn preview(body: &str) -> String {
    if body.len() <= ERROR_BODY_PREVIEW {
        return body.to_string();
    }
    let mut end = ERROR_BODY_PREVIEW;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait]
impl ClaimAnalyzer for ClaimsApiClient {
    fn name(&self) -> &str {
        "claims-api"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn analyze(&self, text: &str) -> Result<ClaimAnalysisResult, ClaimsError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            chars = text.chars().count(),
            "Sending text for claim analysis"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
            .body(text.to_owned())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(ClaimsError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let result: ClaimAnalysisResult =
            serde_json::from_str(&body).map_err(|e| ClaimsError::Decode(e.to_string()))?;

        tracing::info!(
            endpoint = %self.endpoint,
            claims = result.len(),
            "Claim analysis completed"
        );

        Ok(result)
    }
}
