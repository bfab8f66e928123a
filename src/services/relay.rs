use crate::config::DeliveryConfig;
use crate::domain::submission::ContactSubmission;
use crate::error::ErrorCode;
use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const RELAY_SUBJECT: &str = "New Contact Form Submission - Neblina";
const RELAY_FROM_NAME: &str = "Neblina Contact Form";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("missing required configuration: {0}")]
    MissingConfiguration(&'static str),
    #[error("relay request timed out")]
    Timeout,
    #[error("unable to reach email service")]
    Network(#[source] reqwest::Error),
    #[error("invalid response from email service: {0}")]
    InvalidResponse(String),
    #[error("email service rejected the submission: {0}")]
    Rejected(String),
}

impl DeliveryError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingConfiguration(_) => ErrorCode::ConfigurationError,
            Self::Timeout | Self::Network(_) | Self::InvalidResponse(_) => ErrorCode::ServiceUnavailable,
            Self::Rejected(_) => ErrorCode::InternalError,
        }
    }

    #[must_use]
    pub const fn reason_label(&self) -> &'static str {
        match self {
            Self::MissingConfiguration(_) => "configuration",
            Self::Timeout => "timeout",
            Self::Network(_) => "network",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Rejected(_) => "rejected",
        }
    }
}

#[async_trait]
pub trait MailRelay: Send + Sync + std::fmt::Debug {
    /// Hands a validated submission to the external relay for delivery.
    ///
    /// # Errors
    /// Returns a [`DeliveryError`] classifying timeouts, transport failures,
    /// malformed relay responses, and explicit rejections.
    async fn deliver(&self, access_key: &str, submission: &ContactSubmission) -> Result<(), DeliveryError>;
}

#[derive(Debug, Serialize)]
struct Web3FormsPayload<'a> {
    access_key: &'a str,
    subject: &'static str,
    from_name: &'static str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
    replyto: &'a str,
}

#[derive(Debug, Deserialize)]
struct Web3FormsResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Delivery via the Web3Forms submission API. The receiving inbox is bound
/// to the access key on the Web3Forms side, so the payload carries no
/// recipient address.
#[derive(Clone, Debug)]
pub struct Web3FormsRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl Web3FormsRelay {
    /// Builds the relay client with the configured request timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &DeliveryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { client, endpoint: config.api_url.clone() })
    }
}

#[async_trait]
impl MailRelay for Web3FormsRelay {
    async fn deliver(&self, access_key: &str, submission: &ContactSubmission) -> Result<(), DeliveryError> {
        let payload = Web3FormsPayload {
            access_key,
            subject: RELAY_SUBJECT,
            from_name: RELAY_FROM_NAME,
            name: &submission.name,
            email: &submission.email,
            message: &submission.message,
            replyto: &submission.email,
        };

        tracing::debug!(endpoint = %self.endpoint, "forwarding contact submission to relay");

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| if e.is_timeout() { DeliveryError::Timeout } else { DeliveryError::Network(e) })?;

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        if !is_json {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            tracing::error!(body = %snippet, "relay returned a non-JSON response");
            return Err(DeliveryError::InvalidResponse("unexpected content type".to_owned()));
        }

        let body: Web3FormsResponse = response
            .json()
            .await
            .map_err(|_| DeliveryError::InvalidResponse("malformed JSON body".to_owned()))?;

        if body.success {
            Ok(())
        } else {
            let reason = body.message.unwrap_or_else(|| "no reason given".to_owned());
            tracing::error!(reason = %reason, "relay rejected the submission");
            Err(DeliveryError::Rejected(reason))
        }
    }
}
