/// SNS subscription confirmation
use crate::error::MailguardError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// What the SubscribeURL answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResponse {
    pub status: u16,
    pub body: String,
}

impl ConfirmationResponse {
    pub fn is_confirmed(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait SubscriptionConfirmer: Send + Sync {
    /// Call back the SubscribeURL from a `SubscriptionConfirmation` payload
    ///
    /// Transport failures are errors; any HTTP answer is a response.
    async fn confirm(&self, subscribe_url: &str) -> Result<ConfirmationResponse, MailguardError>;
}

/// Confirms subscriptions with a plain HTTP GET
pub struct HttpSubscriptionConfirmer {
    client: reqwest::Client,
}

impl HttpSubscriptionConfirmer {
    pub fn new(timeout: Duration) -> Result<Self, MailguardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MailguardError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SubscriptionConfirmer for HttpSubscriptionConfirmer {
    async fn confirm(&self, subscribe_url: &str) -> Result<ConfirmationResponse, MailguardError> {
        let response = self
            .client
            .get(subscribe_url)
            .send()
            .await
            .map_err(|e| MailguardError::Subscription(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| MailguardError::Subscription(format!("Failed to read response: {}", e)))?;

        debug!(status = status, "SubscribeURL answered");

        Ok(ConfirmationResponse { status, body })
    }
}
