/// Notification delivery transports
///
/// A transport pushes a finished [`Notification`] somewhere outside the
/// process. Delivery runs off the request path, so a transport may take its
/// time or fail without affecting the task operation that produced it.

use async_trait::async_trait;
use std::time::Duration;

use crate::models::notification::Notification;

/// Delivery failure
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the receiver
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Receiver answered with a non-success status
    #[error("Receiver rejected notification with status {0}")]
    Rejected(u16),
}

/// Delivers notifications
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Short transport name for logs
    fn name(&self) -> &str;

    /// Delivers one notification
    async fn deliver(&self, notification: &Notification) -> Result<(), TransportError>;
}

/// Writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), TransportError> {
        let payload = serde_json::to_string(notification)
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        tracing::info!(
            task_id = %notification.task_id,
            assignee_id = %notification.assignee_id,
            payload = %payload,
            "Notification"
        );
        Ok(())
    }
}

/// POSTs notifications as JSON to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    client: reqwest::Client,
    url: String,
}

impl WebhookTransport {
    /// Creates a webhook transport with a 10 second request timeout
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationTransport for WebhookTransport {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
