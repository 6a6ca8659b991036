//! Webhook notification channel.

use async_trait::async_trait;
use std::collections::HashMap;

use super::NotificationChannel;
use crate::error::{Error, Result};
use crate::notice::EscalationNotice;

/// Webhook channel that POSTs the notice as JSON.
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    name: String,
    enabled: bool,
    url: String,
    headers: HashMap<String, String>,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            enabled: true,
            url,
            headers: HashMap::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Add a header to the webhook request.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set all headers for the webhook request.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Disable the channel.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "webhook"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &EscalationNotice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        let mut request = self.client.post(&self.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request
            .json(notice)
            .send()
            .await
            .map_err(|e| Error::SendFailed(format!("Webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::SendFailed(format!(
                "Webhook returned error: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
