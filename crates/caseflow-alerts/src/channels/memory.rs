//! Memory notification channel (for testing).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::NotificationChannel;
use crate::error::{Error, Result};
use crate::notice::EscalationNotice;

/// In-memory channel that captures notices for assertions.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    name: String,
    enabled: bool,
    notices: Arc<Mutex<Vec<EscalationNotice>>>,
}

impl MemoryChannel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            enabled: true,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A channel that rejects every send. Lets tests exercise the
    /// best-effort dispatch path.
    pub fn disabled(name: String) -> Self {
        Self {
            name,
            enabled: false,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn notices(&self) -> Vec<EscalationNotice> {
        self.notices.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.notices.lock().await.clear();
    }

    pub async fn count(&self) -> usize {
        self.notices.lock().await.len()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "memory"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &EscalationNotice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }
        self.notices.lock().await.push(notice.clone());
        Ok(())
    }
}
