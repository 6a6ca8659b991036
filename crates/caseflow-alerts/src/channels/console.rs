//! Console notification channel.

use async_trait::async_trait;

use super::NotificationChannel;
use crate::error::{Error, Result};
use crate::notice::EscalationNotice;

/// Console channel that logs notices through tracing.
#[derive(Debug, Clone)]
pub struct ConsoleChannel {
    name: String,
    enabled: bool,
}

impl ConsoleChannel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            enabled: true,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "console"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &EscalationNotice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        let tiers: Vec<&str> = notice.tiers.iter().map(|t| t.as_str()).collect();
        tracing::info!(
            complaint_id = %notice.complaint_id,
            subject = %notice.subject,
            priority = %notice.priority,
            level = notice.level,
            hours_overdue = notice.hours_overdue,
            urgency = %notice.urgency,
            tiers = ?tiers,
            "Escalation notice: {}",
            notice.reason
        );
        Ok(())
    }
}
