//! Email notification channel via SMTP.

use async_trait::async_trait;

use super::NotificationChannel;
use crate::error::{Error, Result};
use crate::notice::{EscalationNotice, RecipientTier};

/// Email channel. Recipient addresses are grouped by tier; a notice is
/// sent to the union of the addresses for the tiers it names.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    name: String,
    enabled: bool,
    smtp_server: String,
    smtp_port: u16,
    username: String,
    password: String,
    from_address: String,
    admin_addresses: Vec<String>,
    superadmin_addresses: Vec<String>,
}

impl EmailChannel {
    pub fn new(
        name: String,
        smtp_server: String,
        smtp_port: u16,
        username: String,
        password: String,
        from_address: String,
    ) -> Self {
        Self {
            name,
            enabled: true,
            smtp_server,
            smtp_port,
            username,
            password,
            from_address,
            admin_addresses: Vec::new(),
            superadmin_addresses: Vec::new(),
        }
    }

    /// Add an admin-tier recipient.
    pub fn add_admin(mut self, address: String) -> Self {
        self.admin_addresses.push(address);
        self
    }

    /// Add a superadmin-tier recipient.
    pub fn add_superadmin(mut self, address: String) -> Self {
        self.superadmin_addresses.push(address);
        self
    }

    /// Disable the channel.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn recipients_for(&self, notice: &EscalationNotice) -> Vec<&String> {
        let mut recipients: Vec<&String> = Vec::new();
        for tier in &notice.tiers {
            let pool = match tier {
                RecipientTier::Admin => &self.admin_addresses,
                RecipientTier::Superadmin => &self.superadmin_addresses,
            };
            for addr in pool {
                if !recipients.contains(&addr) {
                    recipients.push(addr);
                }
            }
        }
        recipients
    }

    fn build_body(&self, notice: &EscalationNotice) -> String {
        format!(
            "Complaint {} escalated to level {}.\n\n\
             Subject: {}\nPriority: {}\nUrgency: {}\nOverdue: {}h\n\n{}",
            notice.complaint_id,
            notice.level,
            notice.subject,
            notice.priority,
            notice.urgency,
            notice.hours_overdue,
            notice.reason,
        )
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &EscalationNotice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        let recipients = self.recipients_for(notice);
        if recipients.is_empty() {
            return Err(Error::SendFailed("No recipients configured".to_string()));
        }

        let from_mailbox: lettre::message::Mailbox = self
            .from_address
            .parse()
            .map_err(|e| Error::SendFailed(format!("Invalid from address: {}", e)))?;

        let subject = format!(
            "[{}] Complaint escalated to level {}: {}",
            notice.urgency, notice.level, notice.subject
        );

        let mut builder = lettre::Message::builder()
            .from(from_mailbox)
            .subject(subject);
        for addr in recipients {
            let mailbox: lettre::message::Mailbox = addr
                .parse()
                .map_err(|e| Error::SendFailed(format!("Invalid to address: {}", e)))?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .body(self.build_body(notice))
            .map_err(|e| Error::SendFailed(format!("Failed to build email: {}", e)))?;

        let smtp_server = self.smtp_server.clone();
        let smtp_port = self.smtp_port;
        let username = self.username.clone();
        let password = self.password.clone();

        tokio::task::spawn_blocking(move || {
            let creds =
                lettre::transport::smtp::authentication::Credentials::new(username, password);
            let mailer = lettre::SmtpTransport::relay(&smtp_server)
                .map_err(|e| Error::SendFailed(format!("Invalid SMTP server: {}", e)))?
                .port(smtp_port)
                .credentials(creds)
                .build();

            lettre::Transport::send(&mailer, &email)
                .map_err(|e| Error::SendFailed(format!("Failed to send email: {}", e)))?;

            Ok::<(), Error>(())
        })
        .await
        .map_err(|e| Error::SendFailed(format!("Send task failed: {}", e)))??;

        Ok(())
    }
}
