//! Notification channels for delivering escalation notices.

pub mod console;
pub mod memory;

#[cfg(feature = "webhook")]
pub mod webhook;

#[cfg(feature = "email")]
pub mod email;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::notice::EscalationNotice;

pub use console::ConsoleChannel;
pub use memory::MemoryChannel;

#[cfg(feature = "webhook")]
pub use webhook::WebhookChannel;

#[cfg(feature = "email")]
pub use email::EmailChannel;

/// Outbound port for escalation notices.
///
/// The engine's decision logic depends only on this trait; tests inject
/// a [`MemoryChannel`] and assert on the notices captured.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel name.
    fn name(&self) -> &str;

    /// Get the channel type.
    fn channel_type(&self) -> &str;

    /// Check if the channel is enabled.
    fn is_enabled(&self) -> bool;

    /// Deliver a notice through this channel.
    async fn send(&self, notice: &EscalationNotice) -> Result<()>;
}

/// Registry of named notification channels.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Arc<dyn NotificationChannel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a channel instance under its own name.
    pub async fn register(&self, channel: Arc<dyn NotificationChannel>) {
        let name = channel.name().to_string();
        self.channels.write().await.insert(name, channel);
    }

    /// Unregister a channel by name.
    pub async fn unregister(&self, name: &str) -> bool {
        self.channels.write().await.remove(name).is_some()
    }

    /// Get a channel by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn NotificationChannel>> {
        self.channels.read().await.get(name).cloned()
    }

    /// List all channel names.
    pub async fn list_names(&self) -> Vec<String> {
        self.channels.read().await.keys().cloned().collect()
    }

    /// All registered channels.
    pub async fn all(&self) -> Vec<Arc<dyn NotificationChannel>> {
        self.channels.read().await.values().cloned().collect()
    }

    /// Get the number of channels.
    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Check if empty.
    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
