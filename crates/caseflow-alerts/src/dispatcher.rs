//! Best-effort fan-out of notices to every registered channel.

use std::sync::Arc;

use crate::channels::ChannelRegistry;
use crate::notice::EscalationNotice;

/// Dispatches notices to all enabled channels.
///
/// Delivery is best-effort: a channel failure is logged and swallowed,
/// never surfaced to the caller. Persistence remains the source of truth;
/// the engine calls this only after the escalation is already recorded.
pub struct Dispatcher {
    registry: Arc<ChannelRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Send the notice to every enabled channel. Returns how many channels
    /// accepted it.
    pub async fn dispatch(&self, notice: &EscalationNotice) -> usize {
        let mut delivered = 0;

        for channel in self.registry.all().await {
            if !channel.is_enabled() {
                continue;
            }
            match channel.send(notice).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!(
                        channel = channel.name(),
                        complaint_id = %notice.complaint_id,
                        level = notice.level,
                        "Escalation notice delivered"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.name(),
                        complaint_id = %notice.complaint_id,
                        level = notice.level,
                        error = %e,
                        "Escalation notice delivery failed"
                    );
                }
            }
        }

        delivered
    }
}
