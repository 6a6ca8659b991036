//! Notification port for the caseflow escalation engine.
//!
//! The engine decides *that* a notice goes out and *to whom*; this crate
//! owns the payload ([`EscalationNotice`]), the urgency/tier grading, the
//! channel abstraction, and the best-effort [`Dispatcher`].
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `webhook` | no | Webhook channel via reqwest |
//! | `email` | no | SMTP channel via lettre |

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod notice;

pub use channels::{ChannelRegistry, ConsoleChannel, MemoryChannel, NotificationChannel};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use notice::{EscalationNotice, RecipientTier, Urgency};

#[cfg(feature = "webhook")]
pub use channels::WebhookChannel;

#[cfg(feature = "email")]
pub use channels::EmailChannel;
