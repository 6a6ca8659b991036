//! Core domain types for the caseflow escalation engine.
//!
//! This crate defines the complaint and audit-history records shared across
//! the workspace, the configuration surface consumed by the engine and
//! scheduler, and the engine-facing error taxonomy.

pub mod complaint;
pub mod config;
pub mod error;
pub mod history;

pub use complaint::{Complaint, ComplaintId, ComplaintStatus, Priority};
pub use config::{EscalationConfig, SchedulerConfig, SlaPolicyConfig};
pub use error::{Error, Result};
pub use history::{EntryKind, EscalationEntry};
