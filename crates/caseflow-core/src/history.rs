//! Append-only escalation audit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::complaint::ComplaintId;

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A level increment, automatic or manual.
    Escalation,
    /// An operator assigning the complaint to an admin. Carries the level
    /// current at the time but does not participate in the
    /// strictly-increasing level sequence.
    Assignment,
}

/// One audit row. Entries are created only by the engine and never mutated
/// or deleted.
///
/// Invariant: for a given complaint, `Escalation` entries ordered by
/// `created_at` have strictly increasing `level`, and the complaint's
/// current `escalation_level` equals the `level` of its most recent
/// `Escalation` entry (or 0 if none exist).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// The complaint this entry belongs to.
    pub complaint_id: ComplaintId,
    /// The level reached by (or current at) this entry.
    pub level: u32,
    /// What happened.
    pub kind: EntryKind,
    /// Breach magnitude or operator attribution, free text.
    pub reason: String,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

impl EscalationEntry {
    pub fn escalation(
        complaint_id: ComplaintId,
        level: u32,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            complaint_id,
            level,
            kind: EntryKind::Escalation,
            reason: reason.into(),
            created_at,
        }
    }

    pub fn assignment(
        complaint_id: ComplaintId,
        level: u32,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            complaint_id,
            level,
            kind: EntryKind::Assignment,
            reason: reason.into(),
            created_at,
        }
    }
}
