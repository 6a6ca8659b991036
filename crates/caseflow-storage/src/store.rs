//! The persistence boundary consumed by the escalation engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use caseflow_core::{Complaint, ComplaintId, ComplaintStatus, EscalationEntry};

use crate::error::Result;

/// Narrow persistence interface for the escalation engine.
///
/// The relational schema behind it is owned by the surrounding CRUD
/// system; the engine only needs open-complaint reads, the two atomic
/// audit mutations, and history queries.
///
/// `record_escalation` and `record_assignment` are the only paths that
/// write levels or history rows. Implementations must make each of them
/// atomic per complaint (one transaction or one critical section), which
/// is what keeps a manual escalation racing a sweep from double-
/// incrementing or diverging history from the stored level.
#[async_trait]
pub trait EscalationStore: Send + Sync {
    /// Insert a new complaint. Fails if the ID already exists.
    async fn insert_complaint(&self, complaint: &Complaint) -> Result<()>;

    /// Fetch one complaint by ID.
    async fn complaint(&self, id: &ComplaintId) -> Result<Option<Complaint>>;

    /// All complaints with status other than resolved.
    async fn open_complaints(&self) -> Result<Vec<Complaint>>;

    /// All complaints, regardless of status. Used for aggregates.
    async fn all_complaints(&self) -> Result<Vec<Complaint>>;

    /// Update a complaint's workflow status. Escalation state is left
    /// untouched; a reopened complaint re-enters the candidate set with
    /// whatever level it already carries.
    async fn set_status(&self, id: &ComplaintId, status: ComplaintStatus) -> Result<()>;

    /// Atomically advance the escalation level by exactly 1, stamp
    /// `last_escalated_at`, and append the matching history entry.
    ///
    /// When `expected_level` is given, the write only applies if the
    /// current level still matches; otherwise it fails with `Conflict`.
    /// The sweep passes its snapshot level here so a manual escalation
    /// landing mid-sweep invalidates the sweep's write instead of
    /// stacking on top of it. Manual escalations pass `None`.
    ///
    /// Returns the updated complaint. Fails with `NotFound` if the
    /// complaint does not exist and `AlreadyResolved` if its status is
    /// resolved.
    async fn record_escalation(
        &self,
        id: &ComplaintId,
        at: DateTime<Utc>,
        reason: &str,
        expected_level: Option<u32>,
    ) -> Result<Complaint>;

    /// Set the assignee and append an assignment audit entry. Never
    /// touches the escalation level.
    async fn record_assignment(
        &self,
        id: &ComplaintId,
        assignee: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Complaint>;

    /// Audit history for one complaint, ordered by creation.
    async fn history(&self, id: &ComplaintId) -> Result<Vec<EscalationEntry>>;
}
