//! In-memory store backend.
//!
//! The default backend and the test double. The write lock is the
//! atomicity unit: every mutation takes it once and releases it with the
//! complaint and its history already consistent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use caseflow_core::{Complaint, ComplaintId, ComplaintStatus, EscalationEntry};

use crate::error::{Error, Result};
use crate::store::EscalationStore;

/// In-memory `EscalationStore` backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    complaints: HashMap<ComplaintId, Complaint>,
    history: HashMap<ComplaintId, Vec<EscalationEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of complaints held. Test helper.
    pub async fn len(&self) -> usize {
        self.inner.read().await.complaints.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.complaints.is_empty()
    }
}

impl Inner {
    fn open_mut(&mut self, id: &ComplaintId) -> Result<&mut Complaint> {
        let complaint = self
            .complaints
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if !complaint.is_open() {
            return Err(Error::AlreadyResolved(id.to_string()));
        }
        Ok(complaint)
    }
}

#[async_trait]
impl EscalationStore for MemoryStore {
    async fn insert_complaint(&self, complaint: &Complaint) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.complaints.contains_key(&complaint.id) {
            return Err(Error::Storage(format!(
                "complaint {} already exists",
                complaint.id
            )));
        }
        inner.complaints.insert(complaint.id.clone(), complaint.clone());
        Ok(())
    }

    async fn complaint(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        Ok(self.inner.read().await.complaints.get(id).cloned())
    }

    async fn open_complaints(&self) -> Result<Vec<Complaint>> {
        let inner = self.inner.read().await;
        let mut open: Vec<Complaint> = inner
            .complaints
            .values()
            .filter(|c| c.is_open())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(open)
    }

    async fn all_complaints(&self) -> Result<Vec<Complaint>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Complaint> = inner.complaints.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn set_status(&self, id: &ComplaintId, status: ComplaintStatus) -> Result<()> {
        let mut inner = self.inner.write().await;
        let complaint = inner
            .complaints
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        complaint.status = status;
        Ok(())
    }

    async fn record_escalation(
        &self,
        id: &ComplaintId,
        at: DateTime<Utc>,
        reason: &str,
        expected_level: Option<u32>,
    ) -> Result<Complaint> {
        let mut inner = self.inner.write().await;
        let complaint = inner.open_mut(id)?;

        if let Some(expected) = expected_level {
            if complaint.escalation_level != expected {
                return Err(Error::Conflict(id.to_string()));
            }
        }

        complaint.escalation_level += 1;
        complaint.last_escalated_at = Some(at);
        let updated = complaint.clone();

        inner
            .history
            .entry(id.clone())
            .or_default()
            .push(EscalationEntry::escalation(
                id.clone(),
                updated.escalation_level,
                reason,
                at,
            ));

        Ok(updated)
    }

    async fn record_assignment(
        &self,
        id: &ComplaintId,
        assignee: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Complaint> {
        let mut inner = self.inner.write().await;
        let complaint = inner.open_mut(id)?;

        complaint.assigned_to = Some(assignee.to_string());
        let updated = complaint.clone();

        inner
            .history
            .entry(id.clone())
            .or_default()
            .push(EscalationEntry::assignment(
                id.clone(),
                updated.escalation_level,
                reason,
                at,
            ));

        Ok(updated)
    }

    async fn history(&self, id: &ComplaintId) -> Result<Vec<EscalationEntry>> {
        Ok(self
            .inner
            .read()
            .await
            .history
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_core::{EntryKind, Priority};

    fn seed() -> Complaint {
        Complaint::new("slow refund", Priority::High, Utc::now())
    }

    #[tokio::test]
    async fn escalation_increments_and_appends() {
        let store = MemoryStore::new();
        let c = seed();
        store.insert_complaint(&c).await.unwrap();

        let now = Utc::now();
        let updated = store.record_escalation(&c.id, now, "SLA breach", None).await.unwrap();
        assert_eq!(updated.escalation_level, 1);
        assert_eq!(updated.last_escalated_at, Some(now));

        let history = store.history(&c.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].level, 1);
        assert_eq!(history[0].kind, EntryKind::Escalation);
    }

    #[tokio::test]
    async fn escalating_resolved_complaint_fails() {
        let store = MemoryStore::new();
        let c = seed();
        store.insert_complaint(&c).await.unwrap();
        store.set_status(&c.id, ComplaintStatus::Resolved).await.unwrap();

        let err = store
            .record_escalation(&c.id, Utc::now(), "SLA breach", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyResolved(_)));
        assert!(store.history(&c.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn assignment_leaves_level_untouched() {
        let store = MemoryStore::new();
        let c = seed();
        store.insert_complaint(&c).await.unwrap();
        store.record_escalation(&c.id, Utc::now(), "SLA breach", None).await.unwrap();

        let updated = store
            .record_assignment(&c.id, "alice", "Assigned by root", Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.escalation_level, 1);
        assert_eq!(updated.assigned_to.as_deref(), Some("alice"));

        let history = store.history(&c.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].kind, EntryKind::Assignment);
        assert_eq!(history[1].level, 1);
    }

    #[tokio::test]
    async fn open_complaints_excludes_resolved() {
        let store = MemoryStore::new();
        let a = seed();
        let b = seed();
        store.insert_complaint(&a).await.unwrap();
        store.insert_complaint(&b).await.unwrap();
        store.set_status(&b.id, ComplaintStatus::Resolved).await.unwrap();

        let open = store.open_complaints().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, a.id);
        assert_eq!(store.all_complaints().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let c = seed();
        store.insert_complaint(&c).await.unwrap();
        assert!(store.insert_complaint(&c).await.is_err());
    }
}
