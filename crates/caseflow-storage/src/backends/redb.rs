//! redb-backed store.
//!
//! Three tables: complaints keyed by ID, history rows keyed by
//! `"{complaint_id}/{seq:020}"` so a prefix range yields entries in append
//! order, and a per-complaint sequence counter. Every mutation is a single
//! write transaction; an early error drops the transaction unaborted, so
//! partial writes never become visible.

use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use caseflow_core::{Complaint, ComplaintId, ComplaintStatus, EscalationEntry};

use crate::error::{Error, Result};
use crate::store::EscalationStore;

const COMPLAINTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("complaints");
const HISTORY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("escalation_history");
const HISTORY_SEQ_TABLE: TableDefinition<&str, u64> = TableDefinition::new("escalation_history_seq");

/// Persistent `EscalationStore` backend.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        Ok(store)
    }

    /// Wrap an already-open database.
    pub fn with_database(db: Arc<Database>) -> Result<Self> {
        let store = Self { db };
        store.ensure_tables()?;
        Ok(store)
    }

    // Open each table once so first reads don't fail on a fresh file.
    fn ensure_tables(&self) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            write_txn.open_table(COMPLAINTS_TABLE)?;
            write_txn.open_table(HISTORY_TABLE)?;
            write_txn.open_table(HISTORY_SEQ_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn load_complaints(&self, include_resolved: bool) -> Result<Vec<Complaint>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COMPLAINTS_TABLE)?;

        let mut complaints = Vec::new();
        for item in table.iter()? {
            let (_key, bytes) = item?;
            let complaint: Complaint = serde_json::from_slice(bytes.value())?;
            if include_resolved || complaint.is_open() {
                complaints.push(complaint);
            }
        }

        complaints.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(complaints)
    }
}

#[async_trait]
impl EscalationStore for RedbStore {
    async fn insert_complaint(&self, complaint: &Complaint) -> Result<()> {
        let key = complaint.id.to_string();
        let value = serde_json::to_vec(complaint)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMPLAINTS_TABLE)?;
            if table.get(key.as_str())?.is_some() {
                return Err(Error::Storage(format!("complaint {} already exists", key)));
            }
            table.insert(key.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn complaint(&self, id: &ComplaintId) -> Result<Option<Complaint>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COMPLAINTS_TABLE)?;

        match table.get(id.to_string().as_str())? {
            Some(bytes) => {
                let complaint: Complaint = serde_json::from_slice(bytes.value())?;
                Ok(Some(complaint))
            }
            None => Ok(None),
        }
    }

    async fn open_complaints(&self) -> Result<Vec<Complaint>> {
        self.load_complaints(false)
    }

    async fn all_complaints(&self) -> Result<Vec<Complaint>> {
        self.load_complaints(true)
    }

    async fn set_status(&self, id: &ComplaintId, status: ComplaintStatus) -> Result<()> {
        let key = id.to_string();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMPLAINTS_TABLE)?;
            let bytes = match table.get(key.as_str())? {
                Some(guard) => guard.value().to_vec(),
                None => return Err(Error::NotFound(key)),
            };
            let mut complaint: Complaint = serde_json::from_slice(&bytes)?;
            complaint.status = status;
            let value = serde_json::to_vec(&complaint)?;
            table.insert(key.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    async fn record_escalation(
        &self,
        id: &ComplaintId,
        at: DateTime<Utc>,
        reason: &str,
        expected_level: Option<u32>,
    ) -> Result<Complaint> {
        let key = id.to_string();
        let updated;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMPLAINTS_TABLE)?;
            let bytes = match table.get(key.as_str())? {
                Some(guard) => guard.value().to_vec(),
                None => return Err(Error::NotFound(key)),
            };
            let mut complaint: Complaint = serde_json::from_slice(&bytes)?;
            if !complaint.is_open() {
                return Err(Error::AlreadyResolved(key));
            }
            if let Some(expected) = expected_level {
                if complaint.escalation_level != expected {
                    return Err(Error::Conflict(key));
                }
            }

            complaint.escalation_level += 1;
            complaint.last_escalated_at = Some(at);
            let value = serde_json::to_vec(&complaint)?;
            table.insert(key.as_str(), value.as_slice())?;
            updated = complaint;

            let entry = EscalationEntry::escalation(
                id.clone(),
                updated.escalation_level,
                reason,
                at,
            );
            append_entry(&write_txn, &key, &entry)?;
        }
        write_txn.commit()?;
        Ok(updated)
    }

    async fn record_assignment(
        &self,
        id: &ComplaintId,
        assignee: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Complaint> {
        let key = id.to_string();
        let updated;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMPLAINTS_TABLE)?;
            let bytes = match table.get(key.as_str())? {
                Some(guard) => guard.value().to_vec(),
                None => return Err(Error::NotFound(key)),
            };
            let mut complaint: Complaint = serde_json::from_slice(&bytes)?;
            if !complaint.is_open() {
                return Err(Error::AlreadyResolved(key));
            }

            complaint.assigned_to = Some(assignee.to_string());
            let value = serde_json::to_vec(&complaint)?;
            table.insert(key.as_str(), value.as_slice())?;
            updated = complaint;

            let entry = EscalationEntry::assignment(
                id.clone(),
                updated.escalation_level,
                reason,
                at,
            );
            append_entry(&write_txn, &key, &entry)?;
        }
        write_txn.commit()?;
        Ok(updated)
    }

    async fn history(&self, id: &ComplaintId) -> Result<Vec<EscalationEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;

        // '/' sorts just below '0', so this range covers exactly the
        // "{id}/..." keys.
        let start = format!("{}/", id);
        let end = format!("{}0", id);

        let mut entries = Vec::new();
        for item in table.range(start.as_str()..end.as_str())? {
            let (_key, bytes) = item?;
            let entry: EscalationEntry = serde_json::from_slice(bytes.value())?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

/// Append one history row inside an already-open write transaction.
fn append_entry(
    write_txn: &redb::WriteTransaction,
    complaint_key: &str,
    entry: &EscalationEntry,
) -> Result<()> {
    let mut seq_table = write_txn.open_table(HISTORY_SEQ_TABLE)?;
    let next = seq_table
        .get(complaint_key)?
        .map(|guard| guard.value())
        .unwrap_or(0);
    seq_table.insert(complaint_key, next + 1)?;
    drop(seq_table);

    let entry_key = format!("{}/{:020}", complaint_key, next);
    let value = serde_json::to_vec(entry)?;
    let mut history_table = write_txn.open_table(HISTORY_TABLE)?;
    history_table.insert(entry_key.as_str(), value.as_slice())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_core::{EntryKind, Priority};

    fn open_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("caseflow.redb")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn escalation_is_atomic_and_ordered() {
        let (_dir, store) = open_store();
        let c = Complaint::new("duplicate charge", Priority::Medium, Utc::now());
        store.insert_complaint(&c).await.unwrap();

        let first = store
            .record_escalation(&c.id, Utc::now(), "SLA breach: 3h overdue", None)
            .await
            .unwrap();
        let second = store
            .record_escalation(&c.id, Utc::now(), "SLA breach: 27h overdue", None)
            .await
            .unwrap();
        assert_eq!(first.escalation_level, 1);
        assert_eq!(second.escalation_level, 2);

        let history = store.history(&c.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].level, 1);
        assert_eq!(history[1].level, 2);
    }

    #[tokio::test]
    async fn resolved_complaint_rejects_escalation() {
        let (_dir, store) = open_store();
        let c = Complaint::new("late response", Priority::Low, Utc::now());
        store.insert_complaint(&c).await.unwrap();
        store.set_status(&c.id, ComplaintStatus::Resolved).await.unwrap();

        let err = store
            .record_escalation(&c.id, Utc::now(), "SLA breach", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyResolved(_)));
        // The rejected transaction must not have left a history row behind.
        assert!(store.history(&c.id).await.unwrap().is_empty());
        assert_eq!(store.open_complaints().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn assignment_appends_without_touching_level() {
        let (_dir, store) = open_store();
        let c = Complaint::new("missing refund", Priority::High, Utc::now());
        store.insert_complaint(&c).await.unwrap();

        let updated = store
            .record_assignment(&c.id, "bob", "Assigned to bob by root", Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.escalation_level, 0);
        assert_eq!(updated.assigned_to.as_deref(), Some("bob"));

        let history = store.history(&c.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, EntryKind::Assignment);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caseflow.redb");
        let id;
        {
            let store = RedbStore::open(&path).unwrap();
            let c = Complaint::new("wrong fee", Priority::High, Utc::now());
            id = c.id.clone();
            store.insert_complaint(&c).await.unwrap();
            store.record_escalation(&id, Utc::now(), "SLA breach", None).await.unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        let complaint = store.complaint(&id).await.unwrap().unwrap();
        assert_eq!(complaint.escalation_level, 1);
        assert_eq!(store.history(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_complaint_is_not_found() {
        let (_dir, store) = open_store();
        let err = store
            .record_escalation(&ComplaintId::new(), Utc::now(), "SLA breach", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
