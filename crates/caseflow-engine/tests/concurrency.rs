//! Single-flight guarantees: a manual trigger racing a scheduled tick
//! must never double-escalate the same breach.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use caseflow_alerts::{ChannelRegistry, Dispatcher};
use caseflow_core::{
    Complaint, ComplaintId, ComplaintStatus, Error, EscalationConfig, EscalationEntry, Priority,
};
use caseflow_engine::{EscalationEngine, SlaPolicy};
use caseflow_storage::{EscalationStore, MemoryStore, Result as StorageResult};

/// Store wrapper with injectable delays, so tests can hold a sweep open
/// at a chosen point while another path races it.
#[derive(Default)]
struct SlowStore {
    inner: MemoryStore,
    fetch_delay: Duration,
    escalate_delay: Duration,
}

#[async_trait]
impl EscalationStore for SlowStore {
    async fn insert_complaint(&self, complaint: &Complaint) -> StorageResult<()> {
        self.inner.insert_complaint(complaint).await
    }

    async fn complaint(&self, id: &ComplaintId) -> StorageResult<Option<Complaint>> {
        self.inner.complaint(id).await
    }

    async fn open_complaints(&self) -> StorageResult<Vec<Complaint>> {
        tokio::time::sleep(self.fetch_delay).await;
        self.inner.open_complaints().await
    }

    async fn all_complaints(&self) -> StorageResult<Vec<Complaint>> {
        self.inner.all_complaints().await
    }

    async fn set_status(&self, id: &ComplaintId, status: ComplaintStatus) -> StorageResult<()> {
        self.inner.set_status(id, status).await
    }

    async fn record_escalation(
        &self,
        id: &ComplaintId,
        at: DateTime<Utc>,
        reason: &str,
        expected_level: Option<u32>,
    ) -> StorageResult<Complaint> {
        // Only conditional (sweep-side) writes stall, so a racing manual
        // escalation can slip in between snapshot and write.
        if expected_level.is_some() {
            tokio::time::sleep(self.escalate_delay).await;
        }
        self.inner.record_escalation(id, at, reason, expected_level).await
    }

    async fn record_assignment(
        &self,
        id: &ComplaintId,
        assignee: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> StorageResult<Complaint> {
        self.inner.record_assignment(id, assignee, reason, at).await
    }

    async fn history(&self, id: &ComplaintId) -> StorageResult<Vec<EscalationEntry>> {
        self.inner.history(id).await
    }
}

fn engine_over(store: Arc<dyn EscalationStore>) -> Arc<EscalationEngine> {
    Arc::new(EscalationEngine::new(
        store,
        Dispatcher::new(Arc::new(ChannelRegistry::new())),
        SlaPolicy::default(),
        EscalationConfig::default(),
    ))
}

fn breached_complaint() -> Complaint {
    Complaint::new(
        "refund missing",
        Priority::High,
        Utc::now() - ChronoDuration::hours(48),
    )
}

#[tokio::test]
async fn concurrent_sweeps_reject_the_second_entrant() {
    let store = Arc::new(SlowStore {
        fetch_delay: Duration::from_millis(100),
        ..SlowStore::default()
    });
    let complaint = breached_complaint();
    let id = complaint.id.clone();
    store.insert_complaint(&complaint).await.unwrap();

    let engine = engine_over(store.clone());

    let now = Utc::now();
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run_sweep(now).await })
    };
    // Let the first sweep take the gate and stall in the store fetch.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = engine.run_sweep(now).await;

    assert!(matches!(second, Err(Error::SweepInProgress)));

    let summary = first.await.unwrap().unwrap();
    assert_eq!(summary.escalated, 1);

    // Exactly one increment, exactly one history row for this breach.
    let c = store.complaint(&id).await.unwrap().unwrap();
    assert_eq!(c.escalation_level, 1);
    assert_eq!(store.history(&id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn back_to_back_sweeps_are_idempotent_within_cooldown() {
    let store = Arc::new(MemoryStore::new());
    let complaint = breached_complaint();
    let id = complaint.id.clone();
    store.insert_complaint(&complaint).await.unwrap();

    let engine = engine_over(store.clone());

    let now = Utc::now();
    let first = engine.run_sweep(now).await.unwrap();
    let second = engine.run_sweep(now).await.unwrap();

    assert_eq!(first.escalated, 1);
    assert_eq!(second.escalated, 0);
    assert_eq!(store.complaint(&id).await.unwrap().unwrap().escalation_level, 1);
}

#[tokio::test]
async fn manual_escalation_mid_sweep_invalidates_the_sweep_write() {
    let store = Arc::new(SlowStore {
        escalate_delay: Duration::from_millis(100),
        ..SlowStore::default()
    });
    let complaint = breached_complaint();
    let id = complaint.id.clone();
    store.insert_complaint(&complaint).await.unwrap();

    let engine = engine_over(store.clone());

    let sweep = {
        let engine = engine.clone();
        let now = Utc::now();
        tokio::spawn(async move { engine.run_sweep(now).await })
    };
    // The sweep snapshotted level 0 and is stalled in its conditional
    // write; this unconditional escalation lands first.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let manual = engine.manual_escalate(&id, "root", None).await.unwrap();
    assert_eq!(manual.new_level, 1);

    let summary = sweep.await.unwrap().unwrap();
    // The sweep's write lost the race and was skipped.
    assert_eq!(summary.escalated, 0);

    let c = store.complaint(&id).await.unwrap().unwrap();
    let history = store.history(&id).await.unwrap();
    assert_eq!(c.escalation_level, 1);
    assert_eq!(history.len(), 1);
    assert!(history[0].reason.contains("Manually escalated by root"));
    assert_eq!(c.escalation_level, history.last().unwrap().level);
}
