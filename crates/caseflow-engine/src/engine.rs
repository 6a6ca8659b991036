//! The escalation engine: sweep orchestration, manual actions, and
//! read-only aggregates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use caseflow_alerts::{Dispatcher, EscalationNotice};
use caseflow_core::{
    Complaint, ComplaintId, EscalationConfig, EscalationEntry, Error, Priority, Result,
};
use caseflow_storage::EscalationStore;

use crate::evaluator::{self, BreachVerdict};
use crate::policy::SlaPolicy;

/// Outcome of one full sweep.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SweepSummary {
    /// Open complaints examined.
    pub processed: usize,
    /// Complaints whose level was advanced.
    pub escalated: usize,
}

/// Outcome of a manual escalation.
#[derive(Debug, Clone, Serialize)]
pub struct ManualEscalation {
    pub complaint_id: ComplaintId,
    pub new_level: u32,
}

/// Per-priority slice of the aggregate stats.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PriorityBreakdown {
    pub open: usize,
    pub escalated: usize,
}

/// Read-only aggregate over the store.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationStats {
    pub total_unresolved: usize,
    pub total_escalated: usize,
    /// Unresolved complaints at or above the critical level.
    pub critical_escalations: usize,
    pub avg_escalation_level: f64,
    pub by_priority: BTreeMap<Priority, PriorityBreakdown>,
}

/// Orchestrates breach evaluation, escalation persistence, and
/// notification fan-out.
///
/// `run_sweep` is single-flight: the gate covers both the timer-driven
/// and the manually-triggered entry points, and a second entrant is
/// rejected with [`Error::SweepInProgress`] rather than queued.
pub struct EscalationEngine {
    store: Arc<dyn EscalationStore>,
    dispatcher: Dispatcher,
    policy: SlaPolicy,
    config: EscalationConfig,
    sweep_gate: Mutex<()>,
}

impl EscalationEngine {
    pub fn new(
        store: Arc<dyn EscalationStore>,
        dispatcher: Dispatcher,
        policy: SlaPolicy,
        config: EscalationConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            policy,
            config,
            sweep_gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn EscalationStore> {
        &self.store
    }

    /// One full pass over all open complaints.
    ///
    /// Failures local to one complaint are logged and the sweep moves on;
    /// only a failure to fetch the candidate set aborts the sweep (the
    /// scheduler retries on the next tick). Idempotent within the
    /// cooldown window.
    pub async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepSummary> {
        let _gate = self
            .sweep_gate
            .try_lock()
            .map_err(|_| Error::SweepInProgress)?;

        let candidates = self.store.open_complaints().await?;
        let mut summary = SweepSummary::default();

        for complaint in candidates {
            summary.processed += 1;
            match self.process_candidate(&complaint, now).await {
                Ok(true) => summary.escalated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        complaint_id = %complaint.id,
                        error = %e,
                        "Escalation failed, sweep continues"
                    );
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            escalated = summary.escalated,
            "Sweep complete"
        );
        Ok(summary)
    }

    /// Evaluate one open complaint and escalate it if breached and out of
    /// cooldown. Returns whether an escalation happened.
    async fn process_candidate(&self, complaint: &Complaint, now: DateTime<Utc>) -> Result<bool> {
        let verdict: BreachVerdict =
            evaluator::evaluate(complaint.created_at, complaint.priority, now, &self.policy);
        if !verdict.breached {
            return Ok(false);
        }

        if let Some(last) = complaint.last_escalated_at {
            let since_last = (now - last).num_hours();
            if since_last < self.config.cooldown_hours {
                tracing::debug!(
                    complaint_id = %complaint.id,
                    hours_since_last = since_last,
                    cooldown_hours = self.config.cooldown_hours,
                    "Breached but inside cooldown window"
                );
                return Ok(false);
            }
        }

        let reason = format!(
            "SLA breach: {}h overdue ({} priority)",
            verdict.hours_overdue, complaint.priority
        );
        // Conditional on the snapshot level: if a manual escalation landed
        // between fetch and write, the store rejects this write and the
        // complaint is simply picked up again next sweep.
        let updated = match self
            .store
            .record_escalation(&complaint.id, now, &reason, Some(complaint.escalation_level))
            .await
        {
            Ok(updated) => updated,
            Err(caseflow_storage::Error::Conflict(_)) => {
                tracing::debug!(
                    complaint_id = %complaint.id,
                    "Level changed mid-sweep, skipping"
                );
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            complaint_id = %updated.id,
            level = updated.escalation_level,
            hours_overdue = verdict.hours_overdue,
            priority = %updated.priority,
            "Complaint escalated"
        );

        // Persist-then-notify; delivery is best-effort and never rolls
        // back the recorded level.
        let notice =
            EscalationNotice::for_escalation(&updated, verdict.hours_overdue, &reason, &self.config, now);
        self.dispatcher.dispatch(&notice).await;

        Ok(true)
    }

    /// Operator-invoked escalation. Bypasses the cooldown by design and
    /// always advances the level by exactly 1; the operator's identity is
    /// recorded in the audit reason.
    pub async fn manual_escalate(
        &self,
        id: &ComplaintId,
        operator: &str,
        note: Option<&str>,
    ) -> Result<ManualEscalation> {
        let now = Utc::now();
        let reason = match note {
            Some(note) => format!("Manually escalated by {}: {}", operator, note),
            None => format!("Manually escalated by {}", operator),
        };

        let updated = self.store.record_escalation(id, now, &reason, None).await?;

        tracing::info!(
            complaint_id = %updated.id,
            level = updated.escalation_level,
            operator = operator,
            "Complaint manually escalated"
        );

        let verdict =
            evaluator::evaluate(updated.created_at, updated.priority, now, &self.policy);
        let notice = EscalationNotice::for_escalation(
            &updated,
            verdict.hours_overdue,
            &reason,
            &self.config,
            now,
        );
        self.dispatcher.dispatch(&notice).await;

        Ok(ManualEscalation {
            complaint_id: updated.id,
            new_level: updated.escalation_level,
        })
    }

    /// Assign the complaint to an admin. Independent of the level
    /// machine; only appends an attribution entry.
    pub async fn assign(
        &self,
        id: &ComplaintId,
        assignee: &str,
        operator: &str,
    ) -> Result<Complaint> {
        let now = Utc::now();
        let reason = format!("Assigned to {} by {}", assignee, operator);
        let updated = self.store.record_assignment(id, assignee, &reason, now).await?;

        tracing::info!(
            complaint_id = %updated.id,
            assignee = assignee,
            operator = operator,
            "Complaint assigned"
        );
        Ok(updated)
    }

    /// Audit history for one complaint, oldest first.
    pub async fn history(&self, id: &ComplaintId) -> Result<Vec<EscalationEntry>> {
        if self.store.complaint(id).await?.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(self.store.history(id).await?)
    }

    /// Aggregate escalation stats over unresolved complaints.
    pub async fn stats(&self) -> Result<EscalationStats> {
        let complaints = self.store.all_complaints().await?;

        let mut stats = EscalationStats {
            total_unresolved: 0,
            total_escalated: 0,
            critical_escalations: 0,
            avg_escalation_level: 0.0,
            by_priority: BTreeMap::new(),
        };
        let mut level_sum: u64 = 0;

        for complaint in complaints.iter().filter(|c| c.is_open()) {
            stats.total_unresolved += 1;
            level_sum += u64::from(complaint.escalation_level);

            let slice = stats.by_priority.entry(complaint.priority).or_default();
            slice.open += 1;

            if complaint.escalation_level > 0 {
                stats.total_escalated += 1;
                slice.escalated += 1;
            }
            if complaint.escalation_level >= self.config.critical_level {
                stats.critical_escalations += 1;
            }
        }

        if stats.total_unresolved > 0 {
            stats.avg_escalation_level = level_sum as f64 / stats.total_unresolved as f64;
        }

        Ok(stats)
    }
}
