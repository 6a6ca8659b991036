//! SLA-driven escalation engine for a complaint-intake system.
//!
//! The engine continuously re-evaluates open complaints against a
//! priority-keyed response-time policy, advances a per-complaint
//! escalation level when the policy is breached, keeps an append-only
//! audit history of every transition, and fans out urgency-graded
//! notices - safely from both a periodic timer and an on-demand manual
//! trigger.
//!
//! Components:
//!
//! - [`SlaPolicy`] - priority to threshold-hours lookup.
//! - [`evaluator::evaluate`] - pure breach verdict.
//! - [`EscalationEngine`] - sweep orchestration, manual escalation,
//!   assignment, stats, and history, behind a single-flight sweep gate.
//! - [`SweepScheduler`] - delayed initial sweep, fixed-period loop,
//!   manual trigger, stop/restart.

pub mod engine;
pub mod evaluator;
pub mod policy;
pub mod scheduler;

pub use engine::{
    EscalationEngine, EscalationStats, ManualEscalation, PriorityBreakdown, SweepSummary,
};
pub use evaluator::{evaluate, BreachVerdict};
pub use policy::SlaPolicy;
pub use scheduler::{SchedulerState, SweepScheduler};

// The engine reports errors in the core taxonomy.
pub use caseflow_core::{Error, Result};
