//! Escalation notice payload, urgency grading, and recipient tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caseflow_core::{Complaint, ComplaintId, EscalationConfig, Priority};

/// Urgency grade attached to an escalation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// First escalation, admin attention requested.
    Moderate,
    /// Repeated escalation, response overdue more than one cycle.
    High,
    /// Escalation has reached the critical level.
    Critical,
}

impl Urgency {
    /// Grade the level reached by an escalation.
    pub fn for_level(level: u32, config: &EscalationConfig) -> Self {
        if level >= config.critical_level {
            Self::Critical
        } else if level >= 2 {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a notice is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientTier {
    Admin,
    Superadmin,
}

impl RecipientTier {
    /// Tiers addressed for the level reached. Admins always receive; the
    /// superadmin tier joins once escalation has exceeded one automatic
    /// admin-notification cycle.
    pub fn for_level(level: u32, config: &EscalationConfig) -> Vec<Self> {
        if level >= config.superadmin_level {
            vec![Self::Admin, Self::Superadmin]
        } else {
            vec![Self::Admin]
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl std::fmt::Display for RecipientTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full content payload for one escalation notification.
///
/// The engine decides *that* and *to whom* a notice goes; how it is
/// transmitted is the channel's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationNotice {
    /// The escalated complaint.
    pub complaint_id: ComplaintId,
    /// Complaint subject line.
    pub subject: String,
    /// Complaint priority.
    pub priority: Priority,
    /// The level reached by this escalation.
    pub level: u32,
    /// Hours past the SLA threshold at evaluation time. Zero for manual
    /// escalations issued before a breach.
    pub hours_overdue: i64,
    /// Urgency grade.
    pub urgency: Urgency,
    /// Recipient tiers, admin first.
    pub tiers: Vec<RecipientTier>,
    /// The reason recorded in the audit history.
    pub reason: String,
    /// When the notice was created.
    pub created_at: DateTime<Utc>,
}

impl EscalationNotice {
    /// Build a notice for a complaint that just reached `level`.
    pub fn for_escalation(
        complaint: &Complaint,
        hours_overdue: i64,
        reason: impl Into<String>,
        config: &EscalationConfig,
        at: DateTime<Utc>,
    ) -> Self {
        let level = complaint.escalation_level;
        Self {
            complaint_id: complaint.id.clone(),
            subject: complaint.subject.clone(),
            priority: complaint.priority,
            level,
            hours_overdue,
            urgency: Urgency::for_level(level, config),
            tiers: RecipientTier::for_level(level, config),
            reason: reason.into(),
            created_at: at,
        }
    }

    pub fn includes_superadmin(&self) -> bool {
        self.tiers.contains(&RecipientTier::Superadmin)
    }
}
