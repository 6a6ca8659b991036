//! Complaint record and its enumerations.
//!
//! The surrounding CRUD system owns most of the complaint lifecycle; the
//! escalation engine only reads these records and advances the
//! `escalation_level` / `last_escalated_at` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub Uuid);

impl ComplaintId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ComplaintId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complaint priority, immutable after creation.
///
/// Priority selects the SLA response-time threshold; ordering reflects
/// severity so `High` sorts last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Get the priority as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a priority from a string label.
    ///
    /// Returns `None` for unknown labels; callers that must not fail open
    /// (the SLA policy lookup) map `None` to the most conservative
    /// threshold.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// All priorities, lowest severity first.
    pub fn all() -> [Priority; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complaint workflow status.
///
/// Resolved complaints are permanently excluded from escalation sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    New,
    UnderReview,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::UnderReview => "under_review",
            Self::Resolved => "resolved",
        }
    }

    /// Whether the complaint is still a candidate for escalation sweeps.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complaint as seen by the escalation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Unique complaint ID.
    pub id: ComplaintId,
    /// Short subject line, carried into notification payloads.
    pub subject: String,
    /// Priority, fixed at creation.
    pub priority: Priority,
    /// Workflow status.
    pub status: ComplaintStatus,
    /// Creation timestamp - the SLA clock's zero point.
    pub created_at: DateTime<Utc>,
    /// Number of escalation events accumulated. Starts at 0, never
    /// decreases while unresolved, never reset by the engine.
    #[serde(default)]
    pub escalation_level: u32,
    /// Timestamp of the most recent level increment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_escalated_at: Option<DateTime<Utc>>,
    /// Admin currently assigned, if any. Independent of the level machine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Complaint {
    /// Create a fresh, unescalated complaint.
    pub fn new(subject: impl Into<String>, priority: Priority, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ComplaintId::new(),
            subject: subject.into(),
            priority,
            status: ComplaintStatus::New,
            created_at,
            escalation_level: 0,
            last_escalated_at: None,
            assigned_to: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }
}
