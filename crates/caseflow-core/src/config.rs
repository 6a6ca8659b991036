//! Configuration surface consumed by the engine and scheduler.
//!
//! The SLA table is fixed at startup; nothing here is runtime-mutable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// SLA response-time thresholds in hours, keyed by priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaPolicyConfig {
    /// Hours before a low-priority complaint breaches.
    #[serde(default = "default_low_hours")]
    pub low_hours: i64,
    /// Hours before a medium-priority complaint breaches.
    #[serde(default = "default_medium_hours")]
    pub medium_hours: i64,
    /// Hours before a high-priority complaint breaches.
    #[serde(default = "default_high_hours")]
    pub high_hours: i64,
}

fn default_low_hours() -> i64 {
    72
}

fn default_medium_hours() -> i64 {
    48
}

fn default_high_hours() -> i64 {
    24
}

impl Default for SlaPolicyConfig {
    fn default() -> Self {
        Self {
            low_hours: default_low_hours(),
            medium_hours: default_medium_hours(),
            high_hours: default_high_hours(),
        }
    }
}

/// Escalation decision knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Minimum hours between two automatic escalations of the same
    /// complaint. Prevents re-notifying every sweep once a complaint is
    /// already breached and flagged.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,
    /// Level at which the superadmin tier is added to notifications.
    #[serde(default = "default_superadmin_level")]
    pub superadmin_level: u32,
    /// Level at which notifications become critical urgency.
    #[serde(default = "default_critical_level")]
    pub critical_level: u32,
}

fn default_cooldown_hours() -> i64 {
    24
}

fn default_superadmin_level() -> u32 {
    2
}

fn default_critical_level() -> u32 {
    3
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: default_cooldown_hours(),
            superadmin_level: default_superadmin_level(),
            critical_level: default_critical_level(),
        }
    }
}

/// Sweep scheduler timing.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Grace period before the first sweep, giving the store time to
    /// become reachable after process start.
    pub initial_delay: Duration,
    /// Pause between sweeps, measured from sweep completion.
    pub sweep_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(3600),
        }
    }
}
