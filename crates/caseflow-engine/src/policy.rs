//! SLA policy lookup.

use caseflow_core::{Priority, SlaPolicyConfig};

/// Immutable response-time policy, keyed by priority. Loaded once at
/// startup.
#[derive(Debug, Clone)]
pub struct SlaPolicy {
    low_hours: i64,
    medium_hours: i64,
    high_hours: i64,
}

impl SlaPolicy {
    pub fn new(config: SlaPolicyConfig) -> Self {
        Self {
            low_hours: config.low_hours,
            medium_hours: config.medium_hours,
            high_hours: config.high_hours,
        }
    }

    /// Response-time threshold in hours for a priority. Total over the
    /// enum.
    pub fn threshold_hours(&self, priority: Priority) -> i64 {
        match priority {
            Priority::Low => self.low_hours,
            Priority::Medium => self.medium_hours,
            Priority::High => self.high_hours,
        }
    }

    /// Threshold for a raw priority label. Unknown labels fail closed to
    /// the shortest configured threshold, never to "no breach".
    pub fn threshold_for_label(&self, label: &str) -> i64 {
        match Priority::parse(label) {
            Some(priority) => self.threshold_hours(priority),
            None => self.shortest_threshold(),
        }
    }

    fn shortest_threshold(&self) -> i64 {
        self.low_hours.min(self.medium_hours).min(self.high_hours)
    }
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self::new(SlaPolicyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_follows_config() {
        let policy = SlaPolicy::new(SlaPolicyConfig {
            low_hours: 96,
            medium_hours: 36,
            high_hours: 12,
        });
        assert_eq!(policy.threshold_hours(Priority::Low), 96);
        assert_eq!(policy.threshold_hours(Priority::Medium), 36);
        assert_eq!(policy.threshold_hours(Priority::High), 12);
    }

    #[test]
    fn unknown_label_fails_closed() {
        let policy = SlaPolicy::default();
        assert_eq!(policy.threshold_for_label("high"), 24);
        // Fail closed: shortest threshold, never "no breach".
        assert_eq!(policy.threshold_for_label("urgent"), 24);
        assert_eq!(policy.threshold_for_label(""), 24);
    }
}
