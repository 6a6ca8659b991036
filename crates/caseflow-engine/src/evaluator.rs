//! Pure breach evaluation.

use chrono::{DateTime, Utc};

use caseflow_core::Priority;

use crate::policy::SlaPolicy;

/// Verdict for one complaint at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreachVerdict {
    /// Whether elapsed hours exceed the SLA threshold.
    pub breached: bool,
    /// Whole hours since creation, floored.
    pub hours_elapsed: i64,
    /// Whole hours past the threshold, zero if within it.
    pub hours_overdue: i64,
    /// The threshold applied, in hours.
    pub sla_limit: i64,
}

/// Evaluate a complaint's SLA clock. Deterministic, no side effects.
pub fn evaluate(
    created_at: DateTime<Utc>,
    priority: Priority,
    now: DateTime<Utc>,
    policy: &SlaPolicy,
) -> BreachVerdict {
    let sla_limit = policy.threshold_hours(priority);
    let hours_elapsed = (now - created_at).num_hours();
    let breached = hours_elapsed > sla_limit;
    let hours_overdue = (hours_elapsed - sla_limit).max(0);

    BreachVerdict {
        breached,
        hours_elapsed,
        hours_overdue,
        sla_limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at_hours(base: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
        base + Duration::hours(hours)
    }

    #[test]
    fn breach_matches_threshold_comparison() {
        let policy = SlaPolicy::default();
        let created = Utc::now();

        for priority in Priority::all() {
            let limit = policy.threshold_hours(priority);
            for elapsed in [0, limit - 1, limit, limit + 1, limit + 10] {
                let verdict = evaluate(created, priority, at_hours(created, elapsed), &policy);
                assert_eq!(verdict.breached, elapsed > limit, "{priority} at {elapsed}h");
                assert_eq!(verdict.hours_elapsed, elapsed);
                assert_eq!(verdict.hours_overdue, (elapsed - limit).max(0));
            }
        }
    }

    #[test]
    fn exactly_at_threshold_is_not_breached() {
        let policy = SlaPolicy::default();
        let created = Utc::now();
        let verdict = evaluate(created, Priority::High, at_hours(created, 24), &policy);
        assert!(!verdict.breached);
        assert_eq!(verdict.hours_overdue, 0);
    }

    #[test]
    fn partial_hours_floor() {
        let policy = SlaPolicy::default();
        let created = Utc::now();
        // 24h50m elapsed floors to 24h: not yet breached for high priority.
        let now = created + Duration::hours(24) + Duration::minutes(50);
        let verdict = evaluate(created, Priority::High, now, &policy);
        assert_eq!(verdict.hours_elapsed, 24);
        assert!(!verdict.breached);
    }

    #[test]
    fn clock_before_creation_is_never_breached() {
        let policy = SlaPolicy::default();
        let created = Utc::now();
        let verdict = evaluate(created, Priority::High, at_hours(created, -2), &policy);
        assert!(!verdict.breached);
        assert_eq!(verdict.hours_overdue, 0);
    }
}
