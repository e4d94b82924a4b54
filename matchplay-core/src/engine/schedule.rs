//! Deadlines of the match lifecycle and the reminder window.

use crate::config::MatchPolicy;
use time::{Duration, PrimitiveDateTime};

/// Start time of a match created at `now`.
pub fn scheduled_start(now: PrimitiveDateTime, policy: &MatchPolicy) -> PrimitiveDateTime {
    now + policy.start_buffer
}

/// A pending match is started regardless of readiness at this point.
pub fn ready_deadline(scheduled_start: PrimitiveDateTime, policy: &MatchPolicy) -> PrimitiveDateTime {
    scheduled_start + policy.ready_timeout
}

/// An active match is resolved by the timeout policy at this point.
///
/// Mismatched matches get `mismatch_grace` on top, so an administrator has
/// time to settle them.
pub fn active_deadline(
    started_at: PrimitiveDateTime,
    mismatch: bool,
    policy: &MatchPolicy,
) -> PrimitiveDateTime {
    let deadline = started_at + policy.match_timeout;
    if mismatch {
        deadline + policy.mismatch_grace
    } else {
        deadline
    }
}

/// Whole minutes until `scheduled_start` if a reminder is due now.
///
/// Due once the start is at most `notify_lead` away, including starts that
/// have already passed (reported as 0 minutes).
pub fn reminder_minutes(
    scheduled_start: PrimitiveDateTime,
    now: PrimitiveDateTime,
    policy: &MatchPolicy,
) -> Option<i64> {
    let remaining = scheduled_start - now;
    if remaining > policy.notify_lead {
        return None;
    }
    Some(remaining.max(Duration::ZERO).whole_minutes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_deadlines_follow_policy() {
        let policy = MatchPolicy::default();
        let start = datetime!(2024-01-01 12:00);
        assert_eq!(
            scheduled_start(datetime!(2024-01-01 11:57), &policy),
            start
        );
        assert_eq!(ready_deadline(start, &policy), datetime!(2024-01-01 12:05));
        assert_eq!(
            active_deadline(start, false, &policy),
            datetime!(2024-01-01 12:30)
        );
        assert_eq!(
            active_deadline(start, true, &policy),
            datetime!(2024-01-01 13:00)
        );
    }

    #[test]
    fn test_reminder_window() {
        let policy = MatchPolicy::default();
        let start = datetime!(2024-01-01 12:00);

        assert_eq!(reminder_minutes(start, datetime!(2024-01-01 11:50), &policy), None);
        assert_eq!(
            reminder_minutes(start, datetime!(2024-01-01 11:54), &policy),
            Some(6)
        );
        assert_eq!(
            reminder_minutes(start, datetime!(2024-01-01 11:56:30), &policy),
            Some(3)
        );
        assert_eq!(
            reminder_minutes(start, datetime!(2024-01-01 12:02), &policy),
            Some(0)
        );
    }
}
