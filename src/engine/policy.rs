use chrono::{DateTime, Duration, Utc};

use crate::model::session::AttendanceStatus;
use crate::model::shift::ShiftWindow;

/// Lateness/overtime rules. Stateless; safe to share across workers.
#[derive(Debug, Clone, Copy)]
pub struct StatusPolicy {
    late_tolerance: Duration,
    overtime_tolerance: Duration,
}

impl StatusPolicy {
    pub fn new(late_tolerance_minutes: i64, overtime_tolerance_minutes: i64) -> Self {
        Self {
            late_tolerance: Duration::minutes(late_tolerance_minutes),
            overtime_tolerance: Duration::minutes(overtime_tolerance_minutes),
        }
    }

    /// Status assigned once at check-in and never revisited afterwards.
    /// Unscheduled attendance (no shift window) is always `Present`.
    pub fn decide_check_in_status(
        &self,
        check_in_time: DateTime<Utc>,
        shift: Option<&ShiftWindow>,
    ) -> AttendanceStatus {
        match shift {
            None => AttendanceStatus::Present,
            Some(window) => {
                if check_in_time <= window.start + self.late_tolerance {
                    AttendanceStatus::Present
                } else {
                    AttendanceStatus::Late
                }
            }
        }
    }

    /// Check-out-time duration classification. Reported alongside the
    /// session; the stored check-in status is left as assigned.
    pub fn is_overtime(
        &self,
        check_in_time: DateTime<Utc>,
        check_out_time: DateTime<Utc>,
        shift: Option<&ShiftWindow>,
    ) -> bool {
        let Some(window) = shift else {
            return false;
        };
        let worked = check_out_time - check_in_time;
        worked > window.scheduled_duration() + self.overtime_tolerance
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_to_five() -> ShiftWindow {
        ShiftWindow {
            start: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 5, 17, 0, 0).unwrap(),
        }
    }

    #[test]
    fn early_check_in_is_present() {
        let policy = StatusPolicy::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 8, 55, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, Some(&nine_to_five())),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn check_in_exactly_at_start_is_present() {
        let policy = StatusPolicy::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, Some(&nine_to_five())),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn late_check_in_with_zero_tolerance() {
        let policy = StatusPolicy::new(0, 0);
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 15, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, Some(&nine_to_five())),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn grace_period_absorbs_small_delays() {
        let policy = StatusPolicy::new(10, 0);
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 8, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, Some(&nine_to_five())),
            AttendanceStatus::Present
        );
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 11, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, Some(&nine_to_five())),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn unscheduled_attendance_is_present() {
        let policy = StatusPolicy::default();
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 23, 0, 0).unwrap();
        assert_eq!(
            policy.decide_check_in_status(at, None),
            AttendanceStatus::Present
        );
    }

    #[test]
    fn status_is_deterministic() {
        let policy = StatusPolicy::new(5, 0);
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 4, 59).unwrap();
        let shift = nine_to_five();
        let first = policy.decide_check_in_status(at, Some(&shift));
        for _ in 0..10 {
            assert_eq!(policy.decide_check_in_status(at, Some(&shift)), first);
        }
    }

    #[test]
    fn overtime_judged_against_scheduled_duration() {
        let policy = StatusPolicy::new(0, 15);
        let shift = nine_to_five();
        let check_in = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();

        // 8h10m worked against an 8h shift with 15m tolerance: not overtime
        let out = Utc.with_ymd_and_hms(2026, 1, 5, 17, 10, 0).unwrap();
        assert!(!policy.is_overtime(check_in, out, Some(&shift)));

        // 8h20m worked: overtime
        let out = Utc.with_ymd_and_hms(2026, 1, 5, 17, 20, 0).unwrap();
        assert!(policy.is_overtime(check_in, out, Some(&shift)));

        // no shift window, nothing to exceed
        assert!(!policy.is_overtime(check_in, out, None));
    }
}
