//! # Deadline Engine — Whole-Day Age and Countdown Arithmetic
//!
//! Pure functions computing regulatory ages and deadline countdowns at
//! calendar-day granularity. The clock is always an explicit argument;
//! nothing here reads `Utc::now()`, which keeps every caller deterministic
//! and testable.
//!
//! ## Rounding Policy
//!
//! - [`days_since`] **floors**: an incident detected 47 hours ago has an age
//!   of 1 day. Age thresholds only fire once a full day has elapsed.
//! - [`days_until`] **ceils**: a deadline 1 hour away still counts as 1 day
//!   remaining. Countdowns only reach 0 once the deadline instant has
//!   arrived, and go negative once it has passed.
//!
//! The asymmetry is deliberate and load-bearing: every alert threshold in
//! `skl-alerts` is calibrated against these exact roundings, so
//! `days_until(x, now)` is **not** interchangeable with
//! `-days_since(x, now)`.
//!
//! Both functions are total over any pair of instants. A record with an
//! absent optional date has no applicable deadline — callers skip the
//! computation entirely rather than substituting zero.

use crate::temporal::Timestamp;

/// Seconds in one day.
const DAY_SECS: i64 = 86_400;

/// Whole days elapsed since `reference`, flooring partial days.
///
/// `floor((now - reference) / 1 day)`. Negative when `reference` is in the
/// future of `now`.
pub fn days_since(reference: Timestamp, now: Timestamp) -> i64 {
    let delta = now.epoch_secs() - reference.epoch_secs();
    delta.div_euclid(DAY_SECS)
}

/// Whole days remaining until `deadline`, ceiling partial days.
///
/// `ceil((deadline - now) / 1 day)`. Positive means the deadline is in the
/// future, zero means it falls exactly on `now`, negative means it is
/// overdue.
pub fn days_until(deadline: Timestamp, now: Timestamp) -> i64 {
    let delta = deadline.epoch_secs() - now.epoch_secs();
    // ceil(a/b) for positive b, via euclidean floor of the negation.
    -(-delta).div_euclid(DAY_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_epoch_secs(secs).unwrap()
    }

    const NOW: i64 = 1_772_000_000;

    // ---- days_since ----

    #[test]
    fn test_days_since_floors_partial_days() {
        // 47 hours ago -> 1 day of age, not 2.
        let reference = ts(NOW - 47 * 3600);
        assert_eq!(days_since(reference, ts(NOW)), 1);
    }

    #[test]
    fn test_days_since_exact_boundary() {
        let reference = ts(NOW - 2 * DAY_SECS);
        assert_eq!(days_since(reference, ts(NOW)), 2);
    }

    #[test]
    fn test_days_since_same_instant() {
        assert_eq!(days_since(ts(NOW), ts(NOW)), 0);
    }

    #[test]
    fn test_days_since_future_reference_is_negative() {
        let reference = ts(NOW + 3600);
        assert_eq!(days_since(reference, ts(NOW)), -1);
    }

    // ---- days_until ----

    #[test]
    fn test_days_until_ceils_partial_days() {
        // 1 hour away -> still 1 day remaining.
        let deadline = ts(NOW + 3600);
        assert_eq!(days_until(deadline, ts(NOW)), 1);
    }

    #[test]
    fn test_days_until_exact_boundary() {
        let deadline = ts(NOW + 3 * DAY_SECS);
        assert_eq!(days_until(deadline, ts(NOW)), 3);
    }

    #[test]
    fn test_days_until_deadline_now_is_zero() {
        assert_eq!(days_until(ts(NOW), ts(NOW)), 0);
    }

    #[test]
    fn test_days_until_overdue_is_negative() {
        let deadline = ts(NOW - 5 * DAY_SECS);
        assert_eq!(days_until(deadline, ts(NOW)), -5);
        // One second past the deadline already counts as overdue by 0 days
        // ceiled: ceil(-1/86400) = 0 ... so a just-missed deadline reads 0.
        let just_missed = ts(NOW - 1);
        assert_eq!(days_until(just_missed, ts(NOW)), 0);
    }

    #[test]
    fn test_floor_ceil_asymmetry() {
        // The two functions disagree on partial days by construction.
        let x = ts(NOW - 36 * 3600); // 1.5 days in the past
        assert_eq!(days_since(x, ts(NOW)), 1);
        assert_eq!(days_until(x, ts(NOW)), -1);
        let y = ts(NOW + 36 * 3600); // 1.5 days in the future
        assert_eq!(days_since(y, ts(NOW)), -2);
        assert_eq!(days_until(y, ts(NOW)), 2);
    }

    // ---- property tests ----

    proptest! {
        #[test]
        fn prop_days_since_matches_floor(delta in -400_i64..400, offset in 0_i64..DAY_SECS) {
            let now = ts(NOW);
            let reference = ts(NOW - delta * DAY_SECS - offset);
            // floor((delta*86400 + offset)/86400) == delta for offset in [0, 86400)
            prop_assert_eq!(days_since(reference, now), delta);
        }

        #[test]
        fn prop_days_until_matches_ceil(delta in -400_i64..400, offset in 0_i64..DAY_SECS) {
            let now = ts(NOW);
            let deadline = ts(NOW + delta * DAY_SECS + offset);
            let expected = if offset == 0 { delta } else { delta + 1 };
            // ceil((delta*86400 + offset)/86400) == delta + (offset > 0)
            prop_assert_eq!(days_until(deadline, now), expected);
        }

        #[test]
        fn prop_whole_day_offsets_agree(k in -400_i64..400) {
            // On exact day boundaries flooring and ceiling coincide.
            let now = ts(NOW);
            let x = ts(NOW + k * DAY_SECS);
            prop_assert_eq!(days_until(x, now), k);
            prop_assert_eq!(days_since(x, now), -k);
        }

        #[test]
        fn prop_days_since_monotone_in_now(a in -500_000_i64..500_000, b in -500_000_i64..500_000) {
            let reference = ts(NOW);
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                days_since(reference, ts(NOW + earlier)) <= days_since(reference, ts(NOW + later))
            );
        }
    }
}
