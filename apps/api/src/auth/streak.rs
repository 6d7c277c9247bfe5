//! Login streak: count of consecutive calendar days with at least one login.
//!
//! Days are compared as calendar dates in the caller's time zone, never as
//! elapsed durations, so a 23- or 25-hour day around a DST change still
//! counts as one day.

use chrono::{DateTime, NaiveDate, TimeZone};

/// Returns the streak after a login on `today`.
///
/// - no previous login: 1
/// - same day: unchanged
/// - previous day: incremented
/// - any larger gap: reset to 1
pub fn compute_streak(previous_login: Option<NaiveDate>, previous_streak: u32, today: NaiveDate) -> u32 {
    let Some(previous) = previous_login else {
        return 1;
    };

    match (today - previous).num_days().abs() {
        0 => previous_streak,
        1 => previous_streak.saturating_add(1),
        _ => 1,
    }
}

/// Same as [`compute_streak`], normalising both instants to dates in their zone.
pub fn compute_streak_at<Tz: TimeZone>(
    previous_login: Option<DateTime<Tz>>,
    previous_streak: u32,
    now: DateTime<Tz>,
) -> u32 {
    compute_streak(
        previous_login.map(|d| d.date_naive()),
        previous_streak,
        now.date_naive(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_first_login_starts_at_one() {
        for date in [day(2020, 1, 1), day(2024, 2, 29), day(2031, 12, 31)] {
            assert_eq!(compute_streak(None, 0, date), 1);
        }
    }

    #[test]
    fn test_same_day_login_is_idempotent() {
        let d = day(2024, 5, 14);
        for streak in [1, 2, 17, 365] {
            assert_eq!(compute_streak(Some(d), streak, d), streak);
        }
    }

    #[test]
    fn test_next_day_increments() {
        let d = day(2024, 5, 14);
        assert_eq!(compute_streak(Some(d), 4, d + Duration::days(1)), 5);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let d = day(2024, 5, 14);
        for gap in [2, 3, 30, 400] {
            assert_eq!(compute_streak(Some(d), 9, d + Duration::days(gap)), 1);
        }
    }

    #[test]
    fn test_month_and_year_boundaries_count_as_one_day() {
        assert_eq!(compute_streak(Some(day(2023, 12, 31)), 3, day(2024, 1, 1)), 4);
        assert_eq!(compute_streak(Some(day(2024, 2, 28)), 3, day(2024, 2, 29)), 4);
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let previous = at("2024-05-14T23:59:00+00:00");
        let now = at("2024-05-15T00:01:00+00:00");
        assert_eq!(compute_streak_at(Some(previous), 2, now), 3);

        let morning = at("2024-05-14T00:01:00+00:00");
        let night = at("2024-05-14T23:59:00+00:00");
        assert_eq!(compute_streak_at(Some(morning), 2, night), 2);
    }

    #[test]
    fn test_spring_forward_day_still_counts_as_one() {
        // 23 hours elapsed across the US spring-forward transition.
        let previous = at("2024-03-09T23:30:00-05:00");
        let now = at("2024-03-10T23:30:00-04:00");
        assert_eq!(now.signed_duration_since(previous), Duration::hours(23));
        assert_eq!(compute_streak_at(Some(previous), 6, now), 7);
    }

    #[test]
    fn test_fall_back_day_still_counts_as_one() {
        // Just over 24 hours elapsed across the fall-back transition.
        let previous = at("2024-11-03T00:10:00-04:00");
        let now = at("2024-11-04T00:05:00-05:00");
        assert!(now.signed_duration_since(previous) > Duration::hours(24));
        assert_eq!(compute_streak_at(Some(previous), 6, now), 7);
    }

    #[test]
    fn test_clock_skew_uses_absolute_difference() {
        let d = day(2024, 5, 14);
        assert_eq!(compute_streak(Some(d), 3, d - Duration::days(1)), 4);
    }
}
