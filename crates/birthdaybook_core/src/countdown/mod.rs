//! Birthday countdown arithmetic.
//!
//! # Responsibility
//! - Map a `(day, month)` pair and a reference instant to the whole number
//!   of days until the next occurrence of that date.
//! - Resolve Feb 29 birthdays in non-leap years through `LeapDayPolicy`.
//!
//! # Invariants
//! - Functions here never read a clock; `now` is always supplied.
//! - Results are never negative. A birthday falling on `now`'s own calendar
//!   date yields `0` regardless of time of day.
//! - The leap-day policy is applied to both the current-year and the
//!   next-year candidate.

pub mod clock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Where a Feb 29 birthday lands in a year without Feb 29.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Celebrate on the last day of February.
    #[default]
    Feb28,
    /// Celebrate on the day after February ends.
    Mar1,
}

impl LeapDayPolicy {
    /// Stable lowercase label, matching the `FromStr` input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feb28 => "feb28",
            Self::Mar1 => "mar1",
        }
    }
}

impl Display for LeapDayPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeapDayPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "feb28" | "feb_28" => Ok(Self::Feb28),
            "mar1" | "mar_1" => Ok(Self::Mar1),
            other => Err(format!(
                "unsupported leap day policy `{other}`; expected feb28|mar1"
            )),
        }
    }
}

/// Returns the whole days remaining until the next `(day, month)` after `now`.
///
/// The candidate is this year's occurrence at local midnight. It moves to
/// next year only when its date is strictly before `now`'s date; the result
/// is the ceiling of the difference in days, so time of day never pushes a
/// same-day birthday below zero.
pub fn remaining_days(day: u8, month: u8, now: NaiveDateTime, policy: LeapDayPolicy) -> u32 {
    let candidate = next_occurrence(day, month, now.date(), policy);
    let delta_seconds = (candidate.and_time(NaiveTime::MIN) - now).num_seconds();
    let days = ceil_div(delta_seconds, SECONDS_PER_DAY);
    u32::try_from(days).unwrap_or(0)
}

/// Returns the date of the next occurrence of `(day, month)` on or after `today`.
pub fn next_occurrence(day: u8, month: u8, today: NaiveDate, policy: LeapDayPolicy) -> NaiveDate {
    let year = today.year();
    match resolve_occurrence(year, day, month, policy) {
        Some(candidate) if candidate >= today => candidate,
        // Out-of-range years only happen at chrono's calendar limits.
        _ => resolve_occurrence(year + 1, day, month, policy).unwrap_or(today),
    }
}

/// Resolves `(day, month)` to a concrete date in `year`.
///
/// Feb 29 follows `policy` in non-leap years. Any other day past the end of
/// its month is clamped to the month's last day.
pub fn resolve_occurrence(
    year: i32,
    day: u8,
    month: u8,
    policy: LeapDayPolicy,
) -> Option<NaiveDate> {
    let month = u32::from(month.clamp(1, 12));
    let day = u32::from(day.clamp(1, 31));

    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        return Some(date);
    }

    if month == 2 && day == 29 {
        return match policy {
            LeapDayPolicy::Feb28 => NaiveDate::from_ymd_opt(year, 2, 28),
            LeapDayPolicy::Mar1 => NaiveDate::from_ymd_opt(year, 3, 1),
        };
    }

    (28..day)
        .rev()
        .find_map(|candidate| NaiveDate::from_ymd_opt(year, month, candidate))
}

/// Returns whether `year` has a Feb 29.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ceil_div, is_leap_year, next_occurrence, remaining_days, resolve_occurrence,
        LeapDayPolicy,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid test instant")
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn ceil_div_rounds_toward_positive_infinity() {
        assert_eq!(ceil_div(0, 10), 0);
        assert_eq!(ceil_div(1, 10), 1);
        assert_eq!(ceil_div(10, 10), 1);
        assert_eq!(ceil_div(-1, 10), 0);
        assert_eq!(ceil_div(-10, 10), -1);
    }

    #[test]
    fn tomorrow_is_one_day_at_any_time_of_day() {
        let policy = LeapDayPolicy::default();
        assert_eq!(remaining_days(31, 12, at(2024, 12, 30, 0, 0), policy), 1);
        assert_eq!(remaining_days(31, 12, at(2024, 12, 30, 23, 59), policy), 1);
    }

    #[test]
    fn same_day_is_zero_even_late_in_the_evening() {
        let policy = LeapDayPolicy::default();
        assert_eq!(remaining_days(14, 10, at(2026, 10, 14, 0, 0), policy), 0);
        assert_eq!(remaining_days(14, 10, at(2026, 10, 14, 12, 30), policy), 0);
        assert_eq!(remaining_days(14, 10, at(2026, 10, 14, 23, 59), policy), 0);
    }

    #[test]
    fn yesterday_rolls_into_next_year() {
        let policy = LeapDayPolicy::default();
        // 2025 is not a leap year: 2025-10-13 -> 2026-10-13 spans 365 days.
        assert_eq!(remaining_days(13, 10, at(2025, 10, 14, 8, 0), policy), 364);
        assert_eq!(
            next_occurrence(13, 10, date(2025, 10, 14), policy),
            date(2026, 10, 13)
        );
    }

    #[test]
    fn year_boundary_counts_calendar_days() {
        let policy = LeapDayPolicy::default();
        assert_eq!(remaining_days(1, 1, at(2024, 12, 30, 0, 0), policy), 2);
        assert_eq!(remaining_days(1, 1, at(2024, 12, 31, 18, 0), policy), 1);
    }

    #[test]
    fn leap_day_in_leap_year_uses_feb_29() {
        assert_eq!(
            next_occurrence(29, 2, date(2024, 1, 1), LeapDayPolicy::Feb28),
            date(2024, 2, 29)
        );
        assert_eq!(remaining_days(29, 2, at(2024, 2, 29, 9, 0), LeapDayPolicy::Mar1), 0);
    }

    #[test]
    fn leap_day_in_common_year_follows_policy() {
        let today = date(2025, 1, 1);
        assert_eq!(
            next_occurrence(29, 2, today, LeapDayPolicy::Feb28),
            date(2025, 2, 28)
        );
        assert_eq!(
            next_occurrence(29, 2, today, LeapDayPolicy::Mar1),
            date(2025, 3, 1)
        );
    }

    #[test]
    fn leap_day_rollover_applies_policy_to_next_year() {
        // 2024-03-01: this year's Feb 29 has passed; 2025 has no Feb 29.
        let now = at(2024, 3, 1, 10, 0);
        assert_eq!(remaining_days(29, 2, now, LeapDayPolicy::Feb28), 364);
        assert_eq!(remaining_days(29, 2, now, LeapDayPolicy::Mar1), 365);
    }

    #[test]
    fn feb28_policy_celebrates_on_feb_28_itself() {
        assert_eq!(remaining_days(29, 2, at(2025, 2, 28, 15, 0), LeapDayPolicy::Feb28), 0);
        assert_eq!(remaining_days(29, 2, at(2025, 2, 28, 15, 0), LeapDayPolicy::Mar1), 1);
    }

    #[test]
    fn resolve_clamps_days_past_month_end() {
        assert_eq!(
            resolve_occurrence(2025, 31, 4, LeapDayPolicy::Feb28),
            Some(date(2025, 4, 30))
        );
    }

    #[test]
    fn leap_year_detection() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2025));
    }

    #[test]
    fn policy_parses_labels() {
        assert_eq!("FEB28".parse::<LeapDayPolicy>(), Ok(LeapDayPolicy::Feb28));
        assert_eq!(" mar1 ".parse::<LeapDayPolicy>(), Ok(LeapDayPolicy::Mar1));
        let err = "march".parse::<LeapDayPolicy>().unwrap_err();
        assert!(err.contains("feb28|mar1"));
        assert_eq!(LeapDayPolicy::Mar1.to_string(), "mar1");
    }
}
