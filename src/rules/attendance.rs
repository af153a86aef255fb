//! Attendance day classification.
//!
//! Durations are classified from the minutes between check-in and
//! check-out. Standard hours depend on the weekday and, on Saturdays, on
//! the employee's location.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::AttendancePolicy;

/// Status of one attendance day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    /// Worked at least the half-day threshold.
    Present,
    /// Worked between the LOP and half-day thresholds.
    #[serde(rename = "Half Day")]
    HalfDay,
    /// Worked less than the LOP threshold.
    #[serde(rename = "LOP")]
    Lop,
    /// Checked in today and not yet out.
    #[serde(rename = "In Progress")]
    InProgress,
    /// No attendance on a working day.
    Absent,
}

/// Check-in punctuality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Punctuality {
    /// At or before office start.
    #[serde(rename = "On Time")]
    OnTime,
    /// After office start.
    Late,
}

/// Classifies a completed day by minutes worked.
pub fn classify_worked_minutes(minutes: i64, policy: &AttendancePolicy) -> DayStatus {
    if minutes < policy.lop_below_minutes {
        DayStatus::Lop
    } else if minutes < policy.half_day_below_minutes {
        DayStatus::HalfDay
    } else {
        DayStatus::Present
    }
}

/// On time when checked in at or before the office start time.
pub fn punctuality(check_in: NaiveTime, policy: &AttendancePolicy) -> Punctuality {
    if check_in <= policy.office_start {
        Punctuality::OnTime
    } else {
        Punctuality::Late
    }
}

/// Standard minutes for a date, or `None` on Sundays.
pub fn standard_minutes(
    date: NaiveDate,
    location: Option<&str>,
    policy: &AttendancePolicy,
) -> Option<i64> {
    match date.weekday() {
        Weekday::Sun => None,
        Weekday::Sat => Some(policy.saturday_minutes_for(location)),
        _ => Some(policy.weekday_standard_minutes),
    }
}

/// Formats minutes as `"Xh Ym"`.
///
/// # Example
///
/// ```
/// use hrms_engine::rules::format_minutes;
///
/// assert_eq!(format_minutes(545), "9h 5m");
/// ```
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Derived view of one attendance day.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    /// Calendar date.
    pub date: NaiveDate,
    /// Day classification.
    pub status: DayStatus,
    /// Minutes worked, when checked out.
    pub worked_minutes: Option<i64>,
    /// `"Xh Ym"`, `"In Progress"` or `"-"`.
    pub duration_display: String,
    /// Minutes beyond the standard for the day.
    pub extra_minutes: Option<i64>,
    /// `"Xh Ym"` or `"-"`.
    pub extra_hours_display: String,
    /// Punctuality, when checked in.
    pub punctuality: Option<Punctuality>,
}

/// Summarizes an attendance day.
///
/// # Arguments
///
/// * `date` - The attendance date
/// * `check_in` / `check_out` - Office-local timestamps, if any
/// * `now` - Current office-local time; an open record on today's date is
///   classified by time elapsed so far, an open record on a past date is a
///   half day
/// * `location` - Employee location for Saturday hours
pub fn summarize_day(
    date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    now: NaiveDateTime,
    location: Option<&str>,
    policy: &AttendancePolicy,
) -> DaySummary {
    let Some(check_in) = check_in else {
        return DaySummary {
            date,
            status: DayStatus::Absent,
            worked_minutes: None,
            duration_display: "-".to_string(),
            extra_minutes: None,
            extra_hours_display: "-".to_string(),
            punctuality: None,
        };
    };

    let punctuality = Some(punctuality(check_in.time(), policy));

    match check_out {
        Some(check_out) => {
            let worked = (check_out - check_in).num_minutes().max(0);
            let extra = standard_minutes(date, location, policy).map(|std| (worked - std).max(0));
            DaySummary {
                date,
                status: classify_worked_minutes(worked, policy),
                worked_minutes: Some(worked),
                duration_display: if worked == 0 {
                    "0 minutes".to_string()
                } else {
                    format_minutes(worked)
                },
                extra_minutes: extra,
                extra_hours_display: extra.map(format_minutes).unwrap_or_else(|| "-".to_string()),
                punctuality,
            }
        }
        None => {
            let status = if date == now.date() {
                let elapsed = (now - check_in).num_minutes().max(0);
                match classify_worked_minutes(elapsed, policy) {
                    DayStatus::Present => DayStatus::Present,
                    _ => DayStatus::InProgress,
                }
            } else {
                DayStatus::HalfDay
            };
            DaySummary {
                date,
                status,
                worked_minutes: None,
                duration_display: "In Progress".to_string(),
                extra_minutes: None,
                extra_hours_display: "-".to_string(),
                punctuality,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn policy() -> AttendancePolicy {
        let mut overrides = HashMap::new();
        overrides.insert("Bhubaneswar".to_string(), 360);
        AttendancePolicy {
            office_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            lop_below_minutes: 120,
            half_day_below_minutes: 300,
            weekday_standard_minutes: 540,
            saturday_standard_minutes: 240,
            saturday_location_overrides: overrides,
        }
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_thresholds() {
        let p = policy();
        assert_eq!(classify_worked_minutes(119, &p), DayStatus::Lop);
        assert_eq!(classify_worked_minutes(120, &p), DayStatus::HalfDay);
        assert_eq!(classify_worked_minutes(299, &p), DayStatus::HalfDay);
        assert_eq!(classify_worked_minutes(300, &p), DayStatus::Present);
    }

    #[test]
    fn test_punctuality_boundary() {
        let p = policy();
        assert_eq!(punctuality(NaiveTime::from_hms_opt(9, 30, 0).unwrap(), &p), Punctuality::OnTime);
        assert_eq!(punctuality(NaiveTime::from_hms_opt(9, 31, 0).unwrap(), &p), Punctuality::Late);
    }

    #[test]
    fn test_saturday_hours_by_location() {
        let p = policy();
        let saturday = d(2026, 3, 14);
        assert_eq!(standard_minutes(saturday, Some("Bhubaneswar"), &p), Some(360));
        assert_eq!(standard_minutes(saturday, Some("Pune"), &p), Some(240));
        assert_eq!(standard_minutes(d(2026, 3, 15), None, &p), None);
        assert_eq!(standard_minutes(d(2026, 3, 16), None, &p), Some(540));
    }

    #[test]
    fn test_full_day_with_extra_hours() {
        let p = policy();
        let day = d(2026, 3, 16);
        let summary = summarize_day(day, Some(at(day, 9, 0)), Some(at(day, 19, 15)), at(day, 20, 0), None, &p);
        assert_eq!(summary.status, DayStatus::Present);
        assert_eq!(summary.worked_minutes, Some(615));
        assert_eq!(summary.duration_display, "10h 15m");
        assert_eq!(summary.extra_hours_display, "1h 15m");
        assert_eq!(summary.punctuality, Some(Punctuality::OnTime));
    }

    #[test]
    fn test_open_record_today_is_in_progress() {
        let p = policy();
        let day = d(2026, 3, 16);
        let summary = summarize_day(day, Some(at(day, 10, 0)), None, at(day, 11, 0), None, &p);
        assert_eq!(summary.status, DayStatus::InProgress);
        assert_eq!(summary.duration_display, "In Progress");
        assert_eq!(summary.punctuality, Some(Punctuality::Late));
    }

    #[test]
    fn test_open_record_in_past_is_half_day() {
        let p = policy();
        let day = d(2026, 3, 16);
        let summary = summarize_day(day, Some(at(day, 9, 0)), None, at(d(2026, 3, 18), 9, 0), None, &p);
        assert_eq!(summary.status, DayStatus::HalfDay);
    }

    #[test]
    fn test_missing_record_is_absent() {
        let p = policy();
        let day = d(2026, 3, 16);
        let summary = summarize_day(day, None, None, at(day, 12, 0), None, &p);
        assert_eq!(summary.status, DayStatus::Absent);
        assert!(summary.punctuality.is_none());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0h 0m");
        assert_eq!(format_minutes(61), "1h 1m");
        assert_eq!(format_minutes(-5), "0h 0m");
    }
}
