//! Working-day counting for leave requests and payroll months.
//!
//! Sundays are the weekly off. Mandatory holidays (national, or state
//! holidays for the employee's location) are excluded; optional holidays
//! remain working days but are reported so they can be claimed separately.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::models::AuditStep;

/// A holiday as seen from one employee's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarHoliday {
    /// Holiday date.
    pub date: NaiveDate,
    /// Holiday name.
    pub name: String,
    /// Closes the office for this employee.
    pub mandatory: bool,
    /// May be claimed against the optional quota.
    pub optional: bool,
}

/// The result of counting working days, including the audit step.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingDaysResult {
    /// Number of working days in the range.
    pub working_days: u32,
    /// The working dates themselves.
    pub working_dates: Vec<NaiveDate>,
    /// Sundays skipped.
    pub sundays: u32,
    /// Mandatory holidays skipped (excluding those on a Sunday).
    pub holidays_excluded: Vec<CalendarHoliday>,
    /// Optional holidays that fall on working days in the range.
    pub optional_holidays: Vec<CalendarHoliday>,
    /// The audit step recording this count.
    pub audit_step: AuditStep,
}

/// Counts working days in `[start, end]`.
///
/// An empty or inverted range yields zero.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use hrms_engine::rules::count_working_days;
///
/// // Monday to Sunday
/// let start = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
/// let result = count_working_days(start, end, &[], 1);
/// assert_eq!(result.working_days, 6);
/// assert_eq!(result.sundays, 1);
/// ```
pub fn count_working_days(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &[CalendarHoliday],
    step_number: u32,
) -> WorkingDaysResult {
    let mut working_dates = Vec::new();
    let mut sundays = 0;
    let mut holidays_excluded = Vec::new();
    let mut optional_holidays = Vec::new();

    let mut day = start;
    while day <= end {
        if day.weekday() == Weekday::Sun {
            sundays += 1;
        } else if let Some(holiday) = holidays.iter().find(|h| h.date == day && h.mandatory) {
            holidays_excluded.push(holiday.clone());
        } else {
            if let Some(holiday) = holidays.iter().find(|h| h.date == day && h.optional) {
                optional_holidays.push(holiday.clone());
            }
            working_dates.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let working_days = working_dates.len() as u32;

    WorkingDaysResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "working_days".to_string(),
            rule_name: "Working Day Count".to_string(),
            policy_ref: "holidays".to_string(),
            input: serde_json::json!({
                "start": start.to_string(),
                "end": end.to_string(),
                "holidays_considered": holidays.len(),
            }),
            output: serde_json::json!({
                "working_days": working_days,
                "sundays": sundays,
                "holidays_excluded": holidays_excluded.iter().map(|h| &h.name).collect::<Vec<_>>(),
                "optional_holidays": optional_holidays.iter().map(|h| &h.name).collect::<Vec<_>>(),
            }),
            reasoning: format!(
                "{} working day(s) after excluding {} Sunday(s) and {} holiday(s)",
                working_days,
                sundays,
                holidays_excluded.len()
            ),
        },
        working_days,
        working_dates,
        sundays,
        holidays_excluded,
        optional_holidays,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn holiday(date: NaiveDate, name: &str, mandatory: bool) -> CalendarHoliday {
        CalendarHoliday {
            date,
            name: name.to_string(),
            mandatory,
            optional: !mandatory,
        }
    }

    #[test]
    fn test_saturday_is_a_working_day() {
        // 2026-03-14 is a Saturday
        let result = count_working_days(d(2026, 3, 14), d(2026, 3, 14), &[], 1);
        assert_eq!(result.working_days, 1);
    }

    #[test]
    fn test_single_sunday_is_zero() {
        let result = count_working_days(d(2026, 3, 15), d(2026, 3, 15), &[], 1);
        assert_eq!(result.working_days, 0);
        assert_eq!(result.sundays, 1);
    }

    #[test]
    fn test_mandatory_holiday_excluded() {
        // Holi 2026-03-04 (Wed) inside Mon 2..Fri 6
        let holidays = vec![holiday(d(2026, 3, 4), "Holi", true)];
        let result = count_working_days(d(2026, 3, 2), d(2026, 3, 6), &holidays, 1);
        assert_eq!(result.working_days, 4);
        assert_eq!(result.holidays_excluded.len(), 1);
        assert!(!result.working_dates.contains(&d(2026, 3, 4)));
    }

    #[test]
    fn test_optional_holiday_counts_and_is_reported() {
        let holidays = vec![holiday(d(2026, 4, 3), "Good Friday", false)];
        let result = count_working_days(d(2026, 4, 2), d(2026, 4, 3), &holidays, 1);
        assert_eq!(result.working_days, 2);
        assert_eq!(result.optional_holidays.len(), 1);
        assert_eq!(result.optional_holidays[0].name, "Good Friday");
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let result = count_working_days(d(2026, 3, 6), d(2026, 3, 2), &[], 1);
        assert_eq!(result.working_days, 0);
    }

    #[test]
    fn test_month_of_october_2026() {
        // 31 days, 4 Sundays, Gandhi Jayanti (Fri) and Dussehra (Tue)
        let holidays = vec![
            holiday(d(2026, 10, 2), "Gandhi Jayanti", true),
            holiday(d(2026, 10, 20), "Dussehra", true),
        ];
        let result = count_working_days(d(2026, 10, 1), d(2026, 10, 31), &holidays, 1);
        assert_eq!(result.sundays, 4);
        assert_eq!(result.working_days, 25);
    }
}
