//! Probation rules.
//!
//! Probation ends `probation_period_days` after the joining date. The
//! employee is on probation up to and including that day, and no earned
//! leave accrues during it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::AuditStep;

/// Probation position of one employee on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbationStatus {
    /// Last day of probation.
    pub end_date: NaiveDate,
    /// Whether `today <= end_date`.
    pub on_probation: bool,
    /// Days until probation ends (zero once it has ended).
    pub days_remaining: i64,
    /// Whole months completed since probation ended.
    pub months_after_probation: u32,
}

impl ProbationStatus {
    /// Message shown to employees still on probation.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use hrms_engine::rules::probation_status;
    ///
    /// let joined = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    /// let today = NaiveDate::from_ymd_opt(2026, 3, 22).unwrap();
    /// let status = probation_status(joined, 90, today);
    /// assert_eq!(
    ///     status.message().as_deref(),
    ///     Some("Probation ends in 10 days (01 Apr 2026)")
    /// );
    /// ```
    pub fn message(&self) -> Option<String> {
        self.on_probation.then(|| {
            format!(
                "Probation ends in {} days ({})",
                self.days_remaining,
                self.end_date.format("%d %b %Y")
            )
        })
    }
}

/// Last day of probation.
pub fn probation_end_date(date_of_joining: NaiveDate, probation_days: i32) -> NaiveDate {
    date_of_joining + Duration::days(i64::from(probation_days.max(0)))
}

/// Whole months between the probation end date and `today`.
///
/// A month counts once its day-of-month has been reached, so an end date
/// of 15 March gives one month on 15 April and zero on 14 April.
pub fn months_after_probation(end_date: NaiveDate, today: NaiveDate) -> u32 {
    if today <= end_date {
        return 0;
    }
    let mut months = (today.year() - end_date.year()) * 12 + today.month() as i32
        - end_date.month() as i32;
    if today.day() < end_date.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Evaluates probation for an employee on `today`.
pub fn probation_status(
    date_of_joining: NaiveDate,
    probation_days: i32,
    today: NaiveDate,
) -> ProbationStatus {
    let end_date = probation_end_date(date_of_joining, probation_days);
    let on_probation = today <= end_date;
    ProbationStatus {
        end_date,
        on_probation,
        days_remaining: if on_probation {
            (end_date - today).num_days()
        } else {
            0
        },
        months_after_probation: months_after_probation(end_date, today),
    }
}

/// Records a probation check as an audit step.
pub fn probation_audit_step(status: &ProbationStatus, today: NaiveDate, step_number: u32) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "probation_check".to_string(),
        rule_name: "Probation Check".to_string(),
        policy_ref: "organization.default_probation_days".to_string(),
        input: serde_json::json!({
            "today": today.to_string(),
            "probation_end_date": status.end_date.to_string(),
        }),
        output: serde_json::json!({
            "on_probation": status.on_probation,
            "months_after_probation": status.months_after_probation,
        }),
        reasoning: if status.on_probation {
            format!(
                "On probation until {}; earned leave does not accrue",
                status.end_date
            )
        } else {
            format!(
                "Probation ended {}; {} full month(s) completed since",
                status.end_date, status.months_after_probation
            )
        },
    }
}
