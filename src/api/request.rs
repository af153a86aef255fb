//! Request bodies and query strings for the HRMS API.
//!
//! Inputs that map one-to-one onto a service call (new employees, leave
//! applications, payroll runs) are deserialized straight into the service
//! types; the types here cover workflow actions and list queries.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::entities::{CelebrationKind, LeaveStatus, PayslipStatus};

/// Body of an action performed by an employee on someone else's record.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorRequest {
    /// The acting employee.
    pub actor_id: i32,
}

/// Query form of [`ActorRequest`], for DELETE routes.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorQuery {
    pub actor_id: i32,
}

/// Rejects a leave application.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectLeaveRequest {
    pub actor_id: i32,
    pub reason: String,
}

/// Moves a leave application to an arbitrary status.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveStatusRequest {
    pub actor_id: i32,
    pub status: LeaveStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of an action an employee performs on their own record.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRequest {
    pub employee_id: i32,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Check-in or check-out.
#[derive(Debug, Clone, Deserialize)]
pub struct PunchRequest {
    pub employee_id: i32,
    /// Reverse-geocoded address of the punch.
    #[serde(default)]
    pub address: Option<String>,
}

/// Runs the year-end job for a closing year.
#[derive(Debug, Clone, Deserialize)]
pub struct YearEndRequest {
    pub year: i32,
}

/// Query for the employee whose records are listed.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeQuery {
    pub employee_id: i32,
}

/// Optional year filter; defaults to the current year.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Month selector for an employee's attendance.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    pub employee_id: i32,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

/// Whether inactive catalogue entries are listed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InactiveQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Holiday list filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidayQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Optional employee filter for leave statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub employee_id: Option<i32>,
}

/// Basic salary for the quick calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickSalaryQuery {
    #[serde(with = "rust_decimal::serde::str")]
    pub basic: Decimal,
}

/// Moves a payslip along generated → approved → paid.
#[derive(Debug, Clone, Deserialize)]
pub struct PayslipStatusRequest {
    pub actor_id: i32,
    pub status: PayslipStatus,
}

/// Accepts a resignation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveResignationRequest {
    pub actor_id: i32,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Rejects a resignation.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectResignationRequest {
    pub actor_id: i32,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_parses_snake_case_status() {
        let json = r#"{"actor_id": 3, "status": "approved"}"#;
        let request: LeaveStatusRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);
        assert!(request.reason.is_none());
    }

    #[test]
    fn test_reject_requires_reason() {
        let json = r#"{"actor_id": 3}"#;
        assert!(serde_json::from_str::<RejectLeaveRequest>(json).is_err());
    }

    #[test]
    fn test_quick_salary_query_reads_decimal_string() {
        let query: QuickSalaryQuery = serde_json::from_str(r#"{"basic": "25000.50"}"#).unwrap();
        assert_eq!(query.basic, Decimal::new(2500050, 2));
    }
}

/// Filter for received celebration wishes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishQuery {
    #[serde(default)]
    pub wish_type: Option<CelebrationKind>,
}

/// Filter for message sub-types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtypeQuery {
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub include_inactive: bool,
}
