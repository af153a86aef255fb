//! Configuration types for the HRMS engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML policy files.

use chrono::NaiveDate;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::entities::{HolidayType, LeaveKind};

/// Organization-wide defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// Display name of the organization.
    pub name: String,
    /// Probation length applied when an employee record does not set one.
    pub default_probation_days: i32,
    /// Notice period applied when an employee record does not set one.
    pub default_notice_period_days: i32,
    /// Office timezone as an offset from UTC, in minutes (IST is 330).
    pub utc_offset_minutes: i32,
    /// Notice categories created on first start.
    #[serde(default)]
    pub message_categories: Vec<String>,
}

/// A leave type inserted into the catalogue on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypeSeed {
    /// Unique display name.
    pub name: String,
    /// Rule family.
    pub kind: LeaveKind,
    /// Days granted when a yearly balance is first created.
    #[serde(default)]
    pub annual_allocation: Decimal,
    /// Days added per month by the accrual job.
    #[serde(default)]
    pub accrual_rate: Decimal,
    /// Cap on days carried into the next year.
    #[serde(default)]
    pub max_carry_forward: Decimal,
    /// Maximum span of one application.
    #[serde(default = "default_max_days")]
    pub max_days: i32,
    /// Calendar colour.
    pub colour: String,
    /// Whether accrued days may be used in the month they accrue.
    #[serde(default = "default_true")]
    pub can_use_same_month: bool,
}

fn default_max_days() -> i32 {
    30
}

fn default_true() -> bool {
    true
}

/// Leave accrual, carry-forward and quota rules.
#[derive(Debug, Clone, Deserialize)]
pub struct LeavePolicy {
    /// Earned leave days added per month after probation.
    pub monthly_accrual_rate: Decimal,
    /// Maximum earned days carried into the next year.
    pub max_carry_forward: Decimal,
    /// Optional holidays allocated per year.
    pub optional_allocation: Decimal,
    /// Optional holidays an employee may actually take per year.
    pub optional_usable_per_year: Decimal,
    /// Days a comp-off grant stays valid after the holiday worked.
    pub comp_off_validity_days: i64,
    /// Leave types seeded into an empty catalogue.
    pub leave_types: Vec<LeaveTypeSeed>,
}

/// Attendance thresholds and standard hours.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendancePolicy {
    /// Check-ins at or before this time are on time.
    pub office_start: NaiveTime,
    /// Days worked for less than this many minutes are loss of pay.
    pub lop_below_minutes: i64,
    /// Days worked for less than this many minutes are half days.
    pub half_day_below_minutes: i64,
    /// Standard minutes Monday to Friday.
    pub weekday_standard_minutes: i64,
    /// Standard minutes on Saturday.
    pub saturday_standard_minutes: i64,
    /// Saturday standard minutes per location name.
    #[serde(default)]
    pub saturday_location_overrides: HashMap<String, i64>,
}

impl AttendancePolicy {
    /// Standard Saturday minutes for a location, honouring overrides.
    pub fn saturday_minutes_for(&self, location: Option<&str>) -> i64 {
        location
            .and_then(|loc| {
                self.saturday_location_overrides
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(loc))
                    .map(|(_, minutes)| *minutes)
            })
            .unwrap_or(self.saturday_standard_minutes)
    }
}

/// Defaults used by the salary quick calculator.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollPolicy {
    /// HRA as a percentage of basic.
    pub hra_percent_of_basic: Decimal,
    /// Fixed monthly conveyance allowance.
    pub conveyance_allowance: Decimal,
    /// Fixed monthly medical allowance.
    pub medical_allowance: Decimal,
    /// Provident fund as a percentage of basic.
    pub pf_percent_of_basic: Decimal,
    /// Fixed monthly professional tax.
    pub professional_tax: Decimal,
}

/// A holiday inserted into the calendar on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidaySeed {
    /// Display name.
    pub name: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// National, state or optional.
    pub holiday_type: HolidayType,
    /// Location name for state holidays.
    #[serde(default)]
    pub region: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One year of seeded holidays (`holidays/<year>.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// Calendar year.
    pub year: i32,
    /// Holidays in the year.
    pub holidays: Vec<HolidaySeed>,
}

/// Complete HRMS configuration.
///
/// This struct aggregates all configuration loaded from the YAML files in
/// a configuration directory.
#[derive(Debug, Clone)]
pub struct HrmsConfig {
    organization: OrganizationConfig,
    leave_policy: LeavePolicy,
    attendance: AttendancePolicy,
    payroll: PayrollPolicy,
    /// Holiday calendars sorted oldest year first.
    holidays: Vec<HolidayCalendar>,
}

impl HrmsConfig {
    /// Creates a new HrmsConfig from its component parts.
    pub fn new(
        organization: OrganizationConfig,
        leave_policy: LeavePolicy,
        attendance: AttendancePolicy,
        payroll: PayrollPolicy,
        holidays: Vec<HolidayCalendar>,
    ) -> Self {
        let mut sorted = holidays;
        sorted.sort_by_key(|calendar| calendar.year);
        Self {
            organization,
            leave_policy,
            attendance,
            payroll,
            holidays: sorted,
        }
    }

    /// Returns the organization defaults.
    pub fn organization(&self) -> &OrganizationConfig {
        &self.organization
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        &self.leave_policy
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.attendance
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        &self.payroll
    }

    /// Returns all holiday calendars.
    pub fn holidays(&self) -> &[HolidayCalendar] {
        &self.holidays
    }
}
