//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading HRMS policy
//! configuration from YAML files.

use chrono::{Datelike, FixedOffset, Offset, Utc};
use std::fs;
use std::path::Path;

use crate::entities::LeaveKind;
use crate::error::{HrmsError, HrmsResult};

use super::types::{
    AttendancePolicy, HolidayCalendar, HrmsConfig, LeavePolicy, LeaveTypeSeed, OrganizationConfig,
    PayrollPolicy,
};

/// Loads and provides access to HRMS configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and exposes the organization defaults and the leave, attendance and
/// payroll policies.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── organization.yaml       # Probation/notice defaults, timezone
/// ├── leave_policy.yaml       # Accrual, carry-forward, seeded leave types
/// ├── attendance_policy.yaml  # Office start, thresholds, standard hours
/// ├── payroll_policy.yaml     # Quick-calculator defaults
/// └── holidays/
///     └── 2026.yaml           # Holidays seeded for the year
/// ```
///
/// # Example
///
/// ```no_run
/// use hrms_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Accrual rate: {}", loader.leave_policy().monthly_accrual_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrmsConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/default")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> HrmsResult<Self> {
        let path = path.as_ref();

        let organization = Self::load_yaml::<OrganizationConfig>(&path.join("organization.yaml"))?;
        let leave_policy = Self::load_yaml::<LeavePolicy>(&path.join("leave_policy.yaml"))?;
        let attendance =
            Self::load_yaml::<AttendancePolicy>(&path.join("attendance_policy.yaml"))?;
        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll_policy.yaml"))?;
        let holidays = Self::load_holidays(&path.join("holidays"))?;

        Ok(Self {
            config: HrmsConfig::new(organization, leave_policy, attendance, payroll, holidays),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrmsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrmsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrmsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday calendar in the holidays directory.
    ///
    /// A missing directory yields an empty calendar list; holidays can still
    /// be added through the API.
    fn load_holidays(dir: &Path) -> HrmsResult<Vec<HolidayCalendar>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| HrmsError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut calendars = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| HrmsError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let calendar = Self::load_yaml::<HolidayCalendar>(&path)?;
                if calendar.holidays.iter().any(|h| h.date.year() != calendar.year) {
                    return Err(HrmsError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("holiday dated outside {}", calendar.year),
                    });
                }
                calendars.push(calendar);
            }
        }

        Ok(calendars)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HrmsConfig {
        &self.config
    }

    /// Returns the organization defaults.
    pub fn organization(&self) -> &OrganizationConfig {
        self.config.organization()
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        self.config.leave_policy()
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        self.config.attendance()
    }

    /// Returns the payroll policy.
    pub fn payroll(&self) -> &PayrollPolicy {
        self.config.payroll()
    }

    /// Returns the holiday calendar for a year, if one was configured.
    pub fn holiday_calendar(&self, year: i32) -> Option<&HolidayCalendar> {
        self.config.holidays().iter().find(|c| c.year == year)
    }

    /// Gets the seeded leave type of a given kind.
    ///
    /// # Returns
    ///
    /// Returns the first seed of that kind, or `NotFound` when the policy
    /// file does not declare one.
    pub fn leave_type_seed(&self, kind: LeaveKind) -> HrmsResult<&LeaveTypeSeed> {
        self.leave_policy()
            .leave_types
            .iter()
            .find(|seed| seed.kind == kind)
            .ok_or_else(|| HrmsError::not_found("Leave type seed", kind.label()))
    }

    /// Returns the office timezone.
    ///
    /// Falls back to UTC when the configured offset is out of range.
    pub fn office_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.organization().utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.organization().default_probation_days, 90);
        assert_eq!(loader.organization().default_notice_period_days, 60);
    }

    #[test]
    fn test_leave_policy_values() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.leave_policy();

        assert_eq!(policy.monthly_accrual_rate, dec("1.5"));
        assert_eq!(policy.max_carry_forward, dec("12"));
        assert_eq!(policy.optional_usable_per_year, dec("2"));
        assert_eq!(policy.optional_allocation, dec("4"));
    }

    #[test]
    fn test_every_engine_kind_is_seeded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        for kind in [
            LeaveKind::Earned,
            LeaveKind::Optional,
            LeaveKind::Unpaid,
            LeaveKind::CompOff,
        ] {
            assert!(loader.leave_type_seed(kind).is_ok(), "missing {:?}", kind);
        }
        assert_eq!(
            loader.leave_type_seed(LeaveKind::Sick).unwrap().annual_allocation,
            dec("12")
        );
    }

    #[test]
    fn test_saturday_override_for_bhubaneswar() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let attendance = loader.attendance();

        assert_eq!(attendance.saturday_minutes_for(Some("Bhubaneswar")), 360);
        assert_eq!(attendance.saturday_minutes_for(Some("Bangalore")), 240);
        assert_eq!(attendance.saturday_minutes_for(None), 240);
    }

    #[test]
    fn test_holiday_calendar_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let calendar = loader.holiday_calendar(2026).unwrap();
        assert!(!calendar.holidays.is_empty());
        assert!(loader.holiday_calendar(1999).is_none());
    }

    #[test]
    fn test_office_offset_is_ist() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.office_offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_missing_directory_returns_config_not_found() {
        let result = ConfigLoader::load("./config/does-not-exist");
        match result {
            Err(HrmsError::ConfigNotFound { path }) => {
                assert!(path.contains("organization.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }
}
