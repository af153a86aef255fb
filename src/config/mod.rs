//! Configuration loading and management for the HRMS engine.
//!
//! This module loads the organization defaults and the leave, attendance
//! and payroll policies from YAML files, plus the per-year holiday
//! calendars used to seed the database.
//!
//! # Example
//!
//! ```no_run
//! use hrms_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Organization: {}", config.organization().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, HolidayCalendar, HolidaySeed, HrmsConfig, LeavePolicy, LeaveTypeSeed,
    OrganizationConfig, PayrollPolicy,
};
