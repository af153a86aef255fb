//! HRMS engine
//!
//! Employee records, attendance, payroll and resignation workflows built
//! around a leave balance engine: monthly accrual, probation gating,
//! carry-forward with forfeiture, optional-holiday quotas and paid/unpaid
//! splitting of leave applications.

pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod rules;
pub mod scheduler;
pub mod services;
