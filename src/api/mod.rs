//! HTTP API module for the HRMS engine.
//!
//! This module provides the JSON REST endpoints for employees, the leave
//! engine, attendance, payroll and resignations.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
