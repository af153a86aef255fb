//! Error types for the HRMS engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the leave engine, the workflows and the persistence
//! layer can report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the HRMS engine.
///
/// All services return this error type, so the HTTP layer can map every
/// failure to a status code in one place.
///
/// # Example
///
/// ```
/// use hrms_engine::error::HrmsError;
///
/// let error = HrmsError::ConfigNotFound {
///     path: "/missing/leave_policy.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/leave_policy.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum HrmsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The database rejected a query or could not be reached.
    #[error("Database error: {message}")]
    Database {
        /// The driver message.
        message: String,
    },

    /// A record looked up by id or key does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Employee").
        entity: String,
        /// The id or key that was looked up.
        id: String,
    },

    /// Request data failed a business validation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A leave balance cannot cover the requested days.
    #[error("Insufficient {leave_type} balance: {available} available, {requested} requested")]
    InsufficientBalance {
        /// The leave type name.
        leave_type: String,
        /// Days remaining on the balance.
        available: Decimal,
        /// Days requested.
        requested: Decimal,
    },

    /// No balance row exists for the leave type in the given year.
    #[error("No {leave_type} balance found for {year}")]
    BalanceNotFound {
        /// The leave type name.
        leave_type: String,
        /// The balance year.
        year: i32,
    },

    /// The requested leave overlaps an existing pending or approved leave.
    #[error("Leave overlaps an existing application from {start} to {end}")]
    LeaveOverlap {
        /// Start of the conflicting leave.
        start: NaiveDate,
        /// End of the conflicting leave.
        end: NaiveDate,
    },

    /// A workflow status change that is not permitted.
    #[error("Cannot move {entity} from '{from}' to '{to}'")]
    InvalidTransition {
        /// The kind of record.
        entity: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The acting employee is not allowed to perform the operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why the action was refused.
        message: String,
    },

    /// A record with the same unique key already exists.
    #[error("{entity} already exists: {key}")]
    Duplicate {
        /// The kind of record.
        entity: String,
        /// The conflicting key.
        key: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl HrmsError {
    /// Shorthand for a [`HrmsError::NotFound`].
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`HrmsError::Validation`].
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HrmsError::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for HrmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return HrmsError.
pub type HrmsResult<T> = Result<T, HrmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = HrmsError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_insufficient_balance_displays_amounts() {
        let error = HrmsError::InsufficientBalance {
            leave_type: "Earned".to_string(),
            available: Decimal::new(15, 1),
            requested: Decimal::new(3, 0),
        };
        assert_eq!(
            error.to_string(),
            "Insufficient Earned balance: 1.5 available, 3 requested"
        );
    }

    #[test]
    fn test_not_found_helper() {
        let error = HrmsError::not_found("Employee", 42);
        assert_eq!(error.to_string(), "Employee not found: 42");
    }

    #[test]
    fn test_overlap_displays_dates() {
        let error = HrmsError::LeaveOverlap {
            start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Leave overlaps an existing application from 2026-03-02 to 2026-03-04"
        );
    }

    #[test]
    fn test_invalid_transition_displays_statuses() {
        let error = HrmsError::InvalidTransition {
            entity: "Resignation".to_string(),
            from: "withdrawn".to_string(),
            to: "accepted".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot move Resignation from 'withdrawn' to 'accepted'"
        );
    }

    #[test]
    fn test_db_err_converts_to_database_variant() {
        let error: HrmsError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(error, HrmsError::Database { .. }));
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<HrmsError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> HrmsResult<()> {
            Err(HrmsError::not_found("Leave", 7))
        }

        fn propagates_error() -> HrmsResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
