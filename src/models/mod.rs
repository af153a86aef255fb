//! Shared domain models that are not persisted.
//!
//! Persisted rows live in [`crate::entities`]; this module holds the
//! decision-trace types returned alongside rule results.

mod audit;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
