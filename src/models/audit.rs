//! Decision trace types shared by the leave rules.
//!
//! Every rule that changes a balance or a leave request records an
//! [`AuditStep`], so HR can see why a request was split, why an accrual
//! was skipped, or how much carry-forward was forfeited.

use serde::{Deserialize, Serialize};

/// A single step in a decision trace.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The policy setting the rule reads (e.g. `leave_policy.max_carry_forward`).
    pub policy_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning raised while processing a request.
///
/// Warnings do not block the request but are returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The ordered decision trace for one operation.
///
/// # Example
///
/// ```
/// use hrms_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of decision steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings raised.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// The step number the next recorded step should use.
    pub fn next_step(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a step.
    pub fn push(&mut self, step: AuditStep) {
        self.steps.push(step);
    }

    /// Appends a warning.
    pub fn warn(&mut self, warning: AuditWarning) {
        self.warnings.push(warning);
    }
}
