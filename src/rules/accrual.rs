//! Earned leave accrual rules.
//!
//! Earned leave accrues at a fixed monthly rate once probation is over.
//! These functions decide how much to add; persisting the result is the
//! job of the leave jobs service.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::AuditStep;

use super::probation::ProbationStatus;

/// Why an employee did or did not accrue this month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualOutcome {
    /// The monthly rate was added.
    Accrued,
    /// Still on probation on the run date.
    OnProbation,
    /// Joined after the first day of the month being accrued.
    JoinedMidMonth,
    /// Employee record is inactive.
    Inactive,
}

/// Facts about one employee needed to decide a monthly accrual.
#[derive(Debug, Clone)]
pub struct AccrualFacts {
    /// Whether the employee is active.
    pub is_active: bool,
    /// Joining date.
    pub date_of_joining: NaiveDate,
    /// Last day of probation.
    pub probation_end_date: NaiveDate,
}

/// The outcome of a monthly accrual decision, including the audit step.
#[derive(Debug, Clone)]
pub struct AccrualDecision {
    /// Days to add to the Earned balance (zero unless accrued).
    pub amount: Decimal,
    /// Why.
    pub outcome: AccrualOutcome,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Decides the monthly accrual for one employee.
///
/// # Arguments
///
/// * `facts` - Employee status, joining and probation dates
/// * `run_date` - The date the job runs; the month accrued is its month
/// * `rate` - Days accrued per month (1.5 by default)
/// * `step_number` - Audit step number
///
/// # Rules
///
/// 1. Inactive employees never accrue.
/// 2. Employees with `run_date <= probation_end_date` are on probation.
/// 3. Employees who joined after the first of the month wait for the next.
/// 4. Everyone else accrues `rate`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use hrms_engine::rules::{monthly_accrual, AccrualFacts, AccrualOutcome};
///
/// let facts = AccrualFacts {
///     is_active: true,
///     date_of_joining: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
///     probation_end_date: NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(),
/// };
/// let run_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let decision = monthly_accrual(&facts, run_date, Decimal::new(15, 1), 1);
/// assert_eq!(decision.outcome, AccrualOutcome::Accrued);
/// assert_eq!(decision.amount, Decimal::new(15, 1));
/// ```
pub fn monthly_accrual(
    facts: &AccrualFacts,
    run_date: NaiveDate,
    rate: Decimal,
    step_number: u32,
) -> AccrualDecision {
    let month_start = run_date.with_day(1).unwrap_or(run_date);

    let outcome = if !facts.is_active {
        AccrualOutcome::Inactive
    } else if run_date <= facts.probation_end_date {
        AccrualOutcome::OnProbation
    } else if facts.date_of_joining > month_start {
        AccrualOutcome::JoinedMidMonth
    } else {
        AccrualOutcome::Accrued
    };

    let amount = if outcome == AccrualOutcome::Accrued {
        rate
    } else {
        Decimal::ZERO
    };

    let reasoning = match outcome {
        AccrualOutcome::Accrued => format!(
            "Accrued {} day(s) for {}",
            rate,
            month_start.format("%B %Y")
        ),
        AccrualOutcome::OnProbation => format!(
            "On probation until {}; no accrual",
            facts.probation_end_date
        ),
        AccrualOutcome::JoinedMidMonth => format!(
            "Joined {} after the start of the month; accrual starts next month",
            facts.date_of_joining
        ),
        AccrualOutcome::Inactive => "Employee is inactive; no accrual".to_string(),
    };

    AccrualDecision {
        amount,
        outcome,
        audit_step: AuditStep {
            step_number,
            rule_id: "monthly_accrual".to_string(),
            rule_name: "Monthly Earned Leave Accrual".to_string(),
            policy_ref: "leave_policy.monthly_accrual_rate".to_string(),
            input: serde_json::json!({
                "run_date": run_date.to_string(),
                "date_of_joining": facts.date_of_joining.to_string(),
                "probation_end_date": facts.probation_end_date.to_string(),
                "rate": rate.to_string(),
            }),
            output: serde_json::json!({
                "outcome": outcome,
                "amount": amount.to_string(),
            }),
            reasoning,
        },
    }
}

/// Earned leave allocated when a balance is initialized mid-year.
#[derive(Debug, Clone)]
pub struct EarnedAllocation {
    /// Months of accrual credited.
    pub months: u32,
    /// `months * rate`.
    pub accrued: Decimal,
    /// Days carried from the previous year.
    pub carry_forward: Decimal,
    /// `accrued + carry_forward`.
    pub total: Decimal,
    /// The audit step recording this allocation.
    pub audit_step: AuditStep,
}

/// Computes the opening Earned balance for an employee in `today`'s year.
///
/// - On probation: only the carry-forward.
/// - Joined and finished probation before this year: one accrual per
///   month up to and including the current month.
/// - Otherwise: one accrual per full month since probation ended.
///
/// When `current_month_accrued` is false the monthly job has not yet run
/// for `today`'s month and will credit it itself, so that month is left
/// out of the opening figure.
pub fn initial_earned_allocation(
    date_of_joining: NaiveDate,
    probation: &ProbationStatus,
    today: NaiveDate,
    rate: Decimal,
    carry_forward: Decimal,
    current_month_accrued: bool,
    step_number: u32,
) -> EarnedAllocation {
    let months = if probation.on_probation {
        0
    } else if date_of_joining.year() < today.year() && probation.end_date.year() < today.year() {
        today.month()
    } else {
        probation.months_after_probation
    };
    let months = if current_month_accrued {
        months
    } else {
        months.saturating_sub(1)
    };

    let accrued = rate * Decimal::from(months);
    let total = accrued + carry_forward;

    let reasoning = if probation.on_probation {
        format!(
            "On probation until {}; opening balance is the carry-forward of {}",
            probation.end_date, carry_forward
        )
    } else {
        format!(
            "{} month(s) at {} plus carry-forward {} = {}",
            months, rate, carry_forward, total
        )
    };

    EarnedAllocation {
        months,
        accrued,
        carry_forward,
        total,
        audit_step: AuditStep {
            step_number,
            rule_id: "initial_earned_allocation".to_string(),
            rule_name: "Opening Earned Leave Allocation".to_string(),
            policy_ref: "leave_policy.monthly_accrual_rate".to_string(),
            input: serde_json::json!({
                "date_of_joining": date_of_joining.to_string(),
                "probation_end_date": probation.end_date.to_string(),
                "today": today.to_string(),
                "rate": rate.to_string(),
                "carry_forward": carry_forward.to_string(),
                "current_month_accrued": current_month_accrued,
            }),
            output: serde_json::json!({
                "months": months,
                "accrued": accrued.to_string(),
                "total": total.to_string(),
            }),
            reasoning,
        },
    }
}
