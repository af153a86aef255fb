//! Paid/unpaid splitting of a leave request.
//!
//! When the balance cannot cover a request, the covered days stay on the
//! requested leave type and the rest are booked as unpaid leave.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::AuditStep;

/// How a request was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitOutcome {
    /// The balance covers every day.
    FullyPaid,
    /// Part paid, part unpaid.
    Partial,
    /// No usable balance; everything is unpaid.
    FullyUnpaid,
}

/// The split decision, including the audit step.
#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    /// Days charged to the requested leave type.
    pub paid_days: Decimal,
    /// Days booked against the Unpaid type.
    pub unpaid_days: Decimal,
    /// Which case applied.
    pub outcome: SplitOutcome,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Splits `requested` days against an available balance.
///
/// `available` is `None` when the employee has no balance row for the leave
/// type in the request's year.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use hrms_engine::rules::{split_paid_unpaid, SplitOutcome};
///
/// let plan = split_paid_unpaid(Decimal::from(5), Some(Decimal::from(3)), 1);
/// assert_eq!(plan.outcome, SplitOutcome::Partial);
/// assert_eq!(plan.paid_days, Decimal::from(3));
/// assert_eq!(plan.unpaid_days, Decimal::from(2));
/// ```
pub fn split_paid_unpaid(requested: Decimal, available: Option<Decimal>, step_number: u32) -> SplitPlan {
    let available_days = available.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);

    let (paid_days, unpaid_days, outcome) = if available_days >= requested {
        (requested, Decimal::ZERO, SplitOutcome::FullyPaid)
    } else if available_days > Decimal::ZERO {
        (
            available_days,
            requested - available_days,
            SplitOutcome::Partial,
        )
    } else {
        (Decimal::ZERO, requested, SplitOutcome::FullyUnpaid)
    };

    let reasoning = match outcome {
        SplitOutcome::FullyPaid => format!(
            "Balance of {} covers all {} day(s)",
            available_days, requested
        ),
        SplitOutcome::Partial => format!(
            "Balance of {} covers part of {} day(s); {} day(s) booked as unpaid",
            available_days, requested, unpaid_days
        ),
        SplitOutcome::FullyUnpaid => match available {
            Some(_) => format!("No balance left; all {} day(s) booked as unpaid", requested),
            None => format!(
                "No balance exists for this leave type; all {} day(s) booked as unpaid",
                requested
            ),
        },
    };

    SplitPlan {
        paid_days,
        unpaid_days,
        outcome,
        audit_step: AuditStep {
            step_number,
            rule_id: "paid_unpaid_split".to_string(),
            rule_name: "Paid/Unpaid Split".to_string(),
            policy_ref: "leave_types.unpaid".to_string(),
            input: serde_json::json!({
                "requested": requested.to_string(),
                "available": available.map(|a| a.to_string()),
            }),
            output: serde_json::json!({
                "paid_days": paid_days.to_string(),
                "unpaid_days": unpaid_days.to_string(),
                "outcome": outcome,
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_fully_paid_when_balance_suffices() {
        let plan = split_paid_unpaid(dec("3"), Some(dec("3")), 1);
        assert_eq!(plan.outcome, SplitOutcome::FullyPaid);
        assert_eq!(plan.paid_days, dec("3"));
        assert_eq!(plan.unpaid_days, Decimal::ZERO);
    }

    #[test]
    fn test_partial_split_with_half_day_balance() {
        let plan = split_paid_unpaid(dec("2"), Some(dec("0.5")), 1);
        assert_eq!(plan.outcome, SplitOutcome::Partial);
        assert_eq!(plan.paid_days, dec("0.5"));
        assert_eq!(plan.unpaid_days, dec("1.5"));
    }

    #[test]
    fn test_zero_balance_is_fully_unpaid() {
        let plan = split_paid_unpaid(dec("2"), Some(Decimal::ZERO), 1);
        assert_eq!(plan.outcome, SplitOutcome::FullyUnpaid);
        assert_eq!(plan.unpaid_days, dec("2"));
    }

    #[test]
    fn test_missing_balance_is_fully_unpaid() {
        let plan = split_paid_unpaid(dec("1"), None, 1);
        assert_eq!(plan.outcome, SplitOutcome::FullyUnpaid);
        assert!(plan.audit_step.reasoning.contains("No balance exists"));
    }

    proptest! {
        #[test]
        fn prop_split_sums_to_request(req_halves in 1i64..60, avail_halves in -4i64..80) {
            let requested = Decimal::new(req_halves * 5, 1);
            let available = Decimal::new(avail_halves * 5, 1);
            let plan = split_paid_unpaid(requested, Some(available), 1);
            prop_assert_eq!(plan.paid_days + plan.unpaid_days, requested);
            prop_assert!(plan.paid_days <= available.max(Decimal::ZERO));
            prop_assert!(plan.unpaid_days >= Decimal::ZERO);
        }
    }
}
