//! Year-end carry-forward rule.
//!
//! Unused earned leave moves into the next year up to a cap; anything above
//! the cap is forfeited.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::AuditStep;

/// The result of a carry-forward decision, including the audit step.
#[derive(Debug, Clone, Serialize)]
pub struct CarryForwardResult {
    /// Days moved into the next year.
    pub carried: Decimal,
    /// Days lost because they exceed the cap.
    pub forfeited: Decimal,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Splits a year-end remaining balance into carried and forfeited days.
///
/// # Arguments
///
/// * `remaining` - Earned days remaining at the end of the year
/// * `cap` - Maximum days that may be carried (12 by default)
/// * `step_number` - Audit step number
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use hrms_engine::rules::carry_forward;
///
/// let result = carry_forward(Decimal::from(15), Decimal::from(12), 1);
/// assert_eq!(result.carried, Decimal::from(12));
/// assert_eq!(result.forfeited, Decimal::from(3));
/// ```
pub fn carry_forward(remaining: Decimal, cap: Decimal, step_number: u32) -> CarryForwardResult {
    let remaining_positive = remaining.max(Decimal::ZERO);
    let carried = remaining_positive.min(cap.max(Decimal::ZERO));
    let forfeited = remaining_positive - carried;

    let reasoning = if forfeited > Decimal::ZERO {
        format!(
            "{} day(s) remaining exceed the cap of {}; carried {}, forfeited {}",
            remaining_positive, cap, carried, forfeited
        )
    } else {
        format!("Carried all {} remaining day(s)", carried)
    };

    CarryForwardResult {
        carried,
        forfeited,
        audit_step: AuditStep {
            step_number,
            rule_id: "carry_forward".to_string(),
            rule_name: "Year-end Carry Forward".to_string(),
            policy_ref: "leave_policy.max_carry_forward".to_string(),
            input: serde_json::json!({
                "remaining": remaining.to_string(),
                "cap": cap.to_string(),
            }),
            output: serde_json::json!({
                "carried": carried.to_string(),
                "forfeited": forfeited.to_string(),
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
    fn test_below_cap_carries_everything() {
        let result = carry_forward(dec("7.5"), dec("12"), 1);
        assert_eq!(result.carried, dec("7.5"));
        assert_eq!(result.forfeited, Decimal::ZERO);
    }

    #[test]
    fn test_exactly_cap() {
        let result = carry_forward(dec("12"), dec("12"), 1);
        assert_eq!(result.carried, dec("12"));
        assert_eq!(result.forfeited, Decimal::ZERO);
    }

    #[test]
    fn test_above_cap_forfeits_excess() {
        let result = carry_forward(dec("18.5"), dec("12"), 1);
        assert_eq!(result.carried, dec("12"));
        assert_eq!(result.forfeited, dec("6.5"));
        assert!(result.audit_step.reasoning.contains("forfeited 6.5"));
    }

    #[test]
    fn test_negative_remaining_carries_nothing() {
        let result = carry_forward(dec("-1"), dec("12"), 1);
        assert_eq!(result.carried, Decimal::ZERO);
        assert_eq!(result.forfeited, Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_carried_is_min_of_remaining_and_cap(halves in 0i64..200) {
            let remaining = Decimal::new(halves * 5, 1);
            let cap = Decimal::from(12);
            let result = carry_forward(remaining, cap, 1);
            prop_assert_eq!(result.carried, remaining.min(cap));
            prop_assert_eq!(result.carried + result.forfeited, remaining);
        }
    }
}
