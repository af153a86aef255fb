//! Optional holiday quota.
//!
//! Employees are allocated a list of optional holidays but may only take a
//! limited number of them per year.

use rust_decimal::Decimal;

use crate::error::{HrmsError, HrmsResult};
use crate::models::AuditStep;

/// A passed quota check, including the audit step.
#[derive(Debug, Clone)]
pub struct OptionalQuotaCheck {
    /// Days still usable after this request.
    pub usable_after: Decimal,
    /// The audit step recording the check.
    pub audit_step: AuditStep,
}

/// Checks whether `requested` optional days may be taken.
///
/// # Arguments
///
/// * `taken` - Optional days already taken this year
/// * `remaining` - Days remaining on the Optional balance
/// * `requested` - Days requested now
/// * `usable_per_year` - Yearly usage cap (2 by default)
///
/// # Errors
///
/// `Validation` on field `optional_holidays` when the cap is already used,
/// when the request would exceed the cap, or when the balance cannot cover it.
pub fn check_optional_quota(
    taken: Decimal,
    remaining: Decimal,
    requested: Decimal,
    usable_per_year: Decimal,
    step_number: u32,
) -> HrmsResult<OptionalQuotaCheck> {
    if taken >= usable_per_year {
        return Err(HrmsError::validation(
            "optional_holidays",
            format!(
                "You have already used your {} optional holidays for this year",
                usable_per_year
            ),
        ));
    }
    let usable_left = usable_per_year - taken;
    if requested > usable_left {
        return Err(HrmsError::validation(
            "optional_holidays",
            format!("You can only take {} more optional holiday(s) this year", usable_left),
        ));
    }
    if requested > remaining {
        return Err(HrmsError::validation(
            "optional_holidays",
            format!("Only {} optional holiday(s) remaining in your balance", remaining),
        ));
    }

    let usable_after = usable_left - requested;
    Ok(OptionalQuotaCheck {
        usable_after,
        audit_step: AuditStep {
            step_number,
            rule_id: "optional_quota".to_string(),
            rule_name: "Optional Holiday Quota".to_string(),
            policy_ref: "leave_policy.optional_usable_per_year".to_string(),
            input: serde_json::json!({
                "taken": taken.to_string(),
                "remaining": remaining.to_string(),
                "requested": requested.to_string(),
                "usable_per_year": usable_per_year.to_string(),
            }),
            output: serde_json::json!({ "usable_after": usable_after.to_string() }),
            reasoning: format!(
                "{} of {} optional holiday(s) used; {} requested, {} left afterwards",
                taken, usable_per_year, requested, usable_after
            ),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_first_optional_holiday_allowed() {
        let check = check_optional_quota(n(0), n(2), n(1), n(2), 1).unwrap();
        assert_eq!(check.usable_after, n(1));
    }

    #[test]
    fn test_cap_already_used() {
        let err = check_optional_quota(n(2), n(2), n(1), n(2), 1).unwrap_err();
        assert!(err.to_string().contains("already used"));
    }

    #[test]
    fn test_request_exceeding_cap() {
        let err = check_optional_quota(n(1), n(3), n(2), n(2), 1).unwrap_err();
        assert!(err.to_string().contains("only take 1 more"));
    }

    #[test]
    fn test_request_exceeding_balance() {
        let err = check_optional_quota(n(0), n(1), n(2), n(2), 1).unwrap_err();
        assert!(err.to_string().contains("remaining in your balance"));
    }
}
