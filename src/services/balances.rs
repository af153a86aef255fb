//! Leave balance persistence: opening balances, probation end, deductions
//! and manual adjustments.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigLoader, LeavePolicy};
use crate::entities::{self, employee, leave_balance, leave_type, LeaveKind};
use crate::error::{HrmsError, HrmsResult};
use crate::models::AuditTrace;
use super::leave_jobs::{job_has_run, monthly_accrual_key};
use crate::rules::{
    carry_forward, initial_earned_allocation, probation_audit_step, probation_status,
    BalanceFigures,
};

/// Monthly accrual rate for a leave type, falling back to the policy rate.
pub fn accrual_rate(leave_type: &leave_type::Model, policy: &LeavePolicy) -> Decimal {
    if leave_type.accrual_rate > Decimal::ZERO {
        leave_type.accrual_rate
    } else {
        policy.monthly_accrual_rate
    }
}

/// Carry-forward cap for a leave type, falling back to the policy cap.
pub fn carry_cap(leave_type: &leave_type::Model, policy: &LeavePolicy) -> Decimal {
    if leave_type.max_carry_forward > Decimal::ZERO {
        leave_type.max_carry_forward
    } else {
        policy.max_carry_forward
    }
}

/// The running figures of a stored balance.
pub fn figures(balance: &leave_balance::Model) -> BalanceFigures {
    BalanceFigures {
        total: balance.total,
        taken: balance.taken,
        remaining: balance.remaining,
    }
}

/// Fetches the balance of one employee, leave type and year.
pub async fn find_balance<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type_id: i32,
    year: i32,
) -> HrmsResult<Option<leave_balance::Model>> {
    Ok(entities::LeaveBalance::find()
        .filter(leave_balance::Column::EmployeeId.eq(employee_id))
        .filter(leave_balance::Column::LeaveTypeId.eq(leave_type_id))
        .filter(leave_balance::Column::Year.eq(year))
        .one(db)
        .await?)
}

/// Inserts a new balance row.
pub async fn insert_balance<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type_id: i32,
    year: i32,
    figures: BalanceFigures,
    carried: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    let model = leave_balance::ActiveModel {
        employee_id: Set(employee_id),
        leave_type_id: Set(leave_type_id),
        year: Set(year),
        total: Set(figures.total),
        taken: Set(figures.taken),
        remaining: Set(figures.remaining),
        carry_forward: Set(carried),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// Writes new running figures to an existing balance.
pub async fn store_figures<C: ConnectionTrait>(
    db: &C,
    balance: leave_balance::Model,
    figures: BalanceFigures,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    let mut active: leave_balance::ActiveModel = balance.into();
    active.total = Set(figures.total);
    active.taken = Set(figures.taken);
    active.remaining = Set(figures.remaining);
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}

/// Adds freshly allocated days, creating the balance when missing.
pub async fn allocate<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type_id: i32,
    year: i32,
    days: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    match find_balance(db, employee_id, leave_type_id, year).await? {
        Some(balance) => {
            let next = figures(&balance).allocate(days);
            store_figures(db, balance, next, now).await
        }
        None => {
            insert_balance(
                db,
                employee_id,
                leave_type_id,
                year,
                BalanceFigures::opening(days),
                Decimal::ZERO,
                now,
            )
            .await
        }
    }
}

/// Charges `days` of paid leave.
///
/// # Errors
///
/// `BalanceNotFound` when the employee has no balance for the year and
/// `InsufficientBalance` when fewer than `days` remain.
pub async fn deduct<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type: &leave_type::Model,
    year: i32,
    days: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    let balance = find_balance(db, employee_id, leave_type.id, year)
        .await?
        .ok_or_else(|| HrmsError::BalanceNotFound {
            leave_type: leave_type.name.clone(),
            year,
        })?;
    let next = figures(&balance)
        .deduct(days)
        .ok_or_else(|| HrmsError::InsufficientBalance {
            leave_type: leave_type.name.clone(),
            available: balance.remaining,
            requested: days,
        })?;
    debug!(employee_id, leave_type = %leave_type.name, %days, "Deducting leave balance");
    store_figures(db, balance, next, now).await
}

/// Gives back `days` of paid leave. A missing balance is left alone.
pub async fn restore<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type: &leave_type::Model,
    year: i32,
    days: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<Option<leave_balance::Model>> {
    match find_balance(db, employee_id, leave_type.id, year).await? {
        Some(balance) => {
            let next = figures(&balance).restore(days);
            debug!(employee_id, leave_type = %leave_type.name, %days, "Restoring leave balance");
            Ok(Some(store_figures(db, balance, next, now).await?))
        }
        None => Ok(None),
    }
}

/// Records unpaid days, creating the Unpaid balance when missing.
pub async fn record_unpaid<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type_id: i32,
    year: i32,
    days: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    match find_balance(db, employee_id, leave_type_id, year).await? {
        Some(balance) => {
            let next = figures(&balance).record_unpaid(days);
            store_figures(db, balance, next, now).await
        }
        None => {
            let opening = BalanceFigures::opening(Decimal::ZERO).record_unpaid(days);
            insert_balance(db, employee_id, leave_type_id, year, opening, Decimal::ZERO, now)
                .await
        }
    }
}

/// Reverses previously recorded unpaid days.
pub async fn reverse_unpaid<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    leave_type_id: i32,
    year: i32,
    days: Decimal,
    now: NaiveDateTime,
) -> HrmsResult<Option<leave_balance::Model>> {
    match find_balance(db, employee_id, leave_type_id, year).await? {
        Some(balance) => {
            let next = figures(&balance).reverse_unpaid(days);
            Ok(Some(store_figures(db, balance, next, now).await?))
        }
        None => Ok(None),
    }
}

/// Balances created for a new employee.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceInitialization {
    /// Rows inserted.
    pub created: Vec<leave_balance::Model>,
    /// Decision trace.
    pub trace: AuditTrace,
}

/// Creates the opening balances of `employee` for `today`'s year.
///
/// Existing balances are left untouched. Earned leave follows
/// [`initial_earned_allocation`]; Optional is only granted after
/// probation; Unpaid opens at zero; every other kind with an annual
/// allocation opens at that allocation.
pub async fn initialize_balances<C: ConnectionTrait>(
    db: &C,
    employee: &employee::Model,
    config: &ConfigLoader,
    today: NaiveDate,
    now: NaiveDateTime,
) -> HrmsResult<BalanceInitialization> {
    let policy = config.leave_policy();
    let year = today.year();
    let probation = probation_status(
        employee.date_of_joining,
        employee.probation_period_days,
        today,
    );

    let mut trace = AuditTrace::default();
    trace.push(probation_audit_step(&probation, today, trace.next_step()));
    let current_month_accrued = job_has_run(db, &monthly_accrual_key(today)).await?;

    let leave_types = entities::LeaveType::find()
        .filter(leave_type::Column::IsActive.eq(true))
        .order_by_asc(leave_type::Column::Id)
        .all(db)
        .await?;

    let mut created = Vec::new();
    for leave_type in leave_types {
        if find_balance(db, employee.id, leave_type.id, year)
            .await?
            .is_some()
        {
            continue;
        }

        let (opening, carried) = match leave_type.kind {
            LeaveKind::Earned => {
                let mut carried = Decimal::ZERO;
                if employee.date_of_joining.year() < year {
                    if let Some(previous) =
                        find_balance(db, employee.id, leave_type.id, year - 1).await?
                    {
                        let result = carry_forward(
                            previous.remaining,
                            carry_cap(&leave_type, policy),
                            trace.next_step(),
                        );
                        carried = result.carried;
                        trace.push(result.audit_step);
                    }
                }
                let allocation = initial_earned_allocation(
                    employee.date_of_joining,
                    &probation,
                    today,
                    accrual_rate(&leave_type, policy),
                    carried,
                    current_month_accrued,
                    trace.next_step(),
                );
                trace.push(allocation.audit_step);
                (allocation.total, carried)
            }
            LeaveKind::Optional if probation.on_probation => continue,
            LeaveKind::Optional => (policy.optional_usable_per_year, Decimal::ZERO),
            LeaveKind::Unpaid => (Decimal::ZERO, Decimal::ZERO),
            _ if leave_type.annual_allocation > Decimal::ZERO => {
                (leave_type.annual_allocation, Decimal::ZERO)
            }
            _ => continue,
        };

        let row = insert_balance(
            db,
            employee.id,
            leave_type.id,
            year,
            BalanceFigures::opening(opening),
            carried,
            now,
        )
        .await?;
        created.push(row);
    }

    info!(
        employee_id = employee.id,
        year,
        created = created.len(),
        on_probation = probation.on_probation,
        "Initialized leave balances"
    );

    Ok(BalanceInitialization { created, trace })
}

/// Re-computes Earned and Optional balances once probation has ended.
///
/// Earned total becomes `months_after_probation * rate + carry_forward`,
/// less the current month while its accrual job is still to run;
/// Optional total becomes the yearly usable quota. Days already taken are
/// kept, and missing balances are created.
pub async fn apply_probation_end<C: ConnectionTrait>(
    db: &C,
    employee: &employee::Model,
    config: &ConfigLoader,
    today: NaiveDate,
    now: NaiveDateTime,
) -> HrmsResult<AuditTrace> {
    let policy = config.leave_policy();
    let year = today.year();
    let probation = probation_status(
        employee.date_of_joining,
        employee.probation_period_days,
        today,
    );
    let mut trace = AuditTrace::default();
    trace.push(probation_audit_step(&probation, today, trace.next_step()));

    let earned = super::leave_type_by_kind(db, LeaveKind::Earned).await?;
    let rate = accrual_rate(&earned, policy);
    let existing = find_balance(db, employee.id, earned.id, year).await?;
    let carried = existing
        .as_ref()
        .map(|b| b.carry_forward)
        .unwrap_or(Decimal::ZERO);
    let mut months = probation.months_after_probation;
    if !job_has_run(db, &monthly_accrual_key(today)).await? {
        months = months.saturating_sub(1);
    }
    let total = rate * Decimal::from(months) + carried;
    match existing {
        Some(balance) => {
            let next = figures(&balance).reallocate(total);
            store_figures(db, balance, next, now).await?;
        }
        None => {
            insert_balance(
                db,
                employee.id,
                earned.id,
                year,
                BalanceFigures::opening(total),
                carried,
                now,
            )
            .await?;
        }
    }

    let optional = super::leave_type_by_kind(db, LeaveKind::Optional).await?;
    let quota = policy.optional_usable_per_year;
    match find_balance(db, employee.id, optional.id, year).await? {
        Some(balance) => {
            let next = figures(&balance).reallocate(quota);
            store_figures(db, balance, next, now).await?;
        }
        None => {
            insert_balance(
                db,
                employee.id,
                optional.id,
                year,
                BalanceFigures::opening(quota),
                Decimal::ZERO,
                now,
            )
            .await?;
        }
    }

    info!(
        employee_id = employee.id,
        months,
        earned_total = %total,
        "Applied probation end to leave balances"
    );
    Ok(trace)
}

/// One balance with its leave type.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceView {
    /// Balance id.
    pub id: i32,
    /// Leave type id.
    pub leave_type_id: i32,
    /// Leave type name.
    pub leave_type: String,
    /// Leave type kind.
    pub kind: LeaveKind,
    /// Calendar year.
    pub year: i32,
    /// Days allocated.
    pub total: Decimal,
    /// Days used.
    pub taken: Decimal,
    /// Days left.
    pub remaining: Decimal,
    /// Days carried in from the previous year.
    pub carry_forward: Decimal,
}

/// An employee's balances for a year, ordered by leave type.
pub async fn employee_balances<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    year: i32,
) -> HrmsResult<Vec<BalanceView>> {
    super::find_employee(db, employee_id).await?;
    let types: HashMap<i32, leave_type::Model> = entities::LeaveType::find()
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let balances = entities::LeaveBalance::find()
        .filter(leave_balance::Column::EmployeeId.eq(employee_id))
        .filter(leave_balance::Column::Year.eq(year))
        .order_by_asc(leave_balance::Column::LeaveTypeId)
        .all(db)
        .await?;

    Ok(balances
        .into_iter()
        .filter_map(|b| {
            let leave_type = types.get(&b.leave_type_id)?;
            Some(BalanceView {
                id: b.id,
                leave_type_id: b.leave_type_id,
                leave_type: leave_type.name.clone(),
                kind: leave_type.kind,
                year: b.year,
                total: b.total,
                taken: b.taken,
                remaining: b.remaining,
                carry_forward: b.carry_forward,
            })
        })
        .collect())
}

/// A manual balance entry made by HR.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceAdjustment {
    /// Employee making the change; must hold an HR role.
    pub actor_id: i32,
    /// Employee whose balance changes.
    pub employee_id: i32,
    /// Leave type.
    pub leave_type_id: i32,
    /// Calendar year.
    pub year: i32,
    /// New total.
    pub total: Decimal,
    /// New taken figure; the current value is kept when omitted.
    #[serde(default)]
    pub taken: Option<Decimal>,
}

/// Adds or edits a balance by hand, keeping `remaining = total - taken`.
pub async fn adjust_balance<C: ConnectionTrait>(
    db: &C,
    input: BalanceAdjustment,
    now: NaiveDateTime,
) -> HrmsResult<leave_balance::Model> {
    let actor = super::require_hr(db, input.actor_id).await?;
    super::find_employee(db, input.employee_id).await?;
    entities::LeaveType::find_by_id(input.leave_type_id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave type", input.leave_type_id))?;

    if input.total < Decimal::ZERO {
        return Err(HrmsError::validation("total", "must not be negative"));
    }
    if input.taken.is_some_and(|t| t < Decimal::ZERO) {
        return Err(HrmsError::validation("taken", "must not be negative"));
    }

    let existing =
        find_balance(db, input.employee_id, input.leave_type_id, input.year).await?;
    let taken = input
        .taken
        .or_else(|| existing.as_ref().map(|b| b.taken))
        .unwrap_or(Decimal::ZERO);
    let next = BalanceFigures {
        total: input.total,
        taken,
        remaining: input.total - taken,
    };

    let saved = match existing {
        Some(balance) => store_figures(db, balance, next, now).await?,
        None => {
            insert_balance(
                db,
                input.employee_id,
                input.leave_type_id,
                input.year,
                next,
                Decimal::ZERO,
                now,
            )
            .await?
        }
    };
    info!(
        actor = %actor.employee_code,
        employee_id = input.employee_id,
        leave_type_id = input.leave_type_id,
        year = input.year,
        total = %saved.total,
        remaining = %saved.remaining,
        "Balance adjusted"
    );
    Ok(saved)
}
