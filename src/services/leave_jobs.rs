//! Batch leave jobs: monthly accrual, year-end carry-forward and comp-off
//! expiry.
//!
//! Accrual and year-end are recorded in `system_state` under a run key, so
//! a second run for the same month or year is a no-op.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ConfigLoader;
use crate::entities::{
    self, comp_off_grant, comp_off_grant::CompOffStatus, employee, leave_balance, system_state,
    EmployeeStatus, LeaveKind,
};
use crate::error::HrmsResult;
use crate::models::AuditStep;
use crate::rules::{carry_forward, monthly_accrual, probation_status, AccrualFacts, AccrualOutcome, BalanceFigures};

use super::balances::{self, accrual_rate, carry_cap, figures, find_balance, insert_balance, store_figures};

/// Run key of the monthly accrual for the month containing `date`.
pub fn monthly_accrual_key(date: NaiveDate) -> String {
    format!("monthly_accrual:{}", date.format("%Y-%m"))
}

/// Run key of the year-end job for `year`.
pub fn year_end_key(year: i32) -> String {
    format!("year_end:{}", year)
}

/// Whether a job with `key` has already completed.
pub async fn job_has_run<C: ConnectionTrait>(db: &C, key: &str) -> HrmsResult<bool> {
    Ok(entities::SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?
        .is_some())
}

async fn record_job_run<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: String,
    now: NaiveDateTime,
) -> HrmsResult<()> {
    let existing = entities::SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    match existing {
        Some(state) => {
            let mut active: system_state::ActiveModel = state.into();
            active.value = Set(value);
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            system_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// Accrual decision for one employee.
#[derive(Debug, Clone, Serialize)]
pub struct AccrualEntry {
    pub employee_id: i32,
    pub employee_code: String,
    pub outcome: AccrualOutcome,
    pub amount: Decimal,
    pub audit_step: AuditStep,
}

/// Result of a monthly accrual run.
#[derive(Debug, Clone, Serialize)]
pub struct AccrualRun {
    /// Month processed (`YYYY-MM`).
    pub period: String,
    /// True when the month had already been processed; nothing changed.
    pub already_run: bool,
    pub processed: usize,
    pub skipped_probation: usize,
    pub skipped_joined_mid_month: usize,
    pub entries: Vec<AccrualEntry>,
}

/// Adds the monthly Earned accrual for every eligible active employee.
///
/// Runs at most once per calendar month of `today`. Any day of the month
/// may trigger it, so a missed first-of-month run is caught up later.
pub async fn run_monthly_accrual(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    today: NaiveDate,
    now: NaiveDateTime,
) -> HrmsResult<AccrualRun> {
    let key = monthly_accrual_key(today);
    let period = today.format("%Y-%m").to_string();

    if job_has_run(db, &key).await? {
        info!(period = %period, "Monthly accrual already run");
        return Ok(AccrualRun {
            period,
            already_run: true,
            processed: 0,
            skipped_probation: 0,
            skipped_joined_mid_month: 0,
            entries: Vec::new(),
        });
    }

    let txn = db.begin().await?;
    let earned = super::leave_type_by_kind(&txn, LeaveKind::Earned).await?;
    let rate = accrual_rate(&earned, config.leave_policy());

    let employees = entities::Employee::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .order_by_asc(employee::Column::Id)
        .all(&txn)
        .await?;

    let mut run = AccrualRun {
        period,
        already_run: false,
        processed: 0,
        skipped_probation: 0,
        skipped_joined_mid_month: 0,
        entries: Vec::with_capacity(employees.len()),
    };

    for employee in employees {
        let facts = AccrualFacts {
            is_active: employee.is_active(),
            date_of_joining: employee.date_of_joining,
            probation_end_date: employee.probation_end_date,
        };
        let decision = monthly_accrual(&facts, today, rate, 1);
        match decision.outcome {
            AccrualOutcome::Accrued => {
                balances::allocate(&txn, employee.id, earned.id, today.year(), decision.amount, now)
                    .await?;
                run.processed += 1;
            }
            AccrualOutcome::OnProbation => run.skipped_probation += 1,
            AccrualOutcome::JoinedMidMonth => run.skipped_joined_mid_month += 1,
            AccrualOutcome::Inactive => {}
        }
        debug!(
            employee_id = employee.id,
            outcome = ?decision.outcome,
            amount = %decision.amount,
            "Accrual decision"
        );
        run.entries.push(AccrualEntry {
            employee_id: employee.id,
            employee_code: employee.employee_code,
            outcome: decision.outcome,
            amount: decision.amount,
            audit_step: decision.audit_step,
        });
    }

    record_job_run(&txn, &key, today.to_string(), now).await?;
    txn.commit().await?;

    info!(
        period = %run.period,
        processed = run.processed,
        skipped_probation = run.skipped_probation,
        skipped_joined_mid_month = run.skipped_joined_mid_month,
        "Monthly accrual complete"
    );
    Ok(run)
}

/// Carry-forward of one employee's Earned balance.
#[derive(Debug, Clone, Serialize)]
pub struct CarryForwardEntry {
    pub employee_id: i32,
    pub employee_code: String,
    pub remaining: Decimal,
    pub carried: Decimal,
    pub forfeited: Decimal,
    pub audit_step: AuditStep,
}

/// Result of a year-end run.
#[derive(Debug, Clone, Serialize)]
pub struct YearEndRun {
    /// Year closed.
    pub year: i32,
    pub already_run: bool,
    /// Employees whose Earned balance was carried into the next year.
    pub carried_forward: Vec<CarryForwardEntry>,
    pub optional_reset: usize,
    pub optional_initialized: usize,
    pub sick_reset: usize,
    pub comp_off_reset: usize,
}

async fn zero_remaining<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    kind: LeaveKind,
    year: i32,
    now: NaiveDateTime,
) -> HrmsResult<bool> {
    let Ok(leave_type) = super::leave_type_by_kind(db, kind).await else {
        return Ok(false);
    };
    match find_balance(db, employee_id, leave_type.id, year).await? {
        Some(balance) => {
            let mut active: leave_balance::ActiveModel = balance.into();
            active.remaining = Set(Decimal::ZERO);
            active.updated_at = Set(now);
            active.update(db).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Closes `year`: carries Earned leave into `year + 1` up to the cap,
/// forfeits unused Optional, Sick and Comp-off days, and opens the next
/// year's Optional allocation for employees past probation.
pub async fn run_year_end(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    year: i32,
    now: NaiveDateTime,
) -> HrmsResult<YearEndRun> {
    let key = year_end_key(year);
    if job_has_run(db, &key).await? {
        info!(year, "Year-end already run");
        return Ok(YearEndRun {
            year,
            already_run: true,
            carried_forward: Vec::new(),
            optional_reset: 0,
            optional_initialized: 0,
            sick_reset: 0,
            comp_off_reset: 0,
        });
    }

    let policy = config.leave_policy();
    let next_year = year + 1;
    let next_year_start = NaiveDate::from_ymd_opt(next_year, 1, 1)
        .ok_or_else(|| crate::error::HrmsError::validation("year", format!("{} is out of range", year)))?;

    let txn = db.begin().await?;
    let earned = super::leave_type_by_kind(&txn, LeaveKind::Earned).await?;
    let optional = super::leave_type_by_kind(&txn, LeaveKind::Optional).await.ok();
    let cap = carry_cap(&earned, policy);

    let employees = entities::Employee::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .order_by_asc(employee::Column::Id)
        .all(&txn)
        .await?;

    let mut run = YearEndRun {
        year,
        already_run: false,
        carried_forward: Vec::new(),
        optional_reset: 0,
        optional_initialized: 0,
        sick_reset: 0,
        comp_off_reset: 0,
    };

    for employee in employees {
        if let Some(balance) = find_balance(&txn, employee.id, earned.id, year).await? {
            if balance.remaining > Decimal::ZERO {
                let result = carry_forward(balance.remaining, cap, 1);
                match find_balance(&txn, employee.id, earned.id, next_year).await? {
                    Some(next) => {
                        let next_figures = figures(&next).allocate(result.carried);
                        let mut active: leave_balance::ActiveModel = next.into();
                        active.total = Set(next_figures.total);
                        active.remaining = Set(next_figures.remaining);
                        active.carry_forward = Set(result.carried);
                        active.updated_at = Set(now);
                        active.update(&txn).await?;
                    }
                    None => {
                        insert_balance(
                            &txn,
                            employee.id,
                            earned.id,
                            next_year,
                            BalanceFigures::opening(result.carried),
                            result.carried,
                            now,
                        )
                        .await?;
                    }
                }
                run.carried_forward.push(CarryForwardEntry {
                    employee_id: employee.id,
                    employee_code: employee.employee_code.clone(),
                    remaining: balance.remaining,
                    carried: result.carried,
                    forfeited: result.forfeited,
                    audit_step: result.audit_step,
                });
            }
        }

        if zero_remaining(&txn, employee.id, LeaveKind::Optional, year, now).await? {
            run.optional_reset += 1;
        }
        if let Some(optional) = optional.as_ref() {
            let probation = probation_status(
                employee.date_of_joining,
                employee.probation_period_days,
                next_year_start,
            );
            let missing = find_balance(&txn, employee.id, optional.id, next_year)
                .await?
                .is_none();
            if !probation.on_probation && missing {
                insert_balance(
                    &txn,
                    employee.id,
                    optional.id,
                    next_year,
                    BalanceFigures::opening(policy.optional_allocation),
                    Decimal::ZERO,
                    now,
                )
                .await?;
                run.optional_initialized += 1;
            }
        }
        if zero_remaining(&txn, employee.id, LeaveKind::Sick, year, now).await? {
            run.sick_reset += 1;
        }
        if zero_remaining(&txn, employee.id, LeaveKind::CompOff, year, now).await? {
            run.comp_off_reset += 1;
        }
    }

    record_job_run(&txn, &key, now.to_string(), now).await?;
    txn.commit().await?;

    info!(
        year,
        carried = run.carried_forward.len(),
        optional_reset = run.optional_reset,
        optional_initialized = run.optional_initialized,
        sick_reset = run.sick_reset,
        comp_off_reset = run.comp_off_reset,
        "Year-end processing complete"
    );
    Ok(run)
}

/// Projected carry-forward of one employee.
#[derive(Debug, Clone, Serialize)]
pub struct CarryForwardSummaryRow {
    pub employee_id: i32,
    pub employee_code: String,
    pub employee_name: String,
    pub total: Decimal,
    pub taken: Decimal,
    pub remaining: Decimal,
    pub carry_forward: Decimal,
    pub forfeited: Decimal,
}

/// What each active employee would carry out of `year`'s Earned balance.
pub async fn carry_forward_summary<C: ConnectionTrait>(
    db: &C,
    config: &ConfigLoader,
    year: i32,
) -> HrmsResult<Vec<CarryForwardSummaryRow>> {
    let earned = super::leave_type_by_kind(db, LeaveKind::Earned).await?;
    let cap = carry_cap(&earned, config.leave_policy());
    let employees = entities::Employee::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .order_by_asc(employee::Column::EmployeeCode)
        .all(db)
        .await?;

    let mut rows = Vec::new();
    for employee in employees {
        let Some(balance) = find_balance(db, employee.id, earned.id, year).await? else {
            continue;
        };
        let result = carry_forward(balance.remaining, cap, 1);
        rows.push(CarryForwardSummaryRow {
            employee_id: employee.id,
            employee_name: employee.full_name(),
            employee_code: employee.employee_code,
            total: balance.total,
            taken: balance.taken,
            remaining: balance.remaining,
            carry_forward: result.carried,
            forfeited: result.forfeited,
        });
    }
    Ok(rows)
}

/// Result of a comp-off expiry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct CompOffExpiryRun {
    pub expired: usize,
    /// Days removed from Comp-off balances.
    pub days_removed: Decimal,
}

/// Expires every active comp-off grant whose validity ended before `today`.
///
/// Each expired grant removes up to one day from the remaining Comp-off
/// balance of its work-date year.
pub async fn expire_comp_offs(
    db: &DatabaseConnection,
    today: NaiveDate,
    now: NaiveDateTime,
) -> HrmsResult<CompOffExpiryRun> {
    let txn = db.begin().await?;
    let grants = entities::CompOffGrant::find()
        .filter(comp_off_grant::Column::Status.eq(CompOffStatus::Active))
        .filter(comp_off_grant::Column::ExpiresOn.lt(today))
        .order_by_asc(comp_off_grant::Column::Id)
        .all(&txn)
        .await?;

    let comp_off = super::leave_type_by_kind(&txn, LeaveKind::CompOff).await.ok();
    let mut run = CompOffExpiryRun {
        expired: 0,
        days_removed: Decimal::ZERO,
    };

    for grant in grants {
        if let Some(comp_off) = comp_off.as_ref() {
            if let Some(balance) =
                find_balance(&txn, grant.employee_id, comp_off.id, grant.work_date.year()).await?
            {
                let removed = balance.remaining.min(Decimal::ONE).max(Decimal::ZERO);
                if removed > Decimal::ZERO {
                    let current = figures(&balance);
                    let next = BalanceFigures {
                        total: current.total - removed,
                        taken: current.taken,
                        remaining: current.remaining - removed,
                    };
                    store_figures(&txn, balance, next, now).await?;
                    run.days_removed += removed;
                }
            }
        }
        let grant_id = grant.id;
        let mut active: comp_off_grant::ActiveModel = grant.into();
        active.status = Set(CompOffStatus::Expired);
        active.update(&txn).await?;
        run.expired += 1;
        debug!(grant_id, "Comp-off grant expired");
    }
    txn.commit().await?;

    info!(expired = run.expired, days_removed = %run.days_removed, "Comp-off expiry sweep complete");
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::leave_type_by_kind;
    use crate::services::test_support::{config, create_employee, date, setup_test_db};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn at(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(6, 0, 0).unwrap()
    }

    #[test]
    fn test_job_keys() {
        assert_eq!(monthly_accrual_key(date(2026, 3, 17)), "monthly_accrual:2026-03");
        assert_eq!(year_end_key(2025), "year_end:2025");
    }

    #[tokio::test]
    async fn test_monthly_accrual_runs_once_per_month() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let employee = create_employee(&db, &config, "EMP200", date(2020, 1, 6), date(2026, 10, 17)).await?;
        let earned = leave_type_by_kind(&db, LeaveKind::Earned).await?;
        let before = find_balance(&db, employee.id, earned.id, 2026).await?.unwrap().total;

        let first = run_monthly_accrual(&db, &config, date(2026, 11, 1), at(date(2026, 11, 1))).await?;
        assert!(!first.already_run);
        assert_eq!(first.processed, 1);

        let second = run_monthly_accrual(&db, &config, date(2026, 11, 15), at(date(2026, 11, 15))).await?;
        assert!(second.already_run);

        let after = find_balance(&db, employee.id, earned.id, 2026).await?.unwrap();
        assert_eq!(after.total, before + dec("1.5"));
        assert_eq!(after.remaining, after.total - after.taken);
        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_accrual_skips_probation_and_mid_month_joiners() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        create_employee(&db, &config, "EMP201", date(2026, 9, 1), date(2026, 10, 17)).await?;
        // Probation of a mid-November joiner is ongoing too; shorten it to
        // exercise the joining-date rule on its own.
        let mut input = crate::services::employees::NewEmployee::new(
            "EMP202",
            "Mid",
            "Month",
            "emp202@example.com",
            date(2026, 11, 3),
        );
        input.probation_period_days = Some(0);
        crate::services::employees::insert_employee(&db, &config, input, at(date(2026, 10, 17))).await?;

        let run = run_monthly_accrual(&db, &config, date(2026, 11, 4), at(date(2026, 11, 4))).await?;
        assert_eq!(run.processed, 0);
        assert_eq!(run.skipped_probation, 1);
        assert_eq!(run.skipped_joined_mid_month, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_year_end_caps_carry_forward_and_is_idempotent() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        // Long-serving: 2026 opening Earned is 9 months x 1.5, and the
        // October run brings it to 15.
        let employee = create_employee(&db, &config, "EMP203", date(2020, 1, 6), date(2026, 10, 17)).await?;
        run_monthly_accrual(&db, &config, date(2026, 10, 17), at(date(2026, 10, 17))).await?;
        let earned = leave_type_by_kind(&db, LeaveKind::Earned).await?;
        let sick = leave_type_by_kind(&db, LeaveKind::Sick).await?;
        let now = at(date(2027, 1, 1));

        let run = run_year_end(&db, &config, 2026, now).await?;
        assert_eq!(run.carried_forward.len(), 1);
        assert_eq!(run.carried_forward[0].carried, dec("12"));
        assert_eq!(run.carried_forward[0].forfeited, dec("3"));
        assert_eq!(run.optional_initialized, 1);
        assert_eq!(run.sick_reset, 1);

        let next = find_balance(&db, employee.id, earned.id, 2027).await?.unwrap();
        assert_eq!(next.total, dec("12"));
        assert_eq!(next.remaining, dec("12"));
        assert_eq!(next.carry_forward, dec("12"));

        let old_sick = find_balance(&db, employee.id, sick.id, 2026).await?.unwrap();
        assert_eq!(old_sick.remaining, Decimal::ZERO);

        let again = run_year_end(&db, &config, 2026, now).await?;
        assert!(again.already_run);
        let unchanged = find_balance(&db, employee.id, earned.id, 2027).await?.unwrap();
        assert_eq!(unchanged.total, dec("12"));
        Ok(())
    }

    #[tokio::test]
    async fn test_carry_forward_summary_projects_forfeit() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        create_employee(&db, &config, "EMP204", date(2020, 1, 6), date(2026, 10, 17)).await?;

        let rows = carry_forward_summary(&db, &config, 2026).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].remaining, dec("13.5"));
        assert_eq!(rows[0].carry_forward, dec("12"));
        assert_eq!(rows[0].forfeited, dec("1.5"));
        Ok(())
    }
}
