//! Leave applications and their approval workflow.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ConfigLoader;
use crate::entities::{
    self, comp_off_grant, comp_off_grant::CompOffStatus, employee, leave, leave_balance,
    leave_type, HalfDayPeriod, LeaveKind, LeaveStatus,
};
use crate::error::{HrmsError, HrmsResult};
use crate::models::{AuditTrace, AuditWarning};
use crate::rules::{
    check_optional_quota, count_working_days, probation_audit_step, probation_status,
    split_paid_unpaid, SplitOutcome,
};

use super::{balances, catalog, employees};

/// Leaves per page in list views.
pub const PAGE_SIZE: u64 = 20;

/// A leave application.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveApplication {
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    /// Defaults to `start_date`; ignored for half days.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    #[serde(default)]
    pub is_half_day: bool,
    #[serde(default)]
    pub half_day_period: Option<HalfDayPeriod>,
    /// Optional holidays inside the range to book as Optional leave.
    #[serde(default)]
    pub optional_holiday_dates: Vec<NaiveDate>,
}

/// Rows created by an application.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveApplied {
    pub leaves: Vec<leave::Model>,
    pub warnings: Vec<AuditWarning>,
    pub trace: AuditTrace,
}

struct LeaveRow<'a> {
    leave_type: &'a leave_type::Model,
    start: NaiveDate,
    end: NaiveDate,
    days: Decimal,
    reason: String,
    is_unpaid: bool,
}

async fn insert_leave<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    row: LeaveRow<'_>,
    half_day_period: Option<HalfDayPeriod>,
    now: NaiveDateTime,
) -> HrmsResult<leave::Model> {
    let model = leave::ActiveModel {
        employee_id: Set(employee_id),
        leave_type_id: Set(row.leave_type.id),
        start_date: Set(row.start),
        end_date: Set(row.end),
        days_requested: Set(row.days),
        reason: Set(row.reason),
        status: Set(LeaveStatus::Pending),
        is_half_day: Set(half_day_period.is_some()),
        half_day_period: Set(half_day_period),
        is_unpaid: Set(row.is_unpaid),
        colour: Set(row.leave_type.colour.clone()),
        applied_at: Set(now),
        approved_by: Set(None),
        approved_at: Set(None),
        rejection_reason: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

async fn find_leave_type<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<leave_type::Model> {
    entities::LeaveType::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave type", id))
}

async fn find_leave<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<leave::Model> {
    entities::Leave::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave", id))
}

/// Days on the employee's open (new or pending) Optional leaves in `year`.
///
/// These are not yet in the balance's `taken`, but they already hold a
/// slot of the yearly quota.
async fn open_optional_days<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    optional_type_id: i32,
    year: i32,
) -> HrmsResult<Decimal> {
    let (first, last) = NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| HrmsError::validation("year", format!("{} is out of range", year)))?;
    Ok(entities::Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee_id))
        .filter(leave::Column::LeaveTypeId.eq(optional_type_id))
        .filter(leave::Column::Status.is_in([LeaveStatus::New, LeaveStatus::Pending]))
        .filter(leave::Column::StartDate.gte(first))
        .filter(leave::Column::StartDate.lte(last))
        .all(db)
        .await?
        .iter()
        .map(|l| l.days_requested)
        .sum())
}

/// Checks the Optional quota for `requested` days in `year`.
///
/// With `include_open`, days on open Optional applications count against
/// the quota as well as days already taken. Approval re-checks without
/// them, so the first applications approved win the remaining slots.
async fn optional_quota<C: ConnectionTrait>(
    db: &C,
    config: &ConfigLoader,
    employee_id: i32,
    optional: &leave_type::Model,
    year: i32,
    requested: Decimal,
    include_open: bool,
    trace: &mut AuditTrace,
) -> HrmsResult<()> {
    let balance = balances::find_balance(db, employee_id, optional.id, year)
        .await?
        .ok_or_else(|| HrmsError::BalanceNotFound {
            leave_type: optional.name.clone(),
            year,
        })?;
    let open = if include_open {
        open_optional_days(db, employee_id, optional.id, year).await?
    } else {
        Decimal::ZERO
    };
    let check = check_optional_quota(
        balance.taken + open,
        balance.remaining - open,
        requested,
        config.leave_policy().optional_usable_per_year,
        trace.next_step(),
    )?;
    trace.push(check.audit_step);
    Ok(())
}

/// Validates an application and books it as one or more pending leaves.
///
/// Half days cover a single date. Days are counted as working days, and
/// requests beyond the available balance are split into a paid portion
/// and an unpaid portion on the Unpaid leave type. Optional holidays
/// selected inside the range are booked separately as Optional leave.
pub async fn apply_leave(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    input: LeaveApplication,
    now: NaiveDateTime,
) -> HrmsResult<LeaveApplied> {
    let today = now.date();
    let reason = input.reason.trim().to_string();
    if reason.is_empty() {
        return Err(HrmsError::validation("reason", "is required"));
    }

    let (start, end, half_day_period) = if input.is_half_day {
        let period = input.half_day_period.ok_or_else(|| {
            HrmsError::validation("half_day_period", "is required for a half-day leave")
        })?;
        (input.start_date, input.start_date, Some(period))
    } else {
        (
            input.start_date,
            input.end_date.unwrap_or(input.start_date),
            None,
        )
    };
    if start > end {
        return Err(HrmsError::validation("end_date", "must not be before the start date"));
    }
    if start < today {
        return Err(HrmsError::validation("start_date", "cannot be in the past"));
    }

    let txn = db.begin().await?;
    let employee = super::find_employee(&txn, input.employee_id).await?;
    if !employee.is_active() {
        return Err(HrmsError::validation("employee_id", "employee is not active"));
    }
    let leave_type = find_leave_type(&txn, input.leave_type_id).await?;
    if !leave_type.is_active {
        return Err(HrmsError::validation(
            "leave_type_id",
            format!("{} is not active", leave_type.name),
        ));
    }

    let overlapping = entities::Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee.id))
        .filter(leave::Column::Status.is_in([LeaveStatus::Pending, LeaveStatus::Approved]))
        .filter(leave::Column::StartDate.lte(end))
        .filter(leave::Column::EndDate.gte(start))
        .one(&txn)
        .await?;
    if let Some(existing) = overlapping {
        return Err(HrmsError::LeaveOverlap {
            start: existing.start_date,
            end: existing.end_date,
        });
    }

    let mut trace = AuditTrace::default();
    let location = employee.location.as_deref();
    let holidays = catalog::calendar_holidays(&txn, start, end, location).await?;
    let working = count_working_days(start, end, &holidays, trace.next_step());
    trace.push(working.audit_step.clone());
    if working.working_days == 0 {
        return Err(HrmsError::validation(
            "start_date",
            "the selected dates contain no working days",
        ));
    }
    let days = if half_day_period.is_some() {
        Decimal::new(5, 1)
    } else {
        Decimal::from(working.working_days)
    };
    if days > Decimal::from(leave_type.max_days) {
        return Err(HrmsError::validation(
            "end_date",
            format!(
                "{} allows at most {} day(s) per application",
                leave_type.name, leave_type.max_days
            ),
        ));
    }

    let probation = probation_status(
        employee.date_of_joining,
        employee.probation_period_days,
        today,
    );
    trace.push(probation_audit_step(&probation, today, trace.next_step()));
    if probation.on_probation {
        trace.warn(AuditWarning::new(
            "ON_PROBATION",
            format!(
                "Employee is on probation until {}; leave may be unpaid",
                probation.end_date
            ),
            "medium",
        ));
    }

    let year = start.year();
    let mut created = Vec::new();

    if leave_type.kind == LeaveKind::Optional {
        if start != end {
            return Err(HrmsError::validation(
                "end_date",
                "optional leave covers a single date",
            ));
        }
        if !working.optional_holidays.iter().any(|h| h.date == start) {
            return Err(HrmsError::validation(
                "start_date",
                format!("{} is not an optional holiday", start),
            ));
        }
        optional_quota(&txn, config, employee.id, &leave_type, year, days, true, &mut trace).await?;
        let row = LeaveRow {
            leave_type: &leave_type,
            start,
            end,
            days,
            reason,
            is_unpaid: false,
        };
        created.push(insert_leave(&txn, employee.id, row, half_day_period, now).await?);
    } else {
        let mut selected: Vec<NaiveDate> = input
            .optional_holiday_dates
            .iter()
            .copied()
            .filter(|d| {
                working.working_dates.contains(d)
                    && working.optional_holidays.iter().any(|h| h.date == *d)
            })
            .collect();
        selected.sort();
        selected.dedup();

        let mut main_days = days;
        if !selected.is_empty() && half_day_period.is_none() {
            let optional = super::leave_type_by_kind(&txn, LeaveKind::Optional).await?;
            let count = Decimal::from(selected.len() as u64);
            optional_quota(&txn, config, employee.id, &optional, year, count, true, &mut trace).await?;
            for date in &selected {
                let row = LeaveRow {
                    leave_type: &optional,
                    start: *date,
                    end: *date,
                    days: Decimal::ONE,
                    reason: format!("{} (Optional holiday)", reason),
                    is_unpaid: false,
                };
                created.push(insert_leave(&txn, employee.id, row, None, now).await?);
            }
            main_days -= count;
        }

        if main_days > Decimal::ZERO {
            if leave_type.kind == LeaveKind::Unpaid {
                let row = LeaveRow {
                    leave_type: &leave_type,
                    start,
                    end,
                    days: main_days,
                    reason,
                    is_unpaid: true,
                };
                created.push(insert_leave(&txn, employee.id, row, half_day_period, now).await?);
            } else {
                let available = balances::find_balance(&txn, employee.id, leave_type.id, year)
                    .await?
                    .map(|b| b.remaining);
                let plan = split_paid_unpaid(main_days, available, trace.next_step());
                trace.push(plan.audit_step.clone());

                match plan.outcome {
                    SplitOutcome::FullyPaid => {
                        let row = LeaveRow {
                            leave_type: &leave_type,
                            start,
                            end,
                            days: plan.paid_days,
                            reason,
                            is_unpaid: false,
                        };
                        created.push(
                            insert_leave(&txn, employee.id, row, half_day_period, now).await?,
                        );
                    }
                    SplitOutcome::Partial => {
                        let unpaid = super::leave_type_by_kind(&txn, LeaveKind::Unpaid).await?;
                        let paid_row = LeaveRow {
                            leave_type: &leave_type,
                            start,
                            end,
                            days: plan.paid_days,
                            reason: format!("{} (Paid portion)", reason),
                            is_unpaid: false,
                        };
                        created.push(
                            insert_leave(&txn, employee.id, paid_row, half_day_period, now).await?,
                        );
                        let unpaid_row = LeaveRow {
                            leave_type: &unpaid,
                            start,
                            end,
                            days: plan.unpaid_days,
                            reason: format!("{} (Unpaid portion)", reason),
                            is_unpaid: true,
                        };
                        created.push(
                            insert_leave(&txn, employee.id, unpaid_row, half_day_period, now)
                                .await?,
                        );
                        trace.warn(AuditWarning::new(
                            "PARTIALLY_UNPAID",
                            format!(
                                "Only {} day(s) of {} available; {} day(s) booked as unpaid",
                                plan.paid_days, leave_type.name, plan.unpaid_days
                            ),
                            "medium",
                        ));
                    }
                    SplitOutcome::FullyUnpaid => {
                        let unpaid = super::leave_type_by_kind(&txn, LeaveKind::Unpaid).await?;
                        let row = LeaveRow {
                            leave_type: &unpaid,
                            start,
                            end,
                            days: plan.unpaid_days,
                            reason,
                            is_unpaid: true,
                        };
                        created.push(
                            insert_leave(&txn, employee.id, row, half_day_period, now).await?,
                        );
                        trace.warn(AuditWarning::new(
                            "FULLY_UNPAID",
                            format!(
                                "No {} balance available; all {} day(s) booked as unpaid",
                                leave_type.name, plan.unpaid_days
                            ),
                            "high",
                        ));
                    }
                }
            }
        }
    }

    txn.commit().await?;
    info!(
        employee_id = employee.id,
        leave_type = %leave_type.name,
        %start,
        %end,
        %days,
        rows = created.len(),
        "Leave applied"
    );

    Ok(LeaveApplied {
        leaves: created,
        warnings: trace.warnings.clone(),
        trace,
    })
}

fn is_unpaid_leave(leave: &leave::Model, leave_type: &leave_type::Model) -> bool {
    leave.is_unpaid || leave_type.kind == LeaveKind::Unpaid
}

/// Applies the balance effect of moving `leave` from `from` to `to`.
///
/// Entering `approved` charges the balance (or records unpaid days);
/// leaving `approved` gives them back.
async fn apply_balance_effect<C: ConnectionTrait>(
    db: &C,
    leave: &leave::Model,
    leave_type: &leave_type::Model,
    from: LeaveStatus,
    to: LeaveStatus,
    now: NaiveDateTime,
) -> HrmsResult<()> {
    let year = leave.start_date.year();
    let days = leave.days_requested;
    let unpaid = is_unpaid_leave(leave, leave_type);
    match (from == LeaveStatus::Approved, to == LeaveStatus::Approved) {
        (false, true) if unpaid => {
            balances::record_unpaid(db, leave.employee_id, leave_type.id, year, days, now).await?;
        }
        (false, true) => {
            balances::deduct(db, leave.employee_id, leave_type, year, days, now).await?;
        }
        (true, false) if unpaid => {
            balances::reverse_unpaid(db, leave.employee_id, leave_type.id, year, days, now).await?;
        }
        (true, false) => {
            if balances::restore(db, leave.employee_id, leave_type, year, days, now)
                .await?
                .is_none()
            {
                warn!(leave_id = leave.id, year, "No balance to restore leave days to");
            }
        }
        _ => {}
    }
    Ok(())
}

async fn ensure_not_comp_off_credit<C: ConnectionTrait>(db: &C, leave: &leave::Model) -> HrmsResult<()> {
    let credit = entities::CompOffGrant::find()
        .filter(comp_off_grant::Column::LeaveId.eq(leave.id))
        .one(db)
        .await?;
    if credit.is_some() {
        return Err(HrmsError::InvalidTransition {
            entity: "Comp-off credit".to_string(),
            from: leave.status.as_str().to_string(),
            to: "changed".to_string(),
        });
    }
    Ok(())
}

/// Moves a leave to `to` on behalf of `actor_id`, applying balance effects.
///
/// `new`, `pending`, `approved` and `rejected` can be reached from one
/// another; withdrawn leaves are final. Rejection needs a reason.
pub async fn update_status(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    leave_id: i32,
    to: LeaveStatus,
    actor_id: i32,
    reason: Option<String>,
    now: NaiveDateTime,
) -> HrmsResult<leave::Model> {
    if to == LeaveStatus::Withdrawn {
        return Err(HrmsError::validation("status", "use withdraw to withdraw a leave"));
    }
    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    if to == LeaveStatus::Rejected && reason.is_none() {
        return Err(HrmsError::validation("reason", "a rejection reason is required"));
    }

    let txn = db.begin().await?;
    let leave = find_leave(&txn, leave_id).await?;
    let from = leave.status;
    if from == LeaveStatus::Withdrawn {
        return Err(HrmsError::InvalidTransition {
            entity: "Leave".to_string(),
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }
    ensure_not_comp_off_credit(&txn, &leave).await?;

    let employee = super::find_employee(&txn, leave.employee_id).await?;
    let actor = super::find_employee(&txn, actor_id).await?;
    if !super::can_manage(&actor, &employee) {
        return Err(HrmsError::forbidden(format!(
            "{} cannot decide leave for {}",
            actor.employee_code, employee.employee_code
        )));
    }

    let leave_type = find_leave_type(&txn, leave.leave_type_id).await?;
    if leave_type.kind == LeaveKind::Optional
        && to == LeaveStatus::Approved
        && from != LeaveStatus::Approved
    {
        let mut trace = AuditTrace::default();
        optional_quota(
            &txn,
            config,
            employee.id,
            &leave_type,
            leave.start_date.year(),
            leave.days_requested,
            false,
            &mut trace,
        )
        .await?;
    }
    apply_balance_effect(&txn, &leave, &leave_type, from, to, now).await?;

    let mut active: leave::ActiveModel = leave.into();
    active.status = Set(to);
    match to {
        LeaveStatus::Approved => {
            active.approved_by = Set(Some(actor.id));
            active.approved_at = Set(Some(now));
            active.rejection_reason = Set(None);
        }
        LeaveStatus::Rejected => {
            active.approved_by = Set(Some(actor.id));
            active.approved_at = Set(Some(now));
            active.rejection_reason = Set(reason);
        }
        _ => {}
    }
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(
        leave_id,
        from = from.as_str(),
        to = to.as_str(),
        actor = %actor.employee_code,
        "Leave status changed"
    );
    Ok(updated)
}

/// Approves a leave, charging the balance unless it was already approved.
pub async fn approve_leave(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    leave_id: i32,
    actor_id: i32,
    now: NaiveDateTime,
) -> HrmsResult<leave::Model> {
    update_status(db, config, leave_id, LeaveStatus::Approved, actor_id, None, now).await
}

/// Rejects a leave, giving back days if it had been approved.
pub async fn reject_leave(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    leave_id: i32,
    actor_id: i32,
    reason: String,
    now: NaiveDateTime,
) -> HrmsResult<leave::Model> {
    update_status(db, config, leave_id, LeaveStatus::Rejected, actor_id, Some(reason), now).await
}

/// Withdraws the employee's own leave.
pub async fn withdraw_leave(
    db: &DatabaseConnection,
    leave_id: i32,
    employee_id: i32,
    now: NaiveDateTime,
) -> HrmsResult<leave::Model> {
    let txn = db.begin().await?;
    let leave = find_leave(&txn, leave_id).await?;
    if leave.employee_id != employee_id {
        return Err(HrmsError::forbidden("only the applicant can withdraw a leave"));
    }
    let from = leave.status;
    if !matches!(
        from,
        LeaveStatus::New | LeaveStatus::Pending | LeaveStatus::Approved
    ) {
        return Err(HrmsError::InvalidTransition {
            entity: "Leave".to_string(),
            from: from.as_str().to_string(),
            to: LeaveStatus::Withdrawn.as_str().to_string(),
        });
    }
    ensure_not_comp_off_credit(&txn, &leave).await?;

    let leave_type = find_leave_type(&txn, leave.leave_type_id).await?;
    apply_balance_effect(&txn, &leave, &leave_type, from, LeaveStatus::Withdrawn, now).await?;

    let mut active: leave::ActiveModel = leave.into();
    active.status = Set(LeaveStatus::Withdrawn);
    active.rejection_reason = Set(Some("Leave withdrawn by employee".to_string()));
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(leave_id, employee_id, from = from.as_str(), "Leave withdrawn");
    Ok(updated)
}

/// A comp-off claim for working on a holiday.
#[derive(Debug, Clone, Deserialize)]
pub struct CompOffClaim {
    pub employee_id: i32,
    pub work_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

/// Credit recorded for a comp-off claim.
#[derive(Debug, Clone, Serialize)]
pub struct CompOffEarned {
    pub leave: leave::Model,
    pub grant: comp_off_grant::Model,
    pub balance: leave_balance::Model,
}

/// Credits one Comp-off day for working on a holiday.
///
/// The work date must be a holiday for the employee's location and not
/// already claimed. The credit expires after the configured validity.
pub async fn earn_comp_off(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    claim: CompOffClaim,
    now: NaiveDateTime,
) -> HrmsResult<CompOffEarned> {
    if claim.work_date > now.date() {
        return Err(HrmsError::validation("work_date", "cannot be in the future"));
    }

    let txn = db.begin().await?;
    let employee = super::find_employee(&txn, claim.employee_id).await?;
    let location = employee.location.as_deref();
    let holidays = catalog::holidays_on(&txn, claim.work_date, location).await?;
    // Optional holidays are working days.
    let Some(holiday) = holidays.iter().find(|h| h.is_mandatory_for(location)) else {
        return Err(HrmsError::validation(
            "work_date",
            format!("{} is not a holiday in your region", claim.work_date),
        ));
    };

    let already = entities::CompOffGrant::find()
        .filter(comp_off_grant::Column::EmployeeId.eq(employee.id))
        .filter(comp_off_grant::Column::WorkDate.eq(claim.work_date))
        .one(&txn)
        .await?;
    if already.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Comp-off".to_string(),
            key: claim.work_date.to_string(),
        });
    }

    let comp_off = super::leave_type_by_kind(&txn, LeaveKind::CompOff).await?;
    let balance = balances::allocate(
        &txn,
        employee.id,
        comp_off.id,
        claim.work_date.year(),
        Decimal::ONE,
        now,
    )
    .await?;

    let leave = leave::ActiveModel {
        employee_id: Set(employee.id),
        leave_type_id: Set(comp_off.id),
        start_date: Set(claim.work_date),
        end_date: Set(claim.work_date),
        days_requested: Set(Decimal::ONE),
        reason: Set(format!(
            "Comp off for working on holiday: {}",
            if claim.reason.trim().is_empty() {
                holiday.name.as_str()
            } else {
                claim.reason.trim()
            }
        )),
        status: Set(LeaveStatus::Approved),
        is_half_day: Set(false),
        half_day_period: Set(None),
        is_unpaid: Set(false),
        colour: Set(comp_off.colour.clone()),
        applied_at: Set(now),
        approved_by: Set(None),
        approved_at: Set(Some(now)),
        rejection_reason: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let expires_on =
        claim.work_date + Duration::days(config.leave_policy().comp_off_validity_days);
    let grant = comp_off_grant::ActiveModel {
        employee_id: Set(employee.id),
        work_date: Set(claim.work_date),
        leave_id: Set(leave.id),
        expires_on: Set(expires_on),
        status: Set(CompOffStatus::Active),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        employee_id = employee.id,
        work_date = %claim.work_date,
        holiday = %holiday.name,
        %expires_on,
        "Comp-off earned"
    );
    Ok(CompOffEarned {
        leave,
        grant,
        balance,
    })
}

/// Filters for the leave list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveFilter {
    pub status: Option<LeaveStatus>,
    pub leave_type_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub location: Option<String>,
    pub department: Option<String>,
    /// Leaves ending on or after this date.
    pub from: Option<NaiveDate>,
    /// Leaves starting on or before this date.
    pub to: Option<NaiveDate>,
    /// Matches employee name, code or email.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u64>,
}

/// A leave with employee and leave type names.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveView {
    #[serde(flatten)]
    pub leave: leave::Model,
    pub employee_code: String,
    pub employee_name: String,
    pub leave_type: String,
}

/// One page of leaves.
#[derive(Debug, Clone, Serialize)]
pub struct LeavePage {
    pub items: Vec<LeaveView>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Lists leaves, newest application first, [`PAGE_SIZE`] per page.
pub async fn list_leaves<C: ConnectionTrait>(db: &C, filter: &LeaveFilter) -> HrmsResult<LeavePage> {
    let mut query = entities::Leave::find();
    if let Some(status) = filter.status {
        query = query.filter(leave::Column::Status.eq(status));
    }
    if let Some(leave_type_id) = filter.leave_type_id {
        query = query.filter(leave::Column::LeaveTypeId.eq(leave_type_id));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(leave::Column::EmployeeId.eq(employee_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(leave::Column::EndDate.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(leave::Column::StartDate.lte(to));
    }

    let narrows_employees =
        filter.location.is_some() || filter.department.is_some() || filter.search.is_some();
    if narrows_employees {
        let employee_filter = employees::EmployeeFilter {
            status: None,
            department: filter.department.clone(),
            location: filter.location.clone(),
            search: filter.search.clone(),
        };
        let ids: Vec<i32> = employees::list_employees(db, &employee_filter)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        query = query.filter(leave::Column::EmployeeId.is_in(ids));
    }

    let page = filter.page.unwrap_or(1).max(1);
    let paginator = query
        .order_by_desc(leave::Column::AppliedAt)
        .order_by_desc(leave::Column::Id)
        .paginate(db, PAGE_SIZE);
    let totals = paginator.num_items_and_pages().await?;
    let leaves = paginator.fetch_page(page - 1).await?;

    let employee_ids: Vec<i32> = leaves.iter().map(|l| l.employee_id).collect();
    let people: HashMap<i32, employee::Model> = entities::Employee::find()
        .filter(employee::Column::Id.is_in(employee_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();
    let types: HashMap<i32, String> = entities::LeaveType::find()
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let items = leaves
        .into_iter()
        .map(|leave| {
            let person = people.get(&leave.employee_id);
            LeaveView {
                employee_code: person.map(|p| p.employee_code.clone()).unwrap_or_default(),
                employee_name: person.map(|p| p.full_name()).unwrap_or_default(),
                leave_type: types.get(&leave.leave_type_id).cloned().unwrap_or_default(),
                leave,
            }
        })
        .collect();

    Ok(LeavePage {
        items,
        page,
        page_size: PAGE_SIZE,
        total: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

/// Fetches a leave by id.
pub async fn get_leave<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<leave::Model> {
    find_leave(db, id).await
}

/// Leave counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaveStats {
    pub total: u64,
    pub new: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub withdrawn: u64,
}

/// Counts leaves per status, for one employee or everyone.
pub async fn leave_stats<C: ConnectionTrait>(db: &C, employee_id: Option<i32>) -> HrmsResult<LeaveStats> {
    let mut query = entities::Leave::find();
    if let Some(employee_id) = employee_id {
        query = query.filter(leave::Column::EmployeeId.eq(employee_id));
    }

    let mut stats = LeaveStats::default();
    for leave in query.all(db).await? {
        stats.total += 1;
        match leave.status {
            LeaveStatus::New => stats.new += 1,
            LeaveStatus::Pending => stats.pending += 1,
            LeaveStatus::Approved => stats.approved += 1,
            LeaveStatus::Rejected => stats.rejected += 1,
            LeaveStatus::Withdrawn => stats.withdrawn += 1,
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EmployeeRole;
    use crate::services::balances::{employee_balances, find_balance};
    use crate::services::leave_type_by_kind;
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    // Saturday 17 October 2026.
    fn now() -> NaiveDateTime {
        date(2026, 10, 17).and_hms_opt(10, 0, 0).unwrap()
    }

    fn application(employee_id: i32, leave_type_id: i32, start: NaiveDate, end: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            employee_id,
            leave_type_id,
            start_date: start,
            end_date: Some(end),
            reason: "Family function".to_string(),
            is_half_day: false,
            half_day_period: None,
            optional_holiday_dates: Vec::new(),
        }
    }

    struct Fixture {
        db: DatabaseConnection,
        config: ConfigLoader,
        hr: employee::Model,
        employee: employee::Model,
    }

    async fn fixture() -> HrmsResult<Fixture> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = now().date();
        let hr = create_employee_with(&db, &config, "HR001", date(2019, 1, 1), today, EmployeeRole::Hr, None, None).await?;
        let employee = create_employee_with(
            &db,
            &config,
            "EMP300",
            date(2020, 1, 6),
            today,
            EmployeeRole::Employee,
            Some("Bhubaneswar"),
            Some("HR001"),
        )
        .await?;
        Ok(Fixture { db, config, hr, employee })
    }

    #[tokio::test]
    async fn test_apply_counts_working_days_excluding_sundays_and_holidays() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        // Mon 19 to Sat 24 October; Dussehra on Tue 20.
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 19), date(2026, 10, 25)),
            now(),
        )
        .await?;
        assert_eq!(applied.leaves.len(), 1);
        assert_eq!(applied.leaves[0].days_requested, dec("5"));
        assert_eq!(applied.leaves[0].status, LeaveStatus::Pending);
        assert!(!applied.leaves[0].is_unpaid);
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_rejects_past_start_and_overlap() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;

        let past = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 16), date(2026, 10, 16)),
            now(),
        )
        .await;
        assert!(matches!(past, Err(HrmsError::Validation { .. })));

        apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 26), date(2026, 10, 28)),
            now(),
        )
        .await?;
        let overlap = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 28), date(2026, 10, 29)),
            now(),
        )
        .await;
        assert!(matches!(overlap, Err(HrmsError::LeaveOverlap { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_beyond_balance_splits_paid_and_unpaid() -> HrmsResult<()> {
        let f = fixture().await?;
        let casual = leave_type_by_kind(&f.db, LeaveKind::Casual).await?;
        let unpaid = leave_type_by_kind(&f.db, LeaveKind::Unpaid).await?;
        // Mon 2 to Sat 14 November: 11 working days (Diwali on Mon 9, one Sunday).
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, casual.id, date(2026, 11, 2), date(2026, 11, 14)),
            now(),
        )
        .await?;
        assert_eq!(applied.leaves.len(), 2);
        let paid = &applied.leaves[0];
        let rest = &applied.leaves[1];
        assert_eq!(paid.leave_type_id, casual.id);
        assert_eq!(paid.days_requested, dec("6"));
        assert!(paid.reason.ends_with("(Paid portion)"));
        assert_eq!(rest.leave_type_id, unpaid.id);
        assert_eq!(rest.days_requested, dec("5"));
        assert!(rest.is_unpaid);
        assert!(applied.warnings.iter().any(|w| w.code == "PARTIALLY_UNPAID"));
        Ok(())
    }

    #[tokio::test]
    async fn test_half_day_requires_period_and_counts_half() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let mut input = application(f.employee.id, sick.id, date(2026, 10, 19), date(2026, 10, 22));
        input.is_half_day = true;

        let missing = apply_leave(&f.db, &f.config, input.clone(), now()).await;
        assert!(matches!(missing, Err(HrmsError::Validation { .. })));

        input.half_day_period = Some(HalfDayPeriod::FirstHalf);
        let applied = apply_leave(&f.db, &f.config, input, now()).await?;
        assert_eq!(applied.leaves[0].days_requested, dec("0.5"));
        assert_eq!(applied.leaves[0].end_date, date(2026, 10, 19));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_reject_and_withdraw_keep_balance_consistent() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 21), date(2026, 10, 22)),
            now(),
        )
        .await?;
        let leave_id = applied.leaves[0].id;

        let approved = approve_leave(&f.db, &f.config, leave_id, f.hr.id, now()).await?;
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by, Some(f.hr.id));
        let balance = find_balance(&f.db, f.employee.id, sick.id, 2026).await?.unwrap();
        assert_eq!(balance.taken, dec("2"));
        assert_eq!(balance.remaining, dec("10"));

        // Re-approving does not charge twice.
        approve_leave(&f.db, &f.config, leave_id, f.hr.id, now()).await?;
        let balance = find_balance(&f.db, f.employee.id, sick.id, 2026).await?.unwrap();
        assert_eq!(balance.taken, dec("2"));

        let withdrawn = withdraw_leave(&f.db, leave_id, f.employee.id, now()).await?;
        assert_eq!(withdrawn.status, LeaveStatus::Withdrawn);
        assert_eq!(withdrawn.rejection_reason.as_deref(), Some("Leave withdrawn by employee"));
        let balance = find_balance(&f.db, f.employee.id, sick.id, 2026).await?.unwrap();
        assert_eq!(balance.taken, Decimal::ZERO);
        assert_eq!(balance.remaining, balance.total - balance.taken);

        let again = approve_leave(&f.db, &f.config, leave_id, f.hr.id, now()).await;
        assert!(matches!(again, Err(HrmsError::InvalidTransition { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_requires_reason_and_restores_approved_days() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 21), date(2026, 10, 21)),
            now(),
        )
        .await?;
        let leave_id = applied.leaves[0].id;
        approve_leave(&f.db, &f.config, leave_id, f.hr.id, now()).await?;

        let blank = reject_leave(&f.db, &f.config, leave_id, f.hr.id, "  ".to_string(), now()).await;
        assert!(matches!(blank, Err(HrmsError::Validation { .. })));

        let rejected = reject_leave(&f.db, &f.config, leave_id, f.hr.id, "Project deadline".to_string(), now()).await?;
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Project deadline"));
        let balance = find_balance(&f.db, f.employee.id, sick.id, 2026).await?.unwrap();
        assert_eq!(balance.taken, Decimal::ZERO);
        assert_eq!(balance.remaining, dec("12"));
        Ok(())
    }

    #[tokio::test]
    async fn test_only_managers_and_hr_can_approve() -> HrmsResult<()> {
        let f = fixture().await?;
        let peer = create_employee(&f.db, &f.config, "EMP301", date(2020, 1, 6), now().date()).await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 21), date(2026, 10, 21)),
            now(),
        )
        .await?;

        let denied = approve_leave(&f.db, &f.config, applied.leaves[0].id, peer.id, now()).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        let not_owner = withdraw_leave(&f.db, applied.leaves[0].id, peer.id, now()).await;
        assert!(matches!(not_owner, Err(HrmsError::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_approving_unpaid_portion_records_unpaid_days() -> HrmsResult<()> {
        let f = fixture().await?;
        let casual = leave_type_by_kind(&f.db, LeaveKind::Casual).await?;
        let unpaid = leave_type_by_kind(&f.db, LeaveKind::Unpaid).await?;
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, casual.id, date(2026, 11, 2), date(2026, 11, 14)),
            now(),
        )
        .await?;
        for leave in &applied.leaves {
            approve_leave(&f.db, &f.config, leave.id, f.hr.id, now()).await?;
        }

        let balances = employee_balances(&f.db, f.employee.id, 2026).await?;
        let casual_balance = balances.iter().find(|b| b.leave_type_id == casual.id).unwrap();
        assert_eq!(casual_balance.remaining, Decimal::ZERO);
        let unpaid_balance = balances.iter().find(|b| b.leave_type_id == unpaid.id).unwrap();
        assert_eq!(unpaid_balance.taken, dec("5"));

        reject_leave(&f.db, &f.config, applied.leaves[1].id, f.hr.id, "Not allowed".to_string(), now()).await?;
        let unpaid_after = find_balance(&f.db, f.employee.id, unpaid.id, 2026).await?.unwrap();
        assert_eq!(unpaid_after.taken, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_optional_leave_must_fall_on_optional_holiday() -> HrmsResult<()> {
        let f = fixture().await?;
        let optional = leave_type_by_kind(&f.db, LeaveKind::Optional).await?;

        let plain_day = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, optional.id, date(2026, 11, 23), date(2026, 11, 23)),
            now(),
        )
        .await;
        assert!(matches!(plain_day, Err(HrmsError::Validation { .. })));

        // Guru Nanak Jayanti, Tuesday 24 November.
        let applied = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, optional.id, date(2026, 11, 24), date(2026, 11, 24)),
            now(),
        )
        .await?;
        assert_eq!(applied.leaves.len(), 1);
        assert_eq!(applied.leaves[0].leave_type_id, optional.id);
        Ok(())
    }

    async fn add_optional_holiday(db: &DatabaseConnection, name: &str, on: NaiveDate) -> HrmsResult<()> {
        entities::holiday::ActiveModel {
            name: Set(name.to_string()),
            holiday_type: Set(entities::HolidayType::Optional),
            date: Set(on),
            region: Set(None),
            colour: Set("#f9a825".to_string()),
            description: Set(None),
            is_optional: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(())
    }

    /// Optional balance of 4 with optional holidays on 24, 25 and 26 November.
    async fn optional_fixture() -> HrmsResult<(Fixture, leave_type::Model)> {
        let f = fixture().await?;
        add_optional_holiday(&f.db, "Founders Day", date(2026, 11, 25)).await?;
        add_optional_holiday(&f.db, "Harvest Day", date(2026, 11, 26)).await?;
        let optional = leave_type_by_kind(&f.db, LeaveKind::Optional).await?;
        balances::adjust_balance(
            &f.db,
            balances::BalanceAdjustment {
                actor_id: f.hr.id,
                employee_id: f.employee.id,
                leave_type_id: optional.id,
                year: 2026,
                total: dec("4"),
                taken: None,
            },
            now(),
        )
        .await?;
        Ok((f, optional))
    }

    #[tokio::test]
    async fn test_pending_optional_leaves_count_against_quota() -> HrmsResult<()> {
        let (f, optional) = optional_fixture().await?;
        for day in [24, 25] {
            apply_leave(
                &f.db,
                &f.config,
                application(f.employee.id, optional.id, date(2026, 11, day), date(2026, 11, day)),
                now(),
            )
            .await?;
        }

        let third = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, optional.id, date(2026, 11, 26), date(2026, 11, 26)),
            now(),
        )
        .await;
        assert!(matches!(third, Err(HrmsError::Validation { .. })));

        // Splitting an optional day off a sick leave draws on the same quota.
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let mut input = application(f.employee.id, sick.id, date(2026, 11, 26), date(2026, 11, 27));
        input.optional_holiday_dates = vec![date(2026, 11, 26)];
        let split = apply_leave(&f.db, &f.config, input, now()).await;
        assert!(matches!(split, Err(HrmsError::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_rechecks_optional_quota() -> HrmsResult<()> {
        let (f, optional) = optional_fixture().await?;
        let mut ids = Vec::new();
        for day in [24, 25, 26] {
            let row = LeaveRow {
                leave_type: &optional,
                start: date(2026, 11, day),
                end: date(2026, 11, day),
                days: Decimal::ONE,
                reason: "Festival".to_string(),
                is_unpaid: false,
            };
            ids.push(insert_leave(&f.db, f.employee.id, row, None, now()).await?.id);
        }

        approve_leave(&f.db, &f.config, ids[0], f.hr.id, now()).await?;
        approve_leave(&f.db, &f.config, ids[1], f.hr.id, now()).await?;
        let third = approve_leave(&f.db, &f.config, ids[2], f.hr.id, now()).await;
        assert!(matches!(third, Err(HrmsError::Validation { .. })));

        let balance = find_balance(&f.db, f.employee.id, optional.id, 2026).await?.unwrap();
        assert_eq!(balance.taken, dec("2"));
        assert_eq!(balance.remaining, dec("2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_selected_optional_holiday_is_split_off() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let optional = leave_type_by_kind(&f.db, LeaveKind::Optional).await?;
        // Mon 23 to Wed 25 November with Guru Nanak Jayanti on Tue 24.
        let mut input = application(f.employee.id, sick.id, date(2026, 11, 23), date(2026, 11, 25));
        input.optional_holiday_dates = vec![date(2026, 11, 24)];

        let applied = apply_leave(&f.db, &f.config, input, now()).await?;
        assert_eq!(applied.leaves.len(), 2);
        assert_eq!(applied.leaves[0].leave_type_id, optional.id);
        assert_eq!(applied.leaves[0].days_requested, Decimal::ONE);
        assert_eq!(applied.leaves[1].leave_type_id, sick.id);
        assert_eq!(applied.leaves[1].days_requested, dec("2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_comp_off_for_working_a_holiday() -> HrmsResult<()> {
        let f = fixture().await?;
        let claim = CompOffClaim {
            employee_id: f.employee.id,
            work_date: date(2026, 10, 2),
            reason: "Release support".to_string(),
        };
        let earned = earn_comp_off(&f.db, &f.config, claim.clone(), now()).await?;
        assert_eq!(earned.balance.remaining, Decimal::ONE);
        assert_eq!(earned.grant.expires_on, date(2026, 12, 31));
        assert_eq!(earned.leave.status, LeaveStatus::Approved);

        let twice = earn_comp_off(&f.db, &f.config, claim, now()).await;
        assert!(matches!(twice, Err(HrmsError::Duplicate { .. })));

        let workday = earn_comp_off(
            &f.db,
            &f.config,
            CompOffClaim {
                employee_id: f.employee.id,
                work_date: date(2026, 10, 5),
                reason: String::new(),
            },
            now(),
        )
        .await;
        assert!(matches!(workday, Err(HrmsError::Validation { .. })));

        let credit_change = withdraw_leave(&f.db, earned.leave.id, f.employee.id, now()).await;
        assert!(matches!(credit_change, Err(HrmsError::InvalidTransition { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_working_an_optional_holiday_earns_no_comp_off() -> HrmsResult<()> {
        let f = fixture().await?;
        // Good Friday is optional; the office stays open.
        let claim = CompOffClaim {
            employee_id: f.employee.id,
            work_date: date(2026, 4, 3),
            reason: String::new(),
        };
        let result = earn_comp_off(&f.db, &f.config, claim, now()).await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));

        let comp_off = leave_type_by_kind(&f.db, LeaveKind::CompOff).await?;
        assert!(find_balance(&f.db, f.employee.id, comp_off.id, 2026).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_comp_off_expires_after_validity() -> HrmsResult<()> {
        let f = fixture().await?;
        let earned = earn_comp_off(
            &f.db,
            &f.config,
            CompOffClaim {
                employee_id: f.employee.id,
                work_date: date(2026, 10, 2),
                reason: String::new(),
            },
            now(),
        )
        .await?;

        let early = crate::services::leave_jobs::expire_comp_offs(&f.db, date(2026, 12, 31), now()).await?;
        assert_eq!(early.expired, 0);

        let run = crate::services::leave_jobs::expire_comp_offs(&f.db, date(2027, 1, 1), now()).await?;
        assert_eq!(run.expired, 1);
        assert_eq!(run.days_removed, Decimal::ONE);
        let balance = find_balance(&f.db, f.employee.id, earned.balance.leave_type_id, 2026).await?.unwrap();
        assert_eq!(balance.remaining, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_stats() -> HrmsResult<()> {
        let f = fixture().await?;
        let sick = leave_type_by_kind(&f.db, LeaveKind::Sick).await?;
        let first = apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 21), date(2026, 10, 21)),
            now(),
        )
        .await?;
        apply_leave(
            &f.db,
            &f.config,
            application(f.employee.id, sick.id, date(2026, 10, 23), date(2026, 10, 23)),
            now(),
        )
        .await?;
        approve_leave(&f.db, &f.config, first.leaves[0].id, f.hr.id, now()).await?;

        let stats = leave_stats(&f.db, Some(f.employee.id)).await?;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.pending, 1);

        let page = list_leaves(
            &f.db,
            &LeaveFilter {
                status: Some(LeaveStatus::Pending),
                location: Some("Bhubaneswar".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].employee_code, "EMP300");
        assert_eq!(page.items[0].leave_type, sick.name);
        Ok(())
    }
}
