//! Resignation workflow and the exit process.
//!
//! A resignation moves `applied → under_review → accepted → completed`,
//! or ends as `rejected` or `withdrawn`. Accepting starts the notice
//! period; completing it deactivates the employee.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, TryIntoModel,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ConfigLoader;
use crate::entities::{
    self, employee, exit_interview, no_due_certificate, resignation, resignation_checklist,
    EmployeeRole, EmployeeStatus, ExitStatus, ResignationStatus, SettlementMode,
};
use crate::error::{HrmsError, HrmsResult};
use crate::rules::{
    exit_checklist, exit_progress, final_settlement, no_due_certificate_number, notice_progress,
    status_timeline, ExitFacts, ExitProgress, NoticeProgress, TimelineEntry, TimelineFacts,
};

use super::employees::notice_window;

/// A resignation submitted by an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct ResignationRequest {
    pub employee_id: i32,
    pub resignation_date: NaiveDate,
    pub reason: String,
}

/// A new resignation with its exit checklist.
#[derive(Debug, Clone, Serialize)]
pub struct ResignationSubmitted {
    pub resignation: resignation::Model,
    pub checklist: Vec<resignation_checklist::Model>,
}

async fn find_resignation<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<resignation::Model> {
    entities::Resignation::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Resignation", id))
}

/// The manager a resignation goes to: the reporting manager when one is
/// on record and active, otherwise the first active HR or admin.
async fn approver_for<C: ConnectionTrait>(
    db: &C,
    employee: &employee::Model,
) -> HrmsResult<Option<employee::Model>> {
    if let Some(code) = employee.reporting_manager.as_deref() {
        let manager = entities::Employee::find()
            .filter(employee::Column::EmployeeCode.eq(code))
            .filter(employee::Column::Status.eq(EmployeeStatus::Active))
            .one(db)
            .await?;
        if manager.is_some() {
            return Ok(manager);
        }
    }
    Ok(entities::Employee::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .filter(employee::Column::Role.is_in([
            EmployeeRole::Hr,
            EmployeeRole::Admin,
            EmployeeRole::SuperAdmin,
        ]))
        .filter(employee::Column::Id.ne(employee.id))
        .order_by_asc(employee::Column::Id)
        .one(db)
        .await?)
}

async fn set_notice_fields<C: ConnectionTrait>(
    db: &C,
    employee: employee::Model,
    window: Option<(NaiveDate, NaiveDate)>,
) -> HrmsResult<employee::Model> {
    let mut active: employee::ActiveModel = employee.into();
    active.resignation_date = Set(window.map(|(start, _)| start));
    active.notice_period_start = Set(window.map(|(start, _)| start));
    active.notice_period_end = Set(window.map(|(_, end)| end));
    Ok(active.update(db).await?)
}

/// Submits a resignation and creates its exit checklist.
///
/// # Errors
///
/// `Duplicate` when the employee already has an open resignation, and
/// `Validation` when the date is in the past or the reason is empty.
pub async fn submit_resignation(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    input: ResignationRequest,
    now: NaiveDateTime,
) -> HrmsResult<ResignationSubmitted> {
    let reason = input.reason.trim().to_string();
    if reason.is_empty() {
        return Err(HrmsError::validation("reason", "is required"));
    }
    if input.resignation_date < now.date() {
        return Err(HrmsError::validation("resignation_date", "cannot be in the past"));
    }

    let txn = db.begin().await?;
    let employee = super::find_employee(&txn, input.employee_id).await?;
    if !employee.is_active() {
        return Err(HrmsError::validation("employee_id", "employee is not active"));
    }

    let previous = entities::Resignation::find()
        .filter(resignation::Column::EmployeeId.eq(employee.id))
        .order_by_desc(resignation::Column::Id)
        .all(&txn)
        .await?;
    if let Some(open) = previous.iter().find(|r| r.status.is_open()) {
        return Err(HrmsError::Duplicate {
            entity: "Resignation".to_string(),
            key: format!("{} ({})", open.id, open.status.as_str()),
        });
    }

    let notice_days = if employee.notice_period_days > 0 {
        employee.notice_period_days
    } else {
        config.organization().default_notice_period_days
    };
    let (start, last_working_date) = notice_window(input.resignation_date, notice_days);
    let approver = approver_for(&txn, &employee).await?;

    let resignation = resignation::ActiveModel {
        employee_id: Set(employee.id),
        resignation_date: Set(input.resignation_date),
        last_working_date: Set(last_working_date),
        reason: Set(reason),
        status: Set(ResignationStatus::Applied),
        exit_status: Set(None),
        applied_to: Set(approver.as_ref().map(|a| a.id)),
        applied_at: Set(now),
        approved_by: Set(None),
        approved_at: Set(None),
        feedback: Set(None),
        withdrawal_reason: Set(None),
        withdrawn_at: Set(None),
        completed_at: Set(None),
        resignation_count: Set(previous.len() as i32 + 1),
        previous_resignation_id: Set(previous.first().map(|r| r.id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut checklist = Vec::new();
    for task in exit_checklist(last_working_date) {
        checklist.push(
            resignation_checklist::ActiveModel {
                resignation_id: Set(resignation.id),
                task: Set(task.task),
                department: Set(task.department),
                due_date: Set(task.due_date),
                is_completed: Set(false),
                completed_on: Set(None),
                remarks: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?,
        );
    }

    set_notice_fields(&txn, employee, Some((start, last_working_date))).await?;
    txn.commit().await?;

    info!(
        resignation_id = resignation.id,
        employee_id = resignation.employee_id,
        last_working_date = %resignation.last_working_date,
        applied_to = ?resignation.applied_to,
        "Resignation submitted"
    );
    Ok(ResignationSubmitted {
        resignation,
        checklist,
    })
}

/// Loads the acting employee and checks they may decide `resignation`.
async fn authorize<C: ConnectionTrait>(
    db: &C,
    resignation: &resignation::Model,
    actor_id: i32,
) -> HrmsResult<employee::Model> {
    let actor = super::find_employee(db, actor_id).await?;
    let employee = super::find_employee(db, resignation.employee_id).await?;
    if resignation.applied_to == Some(actor.id) || super::can_manage(&actor, &employee) {
        Ok(actor)
    } else {
        Err(HrmsError::forbidden(format!(
            "{} cannot decide this resignation",
            actor.employee_code
        )))
    }
}

fn transition_error(from: ResignationStatus, to: ResignationStatus) -> HrmsError {
    HrmsError::InvalidTransition {
        entity: "Resignation".to_string(),
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
    }
}

/// Marks an applied resignation as under review.
pub async fn review_resignation<C: ConnectionTrait>(
    db: &C,
    id: i32,
    actor_id: i32,
) -> HrmsResult<resignation::Model> {
    let resignation = find_resignation(db, id).await?;
    authorize(db, &resignation, actor_id).await?;
    if resignation.status != ResignationStatus::Applied {
        return Err(transition_error(resignation.status, ResignationStatus::UnderReview));
    }
    let mut active: resignation::ActiveModel = resignation.into();
    active.status = Set(ResignationStatus::UnderReview);
    let updated = active.update(db).await?;
    info!(resignation_id = id, actor_id, "Resignation under review");
    Ok(updated)
}

/// Accepts a resignation; the employee starts serving notice.
pub async fn approve_resignation<C: ConnectionTrait>(
    db: &C,
    id: i32,
    actor_id: i32,
    feedback: Option<String>,
    now: NaiveDateTime,
) -> HrmsResult<resignation::Model> {
    let resignation = find_resignation(db, id).await?;
    let actor = authorize(db, &resignation, actor_id).await?;
    if !matches!(
        resignation.status,
        ResignationStatus::Applied | ResignationStatus::UnderReview
    ) {
        return Err(transition_error(resignation.status, ResignationStatus::Accepted));
    }
    let mut active: resignation::ActiveModel = resignation.into();
    active.status = Set(ResignationStatus::Accepted);
    active.exit_status = Set(Some(ExitStatus::ServingNotice));
    active.approved_by = Set(Some(actor.id));
    active.approved_at = Set(Some(now));
    if let Some(feedback) = feedback.map(|f| f.trim().to_string()).filter(|f| !f.is_empty()) {
        active.feedback = Set(Some(feedback));
    }
    let updated = active.update(db).await?;
    info!(resignation_id = id, actor = %actor.employee_code, "Resignation accepted");
    Ok(updated)
}

/// Rejects a resignation with feedback and closes the notice window.
pub async fn reject_resignation(
    db: &DatabaseConnection,
    id: i32,
    actor_id: i32,
    feedback: String,
    now: NaiveDateTime,
) -> HrmsResult<resignation::Model> {
    let feedback = feedback.trim().to_string();
    if feedback.is_empty() {
        return Err(HrmsError::validation("feedback", "is required when rejecting"));
    }

    let txn = db.begin().await?;
    let resignation = find_resignation(&txn, id).await?;
    let actor = authorize(&txn, &resignation, actor_id).await?;
    if !matches!(
        resignation.status,
        ResignationStatus::Applied | ResignationStatus::UnderReview
    ) {
        return Err(transition_error(resignation.status, ResignationStatus::Rejected));
    }
    let employee = super::find_employee(&txn, resignation.employee_id).await?;
    set_notice_fields(&txn, employee, None).await?;

    let mut active: resignation::ActiveModel = resignation.into();
    active.status = Set(ResignationStatus::Rejected);
    active.approved_by = Set(Some(actor.id));
    active.approved_at = Set(Some(now));
    active.feedback = Set(Some(feedback));
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(resignation_id = id, actor = %actor.employee_code, "Resignation rejected");
    Ok(updated)
}

/// Withdraws the employee's own open resignation and drops its checklist.
pub async fn withdraw_resignation(
    db: &DatabaseConnection,
    id: i32,
    employee_id: i32,
    reason: Option<String>,
    now: NaiveDateTime,
) -> HrmsResult<resignation::Model> {
    let txn = db.begin().await?;
    let resignation = find_resignation(&txn, id).await?;
    if resignation.employee_id != employee_id {
        return Err(HrmsError::forbidden("only the employee can withdraw their resignation"));
    }
    if !resignation.status.is_open() {
        return Err(transition_error(resignation.status, ResignationStatus::Withdrawn));
    }

    entities::ResignationChecklist::delete_many()
        .filter(resignation_checklist::Column::ResignationId.eq(id))
        .exec(&txn)
        .await?;
    let employee = super::find_employee(&txn, employee_id).await?;
    set_notice_fields(&txn, employee, None).await?;

    let mut active: resignation::ActiveModel = resignation.into();
    active.status = Set(ResignationStatus::Withdrawn);
    active.exit_status = Set(None);
    active.withdrawal_reason = Set(reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()));
    active.withdrawn_at = Set(Some(now));
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(resignation_id = id, employee_id, "Resignation withdrawn");
    Ok(updated)
}

/// Completes an accepted resignation and deactivates the employee.
pub async fn complete_resignation(
    db: &DatabaseConnection,
    id: i32,
    actor_id: i32,
    now: NaiveDateTime,
) -> HrmsResult<resignation::Model> {
    let txn = db.begin().await?;
    let resignation = find_resignation(&txn, id).await?;
    authorize(&txn, &resignation, actor_id).await?;
    if resignation.status != ResignationStatus::Accepted {
        return Err(transition_error(resignation.status, ResignationStatus::Completed));
    }

    let employee = super::find_employee(&txn, resignation.employee_id).await?;
    let mut person: employee::ActiveModel = employee.into();
    person.status = Set(EmployeeStatus::Inactive);
    person.update(&txn).await?;

    let mut active: resignation::ActiveModel = resignation.into();
    active.status = Set(ResignationStatus::Completed);
    active.exit_status = Set(Some(ExitStatus::NoticeCompleted));
    active.completed_at = Set(Some(now));
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(resignation_id = id, employee_id = updated.employee_id, "Resignation completed; employee deactivated");
    Ok(updated)
}

/// Changes to one checklist task.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistUpdate {
    pub is_completed: bool,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Marks a checklist task done or not done.
pub async fn update_checklist_item<C: ConnectionTrait>(
    db: &C,
    item_id: i32,
    update: ChecklistUpdate,
    today: NaiveDate,
) -> HrmsResult<resignation_checklist::Model> {
    let item = entities::ResignationChecklist::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Checklist item", item_id))?;
    let completed_on = match (update.is_completed, item.completed_on) {
        (true, Some(done)) => Some(done),
        (true, None) => Some(today),
        (false, _) => None,
    };
    let mut active: resignation_checklist::ActiveModel = item.into();
    active.is_completed = Set(update.is_completed);
    active.completed_on = Set(completed_on);
    if update.remarks.is_some() {
        active.remarks = Set(update.remarks);
    }
    Ok(active.update(db).await?)
}

/// Exit interview answers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExitInterviewInput {
    pub interview_date: Option<NaiveDate>,
    pub reason_for_leaving: Option<String>,
    /// 1 to 5.
    pub job_satisfaction: Option<i32>,
    pub work_environment: Option<String>,
    pub management_feedback: Option<String>,
    pub suggestions: Option<String>,
    pub would_rejoin: Option<bool>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Creates or replaces the exit interview of a resignation.
pub async fn save_exit_interview<C: ConnectionTrait>(
    db: &C,
    resignation_id: i32,
    input: ExitInterviewInput,
) -> HrmsResult<exit_interview::Model> {
    find_resignation(db, resignation_id).await?;
    if input.job_satisfaction.is_some_and(|s| !(1..=5).contains(&s)) {
        return Err(HrmsError::validation("job_satisfaction", "must be between 1 and 5"));
    }

    let existing = entities::ExitInterview::find()
        .filter(exit_interview::Column::ResignationId.eq(resignation_id))
        .one(db)
        .await?;
    let mut active: exit_interview::ActiveModel = match existing {
        Some(model) => model.into(),
        None => exit_interview::ActiveModel {
            resignation_id: Set(resignation_id),
            ..Default::default()
        },
    };
    active.interview_date = Set(input.interview_date);
    active.reason_for_leaving = Set(input.reason_for_leaving);
    active.job_satisfaction = Set(input.job_satisfaction);
    active.work_environment = Set(input.work_environment);
    active.management_feedback = Set(input.management_feedback);
    active.suggestions = Set(input.suggestions);
    active.would_rejoin = Set(input.would_rejoin);
    active.is_completed = Set(input.is_completed);
    Ok(active.save(db).await?.try_into_model()?)
}

/// No-due certificate and settlement figures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoDueInput {
    /// Defaults to today.
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub pending_salary: Decimal,
    #[serde(default)]
    pub pending_bonus: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    pub settlement_mode: Option<SettlementMode>,
    pub settlement_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    pub remarks: Option<String>,
}

/// Creates or replaces the no-due certificate of a resignation.
pub async fn save_no_due_certificate<C: ConnectionTrait>(
    db: &C,
    resignation_id: i32,
    input: NoDueInput,
    today: NaiveDate,
) -> HrmsResult<no_due_certificate::Model> {
    let resignation = find_resignation(db, resignation_id).await?;
    let employee = super::find_employee(db, resignation.employee_id).await?;
    if [input.pending_salary, input.pending_bonus, input.deductions]
        .iter()
        .any(|amount| *amount < Decimal::ZERO)
    {
        return Err(HrmsError::validation("amounts", "must not be negative"));
    }

    let issue_date = input.issue_date.unwrap_or(today);
    let existing = entities::NoDueCertificate::find()
        .filter(no_due_certificate::Column::ResignationId.eq(resignation_id))
        .one(db)
        .await?;
    let mut active: no_due_certificate::ActiveModel = match existing {
        Some(model) => model.into(),
        None => no_due_certificate::ActiveModel {
            resignation_id: Set(resignation_id),
            ..Default::default()
        },
    };
    active.certificate_number = Set(no_due_certificate_number(&employee.employee_code, issue_date));
    active.issue_date = Set(issue_date);
    active.pending_salary = Set(input.pending_salary);
    active.pending_bonus = Set(input.pending_bonus);
    active.deductions = Set(input.deductions);
    active.final_settlement = Set(final_settlement(
        input.pending_salary,
        input.pending_bonus,
        input.deductions,
    ));
    active.settlement_mode = Set(input.settlement_mode);
    active.settlement_date = Set(input.settlement_date);
    active.is_completed = Set(input.is_completed);
    active.remarks = Set(input.remarks);
    let certificate = active.save(db).await?.try_into_model()?;

    info!(
        resignation_id,
        certificate = %certificate.certificate_number,
        settlement = %certificate.final_settlement,
        "No-due certificate saved"
    );
    Ok(certificate)
}

/// Everything shown on a resignation's page.
#[derive(Debug, Clone, Serialize)]
pub struct ResignationDetail {
    pub resignation: resignation::Model,
    pub employee_code: String,
    pub employee_name: String,
    pub checklist: Vec<resignation_checklist::Model>,
    pub exit_interview: Option<exit_interview::Model>,
    pub no_due_certificate: Option<no_due_certificate::Model>,
    pub notice: Option<NoticeProgress>,
    pub exit: ExitProgress,
    pub timeline: Vec<TimelineEntry>,
}

/// Fetches a resignation with its exit process and timeline.
pub async fn resignation_detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
    today: NaiveDate,
) -> HrmsResult<ResignationDetail> {
    let resignation = find_resignation(db, id).await?;
    let employee = super::find_employee(db, resignation.employee_id).await?;
    let checklist = entities::ResignationChecklist::find()
        .filter(resignation_checklist::Column::ResignationId.eq(id))
        .order_by_asc(resignation_checklist::Column::DueDate)
        .order_by_asc(resignation_checklist::Column::Id)
        .all(db)
        .await?;
    let exit_interview = entities::ExitInterview::find()
        .filter(exit_interview::Column::ResignationId.eq(id))
        .one(db)
        .await?;
    let no_due_certificate = entities::NoDueCertificate::find()
        .filter(no_due_certificate::Column::ResignationId.eq(id))
        .one(db)
        .await?;

    let exit = exit_progress(
        ExitFacts {
            checklist_completed: checklist.iter().filter(|c| c.is_completed).count() as u32,
            checklist_total: checklist.len() as u32,
            no_due_completed: no_due_certificate.as_ref().is_some_and(|n| n.is_completed),
            exit_interview_completed: exit_interview.as_ref().is_some_and(|e| e.is_completed),
            has_final_settlement: no_due_certificate
                .as_ref()
                .is_some_and(|n| n.final_settlement > Decimal::ZERO),
        },
        resignation.last_working_date,
        today,
    );
    let notice = notice_progress(
        resignation.status,
        resignation.resignation_date,
        resignation.last_working_date,
        today,
    );
    let timeline = status_timeline(
        TimelineFacts {
            status: resignation.status,
            applied_on: resignation.applied_at.date(),
            decided_on: resignation.approved_at.map(|at| at.date()),
            withdrawn_on: resignation.withdrawn_at.map(|at| at.date()),
            resignation_date: resignation.resignation_date,
            last_working_date: resignation.last_working_date,
        },
        &exit,
        today,
    );

    Ok(ResignationDetail {
        employee_code: employee.employee_code.clone(),
        employee_name: employee.full_name(),
        resignation,
        checklist,
        exit_interview,
        no_due_certificate,
        notice,
        exit,
        timeline,
    })
}

/// Filters for the resignation list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResignationFilter {
    pub status: Option<ResignationStatus>,
    pub employee_id: Option<i32>,
    /// Only resignations routed to this approver.
    pub applied_to: Option<i32>,
}

/// Lists resignations, newest first.
pub async fn list_resignations<C: ConnectionTrait>(
    db: &C,
    filter: &ResignationFilter,
) -> HrmsResult<Vec<resignation::Model>> {
    let mut query = entities::Resignation::find();
    if let Some(status) = filter.status {
        query = query.filter(resignation::Column::Status.eq(status));
    }
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(resignation::Column::EmployeeId.eq(employee_id));
    }
    if let Some(applied_to) = filter.applied_to {
        query = query.filter(resignation::Column::AppliedTo.eq(applied_to));
    }
    Ok(query
        .order_by_desc(resignation::Column::AppliedAt)
        .order_by_desc(resignation::Column::Id)
        .all(db)
        .await?)
}

/// Resignations per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResignationCounts {
    pub total: u64,
    pub applied: u64,
    pub under_review: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub withdrawn: u64,
    pub completed: u64,
}

/// Counts resignations by status.
pub async fn resignation_counts<C: ConnectionTrait>(db: &C) -> HrmsResult<ResignationCounts> {
    let count = |status: ResignationStatus| {
        entities::Resignation::find()
            .filter(resignation::Column::Status.eq(status))
            .count(db)
    };
    Ok(ResignationCounts {
        total: entities::Resignation::find().count(db).await?,
        applied: count(ResignationStatus::Applied).await?,
        under_review: count(ResignationStatus::UnderReview).await?,
        accepted: count(ResignationStatus::Accepted).await?,
        rejected: count(ResignationStatus::Rejected).await?,
        withdrawn: count(ResignationStatus::Withdrawn).await?,
        completed: count(ResignationStatus::Completed).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::TimelineStage;
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    fn now() -> NaiveDateTime {
        date(2026, 10, 17).and_hms_opt(10, 0, 0).unwrap()
    }

    struct Fixture {
        db: DatabaseConnection,
        config: ConfigLoader,
        manager: employee::Model,
        hr: employee::Model,
        employee: employee::Model,
    }

    async fn fixture() -> HrmsResult<Fixture> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = now().date();
        let hr = create_employee_with(&db, &config, "HR001", date(2019, 1, 1), today, EmployeeRole::Hr, None, None).await?;
        let manager = create_employee_with(
            &db,
            &config,
            "MGR001",
            date(2019, 1, 1),
            today,
            EmployeeRole::Manager,
            None,
            None,
        )
        .await?;
        let employee = create_employee_with(
            &db,
            &config,
            "EMP600",
            date(2022, 1, 1),
            today,
            EmployeeRole::Employee,
            None,
            Some("MGR001"),
        )
        .await?;
        Ok(Fixture { db, config, manager, hr, employee })
    }

    fn request(employee_id: i32) -> ResignationRequest {
        ResignationRequest {
            employee_id,
            resignation_date: date(2026, 10, 20),
            reason: "Relocating".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_routes_to_manager_and_builds_checklist() -> HrmsResult<()> {
        let f = fixture().await?;
        let submitted = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await?;
        let resignation = &submitted.resignation;
        assert_eq!(resignation.applied_to, Some(f.manager.id));
        assert_eq!(resignation.last_working_date, date(2026, 12, 19));
        assert_eq!(resignation.resignation_count, 1);
        assert_eq!(submitted.checklist.len(), 10);

        let person = crate::services::find_employee(&f.db, f.employee.id).await?;
        assert_eq!(person.notice_period_end, Some(date(2026, 12, 19)));

        let second = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await;
        assert!(matches!(second, Err(HrmsError::Duplicate { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_without_manager_goes_to_hr() -> HrmsResult<()> {
        let f = fixture().await?;
        let loner = create_employee(&f.db, &f.config, "EMP601", date(2022, 1, 1), now().date()).await?;
        let submitted = submit_resignation(&f.db, &f.config, request(loner.id), now()).await?;
        assert_eq!(submitted.resignation.applied_to, Some(f.hr.id));

        let past = submit_resignation(
            &f.db,
            &f.config,
            ResignationRequest {
                employee_id: f.employee.id,
                resignation_date: date(2026, 10, 1),
                reason: "Late".to_string(),
            },
            now(),
        )
        .await;
        assert!(matches!(past, Err(HrmsError::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_accept_then_complete_deactivates_employee() -> HrmsResult<()> {
        let f = fixture().await?;
        let submitted = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await?;
        let id = submitted.resignation.id;

        let outsider = create_employee(&f.db, &f.config, "EMP602", date(2022, 1, 1), now().date()).await?;
        let denied = approve_resignation(&f.db, id, outsider.id, None, now()).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        review_resignation(&f.db, id, f.manager.id).await?;
        let accepted = approve_resignation(&f.db, id, f.manager.id, None, now()).await?;
        assert_eq!(accepted.status, ResignationStatus::Accepted);
        assert_eq!(accepted.exit_status, Some(ExitStatus::ServingNotice));

        let detail = resignation_detail(&f.db, id, date(2026, 11, 19)).await?;
        let notice = detail.notice.unwrap();
        assert_eq!(notice.total_days, 60);
        assert_eq!(notice.days_completed, 30);
        assert!(detail
            .timeline
            .iter()
            .any(|t| t.stage == TimelineStage::ServingNotice && t.active));

        let completed = complete_resignation(&f.db, id, f.hr.id, now()).await?;
        assert_eq!(completed.status, ResignationStatus::Completed);
        let person = crate::services::find_employee(&f.db, f.employee.id).await?;
        assert_eq!(person.status, EmployeeStatus::Inactive);

        let counts = resignation_counts(&f.db).await?;
        assert_eq!(counts.total, 1);
        assert_eq!(counts.completed, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_requires_feedback_and_withdraw_clears_checklist() -> HrmsResult<()> {
        let f = fixture().await?;
        let first = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await?;
        let blank = reject_resignation(&f.db, first.resignation.id, f.hr.id, " ".to_string(), now()).await;
        assert!(matches!(blank, Err(HrmsError::Validation { .. })));
        let rejected =
            reject_resignation(&f.db, first.resignation.id, f.hr.id, "Please stay".to_string(), now()).await?;
        assert_eq!(rejected.feedback.as_deref(), Some("Please stay"));

        let second = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await?;
        assert_eq!(second.resignation.resignation_count, 2);
        assert_eq!(second.resignation.previous_resignation_id, Some(first.resignation.id));

        let not_owner =
            withdraw_resignation(&f.db, second.resignation.id, f.manager.id, None, now()).await;
        assert!(matches!(not_owner, Err(HrmsError::Forbidden { .. })));
        let withdrawn = withdraw_resignation(
            &f.db,
            second.resignation.id,
            f.employee.id,
            Some("Changed my mind".to_string()),
            now(),
        )
        .await?;
        assert_eq!(withdrawn.status, ResignationStatus::Withdrawn);

        let detail = resignation_detail(&f.db, second.resignation.id, now().date()).await?;
        assert!(detail.checklist.is_empty());
        let person = crate::services::find_employee(&f.db, f.employee.id).await?;
        assert_eq!(person.resignation_date, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_exit_process_records() -> HrmsResult<()> {
        let f = fixture().await?;
        let submitted = submit_resignation(&f.db, &f.config, request(f.employee.id), now()).await?;
        let id = submitted.resignation.id;

        let item = update_checklist_item(
            &f.db,
            submitted.checklist[0].id,
            ChecklistUpdate {
                is_completed: true,
                remarks: Some("Booked".to_string()),
            },
            date(2026, 10, 21),
        )
        .await?;
        assert_eq!(item.completed_on, Some(date(2026, 10, 21)));

        let bad = save_exit_interview(
            &f.db,
            id,
            ExitInterviewInput {
                job_satisfaction: Some(7),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad, Err(HrmsError::Validation { .. })));
        save_exit_interview(
            &f.db,
            id,
            ExitInterviewInput {
                job_satisfaction: Some(4),
                is_completed: true,
                ..Default::default()
            },
        )
        .await?;

        let ndc = save_no_due_certificate(
            &f.db,
            id,
            NoDueInput {
                pending_salary: "30000".parse().unwrap(),
                pending_bonus: "5000".parse().unwrap(),
                deductions: "2500".parse().unwrap(),
                ..Default::default()
            },
            date(2026, 12, 19),
        )
        .await?;
        assert_eq!(ndc.certificate_number, "NDCEMP60020261219");
        assert_eq!(ndc.final_settlement, "32500".parse::<Decimal>().unwrap());

        // Saving again updates the same certificate.
        let again = save_no_due_certificate(
            &f.db,
            id,
            NoDueInput {
                is_completed: true,
                ..Default::default()
            },
            date(2026, 12, 19),
        )
        .await?;
        assert_eq!(again.id, ndc.id);

        let detail = resignation_detail(&f.db, id, date(2026, 12, 1)).await?;
        assert_eq!(detail.exit.checklist_completed, 1);
        assert!(detail.exit.exit_interview);
        assert!(detail.exit.no_due_certificate);
        Ok(())
    }
}
