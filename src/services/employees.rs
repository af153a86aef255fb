//! Employee records, profiles and celebrations.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ConfigLoader;
use crate::entities::{
    self, celebration_wish, employee, leave_balance, CelebrationKind, EmployeeRole, EmployeeStatus,
};
use crate::error::{HrmsError, HrmsResult};
use crate::models::AuditTrace;
use crate::rules::{completed_years, is_anniversary, probation_end_date, probation_status};

use super::{balances, masters};

/// Input for a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    /// The HR administrator creating the record. Only the very first
    /// employee, who must hold an HR or admin role, may be created without.
    #[serde(default)]
    pub actor_id: Option<i32>,
    pub employee_code: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub marriage_date: Option<NaiveDate>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub role: Option<EmployeeRole>,
    pub date_of_joining: NaiveDate,
    #[serde(default)]
    pub worker_type: Option<String>,
    /// Employee code of the reporting manager.
    #[serde(default)]
    pub reporting_manager: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    pub uan_number: Option<String>,
    #[serde(default)]
    pub esi_number: Option<String>,
    #[serde(default)]
    pub basic_salary: Option<Decimal>,
    /// Defaults to the organization probation length.
    #[serde(default)]
    pub probation_period_days: Option<i32>,
    /// Defaults to the organization notice period.
    #[serde(default)]
    pub notice_period_days: Option<i32>,
}

impl NewEmployee {
    /// A minimal employee with every optional field unset.
    pub fn new(code: &str, first_name: &str, last_name: &str, email: &str, joined: NaiveDate) -> Self {
        Self {
            actor_id: None,
            employee_code: code.to_string(),
            first_name: first_name.to_string(),
            middle_name: None,
            last_name: last_name.to_string(),
            email: email.to_string(),
            phone: None,
            gender: None,
            date_of_birth: None,
            marriage_date: None,
            department: None,
            designation: None,
            location: None,
            role: None,
            date_of_joining: joined,
            worker_type: None,
            reporting_manager: None,
            bank_name: None,
            account_number: None,
            ifsc_code: None,
            pan_number: None,
            aadhar_number: None,
            uan_number: None,
            esi_number: None,
            basic_salary: None,
            probation_period_days: None,
            notice_period_days: None,
        }
    }
}

/// Partial update of an employee. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    /// HR, or the employee's reporting manager.
    pub actor_id: i32,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub marriage_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub role: Option<EmployeeRole>,
    pub date_of_joining: Option<NaiveDate>,
    pub worker_type: Option<String>,
    pub reporting_manager: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub uan_number: Option<String>,
    pub esi_number: Option<String>,
    pub basic_salary: Option<Decimal>,
    pub probation_period_days: Option<i32>,
    pub notice_period_days: Option<i32>,
    pub resignation_date: Option<NaiveDate>,
}

/// A created employee with the balances opened for them.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeCreated {
    pub employee: employee::Model,
    pub balances: Vec<leave_balance::Model>,
    pub trace: AuditTrace,
}

fn required(field: &str, value: &str) -> HrmsResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(HrmsError::validation(field, "is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_email(email: &str) -> HrmsResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(HrmsError::validation("email", format!("'{}' is not an email address", email))),
    }
}

async fn ensure_unique<C: ConnectionTrait>(
    db: &C,
    column: employee::Column,
    value: &str,
    label: &str,
    except_id: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::Employee::find().filter(column.eq(value));
    if let Some(id) = except_id {
        query = query.filter(employee::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: format!("Employee {}", label),
            key: value.to_string(),
        });
    }
    Ok(())
}

async fn ensure_manager_exists<C: ConnectionTrait>(db: &C, code: &str) -> HrmsResult<()> {
    let found = entities::Employee::find()
        .filter(employee::Column::EmployeeCode.eq(code))
        .one(db)
        .await?;
    if found.is_none() {
        return Err(HrmsError::validation(
            "reporting_manager",
            format!("no employee with code {}", code),
        ));
    }
    Ok(())
}

/// Notice period window starting on the resignation date.
pub(crate) fn notice_window(resignation_date: NaiveDate, notice_days: i32) -> (NaiveDate, NaiveDate) {
    (
        resignation_date,
        resignation_date + chrono::Duration::days(i64::from(notice_days.max(0))),
    )
}

async fn authorize_creation<C: ConnectionTrait>(
    db: &C,
    actor_id: Option<i32>,
    role: EmployeeRole,
) -> HrmsResult<()> {
    if let Some(actor_id) = actor_id {
        super::require_hr(db, actor_id).await?;
        return Ok(());
    }
    let first = entities::Employee::find().one(db).await?.is_none();
    if first && role.is_hr_or_admin() {
        info!(role = ?role, "Creating the first administrator");
        Ok(())
    } else {
        Err(HrmsError::forbidden(
            "creating an employee requires the actor_id of an HR administrator",
        ))
    }
}

/// Creates an employee and opens their leave balances in one transaction.
///
/// The actor must hold an HR role, except when bootstrapping an empty
/// directory with its first administrator.
pub async fn create_employee(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    input: NewEmployee,
    now: NaiveDateTime,
) -> HrmsResult<EmployeeCreated> {
    let txn = db.begin().await?;
    authorize_creation(&txn, input.actor_id, input.role.unwrap_or(EmployeeRole::Employee)).await?;
    let created = insert_employee(&txn, config, input, now).await?;
    txn.commit().await?;

    info!(
        employee_id = created.employee.id,
        employee_code = %created.employee.employee_code,
        probation_end = %created.employee.probation_end_date,
        balances = created.balances.len(),
        "Employee created"
    );
    Ok(created)
}

/// Validates and inserts an employee, then opens their balances.
///
/// Does no role check; callers authorize first.
pub(crate) async fn insert_employee<C: ConnectionTrait>(
    txn: &C,
    config: &ConfigLoader,
    input: NewEmployee,
    now: NaiveDateTime,
) -> HrmsResult<EmployeeCreated> {
    let code = required("employee_code", &input.employee_code)?;
    let first_name = required("first_name", &input.first_name)?;
    let last_name = required("last_name", &input.last_name)?;
    let email = required("email", &input.email)?.to_lowercase();
    check_email(&email)?;

    let organization = config.organization();
    let probation_days = input
        .probation_period_days
        .unwrap_or(organization.default_probation_days);
    let notice_days = input
        .notice_period_days
        .unwrap_or(organization.default_notice_period_days);
    if probation_days < 0 {
        return Err(HrmsError::validation("probation_period_days", "must not be negative"));
    }
    if notice_days < 0 {
        return Err(HrmsError::validation("notice_period_days", "must not be negative"));
    }

    ensure_unique(txn, employee::Column::EmployeeCode, &code, "code", None).await?;
    ensure_unique(txn, employee::Column::Email, &email, "email", None).await?;
    if let Some(manager) = input.reporting_manager.as_deref() {
        ensure_manager_exists(txn, manager).await?;
    }
    let department = match input.department.as_deref() {
        Some(name) => Some(masters::ensure_department(txn, name).await?.name),
        None => None,
    };
    if let Some(title) = input.designation.as_deref() {
        masters::ensure_designation(txn, title, department.as_deref()).await?;
    }

    let employee = employee::ActiveModel {
        employee_code: Set(code),
        first_name: Set(first_name),
        middle_name: Set(input.middle_name),
        last_name: Set(last_name),
        email: Set(email),
        phone: Set(input.phone),
        gender: Set(input.gender),
        date_of_birth: Set(input.date_of_birth),
        marriage_date: Set(input.marriage_date),
        department: Set(department),
        designation: Set(input.designation),
        location: Set(input.location),
        role: Set(input.role.unwrap_or(EmployeeRole::Employee)),
        date_of_joining: Set(input.date_of_joining),
        worker_type: Set(input.worker_type),
        reporting_manager: Set(input.reporting_manager),
        status: Set(EmployeeStatus::Active),
        bank_name: Set(input.bank_name),
        account_number: Set(input.account_number),
        ifsc_code: Set(input.ifsc_code),
        pan_number: Set(input.pan_number),
        aadhar_number: Set(input.aadhar_number),
        uan_number: Set(input.uan_number),
        esi_number: Set(input.esi_number),
        basic_salary: Set(input.basic_salary),
        probation_period_days: Set(probation_days),
        probation_end_date: Set(probation_end_date(input.date_of_joining, probation_days)),
        notice_period_days: Set(notice_days),
        resignation_date: Set(None),
        notice_period_start: Set(None),
        notice_period_end: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let init = balances::initialize_balances(txn, &employee, config, now.date(), now).await?;
    Ok(EmployeeCreated {
        employee,
        balances: init.created,
        trace: init.trace,
    })
}

/// Applies a partial update on behalf of HR or the reporting manager.
///
/// Role, status and salary changes are reserved to HR. When the probation
/// end date moves to today or earlier, Earned and Optional balances are
/// recomputed in the same transaction. The notice window follows the
/// resignation date and the notice length.
pub async fn update_employee(
    db: &DatabaseConnection,
    config: &ConfigLoader,
    id: i32,
    update: EmployeeUpdate,
    now: NaiveDateTime,
) -> HrmsResult<employee::Model> {
    let today = now.date();
    let txn = db.begin().await?;
    let existing = super::find_employee(&txn, id).await?;
    let actor = super::find_employee(&txn, update.actor_id).await?;
    if !super::can_manage(&actor, &existing) {
        return Err(HrmsError::forbidden(format!(
            "{} may not edit {}",
            actor.employee_code, existing.employee_code
        )));
    }
    let hr_only = update.role.is_some() || update.status.is_some() || update.basic_salary.is_some();
    if hr_only && !actor.role.is_hr_or_admin() {
        return Err(HrmsError::forbidden("role, status and salary are changed by HR"));
    }
    let old_probation_end = existing.probation_end_date;

    let mut active: employee::ActiveModel = existing.clone().into();

    if let Some(value) = update.first_name {
        active.first_name = Set(required("first_name", &value)?);
    }
    if let Some(value) = update.middle_name {
        active.middle_name = Set(Some(value));
    }
    if let Some(value) = update.last_name {
        active.last_name = Set(required("last_name", &value)?);
    }
    if let Some(value) = update.email {
        let email = required("email", &value)?.to_lowercase();
        check_email(&email)?;
        ensure_unique(&txn, employee::Column::Email, &email, "email", Some(id)).await?;
        active.email = Set(email);
    }
    if let Some(value) = update.phone {
        active.phone = Set(Some(value));
    }
    if let Some(value) = update.gender {
        active.gender = Set(Some(value));
    }
    if let Some(value) = update.date_of_birth {
        active.date_of_birth = Set(Some(value));
    }
    if let Some(value) = update.marriage_date {
        active.marriage_date = Set(Some(value));
    }
    let department = match update.department.as_deref() {
        Some(name) => {
            let found = masters::ensure_department(&txn, name).await?;
            active.department = Set(Some(found.name.clone()));
            Some(found.name)
        }
        None => existing.department.clone(),
    };
    if let Some(value) = update.designation {
        masters::ensure_designation(&txn, &value, department.as_deref()).await?;
        active.designation = Set(Some(value));
    }
    if let Some(value) = update.location {
        active.location = Set(Some(value));
    }
    if let Some(value) = update.role {
        active.role = Set(value);
    }
    if let Some(value) = update.worker_type {
        active.worker_type = Set(Some(value));
    }
    if let Some(value) = update.reporting_manager {
        if value == existing.employee_code {
            return Err(HrmsError::validation("reporting_manager", "an employee cannot report to themselves"));
        }
        ensure_manager_exists(&txn, &value).await?;
        active.reporting_manager = Set(Some(value));
    }
    if let Some(value) = update.status {
        active.status = Set(value);
    }
    if let Some(value) = update.bank_name {
        active.bank_name = Set(Some(value));
    }
    if let Some(value) = update.account_number {
        active.account_number = Set(Some(value));
    }
    if let Some(value) = update.ifsc_code {
        active.ifsc_code = Set(Some(value));
    }
    if let Some(value) = update.pan_number {
        active.pan_number = Set(Some(value));
    }
    if let Some(value) = update.aadhar_number {
        active.aadhar_number = Set(Some(value));
    }
    if let Some(value) = update.uan_number {
        active.uan_number = Set(Some(value));
    }
    if let Some(value) = update.esi_number {
        active.esi_number = Set(Some(value));
    }
    if let Some(value) = update.basic_salary {
        if value < Decimal::ZERO {
            return Err(HrmsError::validation("basic_salary", "must not be negative"));
        }
        active.basic_salary = Set(Some(value));
    }

    let joining = update.date_of_joining.unwrap_or(existing.date_of_joining);
    let probation_days = update
        .probation_period_days
        .unwrap_or(existing.probation_period_days);
    if probation_days < 0 {
        return Err(HrmsError::validation("probation_period_days", "must not be negative"));
    }
    let new_probation_end = probation_end_date(joining, probation_days);
    active.date_of_joining = Set(joining);
    active.probation_period_days = Set(probation_days);
    active.probation_end_date = Set(new_probation_end);

    let notice_days = update
        .notice_period_days
        .unwrap_or(existing.notice_period_days);
    if notice_days < 0 {
        return Err(HrmsError::validation("notice_period_days", "must not be negative"));
    }
    active.notice_period_days = Set(notice_days);
    let notice_changed = update.resignation_date.is_some() || notice_days != existing.notice_period_days;
    let resignation_date = update.resignation_date.or(existing.resignation_date);
    if let Some(resignation_date) = resignation_date.filter(|_| notice_changed) {
        let (start, end) = notice_window(resignation_date, notice_days);
        active.resignation_date = Set(Some(resignation_date));
        active.notice_period_start = Set(Some(start));
        active.notice_period_end = Set(Some(end));
    }

    let updated = active.update(&txn).await?;

    if new_probation_end != old_probation_end && new_probation_end <= today {
        balances::apply_probation_end(&txn, &updated, config, today, now).await?;
    }
    txn.commit().await?;

    info!(employee_id = id, "Employee updated");
    Ok(updated)
}

/// An employee with derived status fields.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeProfile {
    #[serde(flatten)]
    pub employee: employee::Model,
    pub full_name: String,
    pub is_on_probation: bool,
    pub probation_message: Option<String>,
    pub probation_days_remaining: i64,
    pub years_of_service: i32,
    pub is_on_notice_period: bool,
    pub notice_days_remaining: Option<i64>,
}

/// Builds the derived profile of an employee on `today`.
pub fn profile(employee: employee::Model, today: NaiveDate) -> EmployeeProfile {
    let probation = probation_status(
        employee.date_of_joining,
        employee.probation_period_days,
        today,
    );
    let is_on_notice_period = match (employee.notice_period_start, employee.notice_period_end) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => false,
    };
    let notice_days_remaining = employee
        .notice_period_end
        .filter(|_| is_on_notice_period)
        .map(|end| (end - today).num_days());

    EmployeeProfile {
        full_name: employee.full_name(),
        is_on_probation: probation.on_probation,
        probation_message: probation.message(),
        probation_days_remaining: probation.days_remaining,
        years_of_service: completed_years(employee.date_of_joining, today),
        is_on_notice_period,
        notice_days_remaining,
        employee,
    }
}

/// Fetches an employee's profile.
pub async fn get_employee<C: ConnectionTrait>(
    db: &C,
    id: i32,
    today: NaiveDate,
) -> HrmsResult<EmployeeProfile> {
    let employee = super::find_employee(db, id).await?;
    Ok(profile(employee, today))
}

/// Filters for the employee list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub status: Option<EmployeeStatus>,
    pub department: Option<String>,
    pub location: Option<String>,
    /// Matches name, employee code or email.
    pub search: Option<String>,
}

/// Lists employees by code.
pub async fn list_employees<C: ConnectionTrait>(
    db: &C,
    filter: &EmployeeFilter,
) -> HrmsResult<Vec<employee::Model>> {
    let mut query = entities::Employee::find();
    if let Some(status) = filter.status {
        query = query.filter(employee::Column::Status.eq(status));
    }
    if let Some(department) = filter.department.as_deref() {
        query = query.filter(employee::Column::Department.eq(department));
    }
    if let Some(location) = filter.location.as_deref() {
        query = query.filter(employee::Column::Location.eq(location));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(search_condition(search));
    }
    Ok(query
        .order_by_asc(employee::Column::EmployeeCode)
        .all(db)
        .await?)
}

/// Matches an employee's names, code or email against `search`.
pub(crate) fn search_condition(search: &str) -> Condition {
    Condition::any()
        .add(employee::Column::FirstName.contains(search))
        .add(employee::Column::LastName.contains(search))
        .add(employee::Column::EmployeeCode.contains(search))
        .add(employee::Column::Email.contains(search))
}

/// One celebration on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Celebration {
    pub employee_id: i32,
    pub employee_code: String,
    pub name: String,
    pub kind: CelebrationKind,
    /// Age, years of service or years married.
    pub years: i32,
}

/// Birthdays, work anniversaries and marriage anniversaries of active
/// employees on `today`.
pub async fn celebrations<C: ConnectionTrait>(db: &C, today: NaiveDate) -> HrmsResult<Vec<Celebration>> {
    let employees = entities::Employee::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active))
        .order_by_asc(employee::Column::FirstName)
        .all(db)
        .await?;

    let mut result = Vec::new();
    for employee in employees {
        let mut push = |kind, since: NaiveDate| {
            result.push(Celebration {
                employee_id: employee.id,
                employee_code: employee.employee_code.clone(),
                name: employee.full_name(),
                kind,
                years: completed_years(since, today),
            });
        };
        if let Some(dob) = employee.date_of_birth.filter(|d| is_anniversary(*d, today)) {
            push(CelebrationKind::Birthday, dob);
        }
        if employee.date_of_joining < today && is_anniversary(employee.date_of_joining, today) {
            push(CelebrationKind::WorkAnniversary, employee.date_of_joining);
        }
        if let Some(married) = employee.marriage_date.filter(|d| *d < today && is_anniversary(*d, today)) {
            push(CelebrationKind::MarriageAnniversary, married);
        }
    }
    Ok(result)
}

/// A wish from one colleague to another.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWish {
    pub wisher_id: i32,
    pub celebrant_id: i32,
    pub message: String,
    pub wish_type: CelebrationKind,
}

/// A received wish with its sender.
#[derive(Debug, Clone, Serialize)]
pub struct WishView {
    #[serde(flatten)]
    pub wish: celebration_wish::Model,
    pub wisher_code: String,
    pub wisher_name: String,
}

/// Records a wish. Both employees must be active and nobody can wish
/// themselves.
pub async fn send_celebration_wish<C: ConnectionTrait>(
    db: &C,
    input: NewWish,
    now: NaiveDateTime,
) -> HrmsResult<celebration_wish::Model> {
    if input.wisher_id == input.celebrant_id {
        return Err(HrmsError::validation("celebrant_id", "cannot send a wish to yourself"));
    }
    let message = input.message.trim();
    if message.is_empty() {
        return Err(HrmsError::validation("message", "is required"));
    }
    for (field, id) in [("wisher_id", input.wisher_id), ("celebrant_id", input.celebrant_id)] {
        let employee = super::find_employee(db, id).await?;
        if employee.status != EmployeeStatus::Active {
            return Err(HrmsError::validation(
                field,
                format!("{} is not an active employee", employee.employee_code),
            ));
        }
    }

    let wish = celebration_wish::ActiveModel {
        celebrant_id: Set(input.celebrant_id),
        wisher_id: Set(input.wisher_id),
        message: Set(message.to_string()),
        wish_type: Set(input.wish_type),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(
        wish_id = wish.id,
        celebrant_id = wish.celebrant_id,
        wisher_id = wish.wisher_id,
        kind = ?wish.wish_type,
        "Celebration wish sent"
    );
    Ok(wish)
}

/// Wishes an employee received, newest first.
pub async fn celebration_wishes<C: ConnectionTrait>(
    db: &C,
    celebrant_id: i32,
    kind: Option<CelebrationKind>,
) -> HrmsResult<Vec<WishView>> {
    super::find_employee(db, celebrant_id).await?;
    let mut query = entities::CelebrationWish::find()
        .filter(celebration_wish::Column::CelebrantId.eq(celebrant_id));
    if let Some(kind) = kind {
        query = query.filter(celebration_wish::Column::WishType.eq(kind));
    }
    let wishes = query
        .order_by_desc(celebration_wish::Column::CreatedAt)
        .order_by_desc(celebration_wish::Column::Id)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(wishes.len());
    for wish in wishes {
        let wisher = super::find_employee(db, wish.wisher_id).await?;
        views.push(WishView {
            wish,
            wisher_code: wisher.employee_code.clone(),
            wisher_name: wisher.full_name(),
        });
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    async fn hr(db: &DatabaseConnection, config: &ConfigLoader) -> HrmsResult<employee::Model> {
        create_employee_with(db, config, "HR001", date(2020, 1, 1), date(2026, 10, 17), EmployeeRole::Hr, None, None).await
    }

    #[tokio::test]
    async fn test_create_employee_derives_probation_end() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let employee = create_employee(&db, &config, "EMP100", date(2026, 9, 1), date(2026, 10, 17)).await?;
        assert_eq!(employee.probation_end_date, date(2026, 11, 30));
        assert_eq!(employee.notice_period_days, 60);

        let profile = get_employee(&db, employee.id, date(2026, 10, 17)).await?;
        assert!(profile.is_on_probation);
        assert_eq!(
            profile.probation_message.as_deref(),
            Some("Probation ends in 44 days (30 Nov 2026)")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_code_and_email_rejected() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        create_employee(&db, &config, "EMP101", date(2025, 1, 1), date(2026, 10, 17)).await?;

        let same_code = create_employee(&db, &config, "EMP101", date(2025, 1, 1), date(2026, 10, 17)).await;
        assert!(matches!(same_code, Err(HrmsError::Duplicate { .. })));

        let now = date(2026, 10, 17).and_hms_opt(9, 0, 0).unwrap();
        let same_email = create_employee_input(&db, &config, hr.id, "EMP999", "emp101@example.com", now).await;
        assert!(matches!(same_email, Err(HrmsError::Duplicate { .. })));
        Ok(())
    }

    async fn create_employee_input(
        db: &DatabaseConnection,
        config: &ConfigLoader,
        actor_id: i32,
        code: &str,
        email: &str,
        now: NaiveDateTime,
    ) -> HrmsResult<EmployeeCreated> {
        let mut input = NewEmployee::new(code, "Other", "Person", email, date(2025, 1, 1));
        input.actor_id = Some(actor_id);
        super::create_employee(db, config, input, now).await
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        let now = date(2026, 10, 17).and_hms_opt(9, 0, 0).unwrap();
        let result = create_employee_input(&db, &config, hr.id, "EMP102", "not-an-email", now).await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_only_the_first_employee_may_be_created_without_hr() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let now = date(2026, 10, 17).and_hms_opt(9, 0, 0).unwrap();

        let clerk = NewEmployee::new("EMP110", "First", "Clerk", "clerk@example.com", date(2025, 1, 1));
        let denied = super::create_employee(&db, &config, clerk, now).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        let mut admin = NewEmployee::new("ADM001", "First", "Admin", "admin@example.com", date(2025, 1, 1));
        admin.role = Some(EmployeeRole::Admin);
        let admin = super::create_employee(&db, &config, admin, now).await?.employee;

        let mut second = NewEmployee::new("ADM002", "Second", "Admin", "admin2@example.com", date(2025, 1, 1));
        second.role = Some(EmployeeRole::Admin);
        let denied = super::create_employee(&db, &config, second.clone(), now).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        let clerk = create_employee(&db, &config, "EMP111", date(2025, 1, 1), now.date()).await?;
        second.actor_id = Some(clerk.id);
        let denied = super::create_employee(&db, &config, second.clone(), now).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        second.actor_id = Some(admin.id);
        assert!(super::create_employee(&db, &config, second, now).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_shortening_probation_applies_probation_end() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        let today = date(2026, 10, 17);
        let employee = create_employee(&db, &config, "EMP103", date(2026, 6, 1), today).await?;
        let now = today.and_hms_opt(10, 0, 0).unwrap();

        let updated = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                probation_period_days: Some(30),
                ..Default::default()
            },
            now,
        )
        .await?;
        assert_eq!(updated.probation_end_date, date(2026, 7, 1));

        // Three full months after 1 July by 17 October; October's share
        // waits for its accrual run.
        let balances = balances::employee_balances(&db, employee.id, 2026).await?;
        let earned = balances
            .iter()
            .find(|b| b.kind == entities::LeaveKind::Earned)
            .unwrap();
        assert_eq!(earned.total, Decimal::from(3));
        assert!(balances.iter().any(|b| b.kind == entities::LeaveKind::Optional));
        Ok(())
    }

    #[tokio::test]
    async fn test_resignation_date_opens_notice_window() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        let today = date(2026, 10, 17);
        let employee = create_employee(&db, &config, "EMP104", date(2024, 1, 1), today).await?;

        let updated = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                resignation_date: Some(today),
                ..Default::default()
            },
            today.and_hms_opt(10, 0, 0).unwrap(),
        )
        .await?;
        assert_eq!(updated.notice_period_end, Some(date(2026, 12, 16)));

        let profile = profile(updated, today);
        assert!(profile.is_on_notice_period);
        assert_eq!(profile.notice_days_remaining, Some(60));
        assert_eq!(profile.years_of_service, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_shorter_notice_period_moves_notice_end() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let employee = create_employee(&db, &config, "EMP108", date(2024, 1, 1), today).await?;

        update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                resignation_date: Some(today),
                ..Default::default()
            },
            now,
        )
        .await?;
        let shortened = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                notice_period_days: Some(30),
                ..Default::default()
            },
            now,
        )
        .await?;
        assert_eq!(shortened.resignation_date, Some(today));
        assert_eq!(shortened.notice_period_start, Some(today));
        assert_eq!(shortened.notice_period_end, Some(date(2026, 11, 16)));

        // No resignation on file: only the length changes.
        let other = create_employee(&db, &config, "EMP109", date(2024, 1, 1), today).await?;
        let untouched = update_employee(
            &db,
            &config,
            other.id,
            EmployeeUpdate {
                actor_id: hr.id,
                notice_period_days: Some(30),
                ..Default::default()
            },
            now,
        )
        .await?;
        assert_eq!(untouched.notice_period_days, 30);
        assert_eq!(untouched.notice_period_end, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_edits_are_limited_to_hr_and_the_manager() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let manager = create_employee(&db, &config, "EMP120", date(2022, 1, 1), today).await?;
        let report = create_employee_with(
            &db,
            &config,
            "EMP121",
            date(2023, 1, 1),
            today,
            EmployeeRole::Employee,
            None,
            Some("EMP120"),
        )
        .await?;
        let peer = create_employee(&db, &config, "EMP122", date(2023, 1, 1), today).await?;

        let by_peer = update_employee(
            &db,
            &config,
            report.id,
            EmployeeUpdate {
                actor_id: peer.id,
                phone: Some("9000000000".to_string()),
                ..Default::default()
            },
            now,
        )
        .await;
        assert!(matches!(by_peer, Err(HrmsError::Forbidden { .. })));

        let by_manager = update_employee(
            &db,
            &config,
            report.id,
            EmployeeUpdate {
                actor_id: manager.id,
                phone: Some("9000000000".to_string()),
                ..Default::default()
            },
            now,
        )
        .await?;
        assert_eq!(by_manager.phone.as_deref(), Some("9000000000"));

        let raise = update_employee(
            &db,
            &config,
            report.id,
            EmployeeUpdate {
                actor_id: manager.id,
                basic_salary: Some(Decimal::from(50000)),
                ..Default::default()
            },
            now,
        )
        .await;
        assert!(matches!(raise, Err(HrmsError::Forbidden { .. })));

        let promotion = update_employee(
            &db,
            &config,
            report.id,
            EmployeeUpdate {
                actor_id: manager.id,
                role: Some(EmployeeRole::Hr),
                ..Default::default()
            },
            now,
        )
        .await;
        assert!(matches!(promotion, Err(HrmsError::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_employees_search() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        create_employee(&db, &config, "EMP105", date(2024, 1, 1), date(2026, 10, 17)).await?;
        create_employee(&db, &config, "EMP106", date(2024, 1, 1), date(2026, 10, 17)).await?;

        let filter = EmployeeFilter {
            search: Some("EMP106".to_string()),
            ..Default::default()
        };
        let found = list_employees(&db, &filter).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_code, "EMP106");
        Ok(())
    }

    #[tokio::test]
    async fn test_celebrations_today() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(9, 0, 0).unwrap();

        let mut input = NewEmployee::new("EMP107", "Asha", "Rao", "asha@example.com", date(2021, 10, 17));
        input.date_of_birth = Some(date(1990, 10, 17));
        insert_employee(&db, &config, input, now).await?;

        let found = celebrations(&db, today).await?;
        assert_eq!(found.len(), 2);
        let birthday = found.iter().find(|c| c.kind == CelebrationKind::Birthday).unwrap();
        assert_eq!(birthday.years, 36);
        let work = found.iter().find(|c| c.kind == CelebrationKind::WorkAnniversary).unwrap();
        assert_eq!(work.years, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_celebration_wishes() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let celebrant = create_employee(&db, &config, "EMP130", date(2021, 10, 17), today).await?;
        let first = create_employee(&db, &config, "EMP131", date(2022, 1, 1), today).await?;
        let second = create_employee(&db, &config, "EMP132", date(2022, 1, 1), today).await?;

        let wish = |wisher_id: i32, message: &str| NewWish {
            wisher_id,
            celebrant_id: celebrant.id,
            message: message.to_string(),
            wish_type: CelebrationKind::WorkAnniversary,
        };
        send_celebration_wish(&db, wish(first.id, "Five years!"), today.and_hms_opt(9, 0, 0).unwrap()).await?;
        send_celebration_wish(&db, wish(second.id, " Congrats "), today.and_hms_opt(11, 0, 0).unwrap()).await?;

        let to_self = send_celebration_wish(&db, wish(celebrant.id, "Me"), today.and_hms_opt(12, 0, 0).unwrap()).await;
        assert!(matches!(to_self, Err(HrmsError::Validation { .. })));
        let blank = send_celebration_wish(&db, wish(first.id, "   "), today.and_hms_opt(12, 0, 0).unwrap()).await;
        assert!(matches!(blank, Err(HrmsError::Validation { .. })));

        let received = celebration_wishes(&db, celebrant.id, None).await?;
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].wisher_code, "EMP132");
        assert_eq!(received[0].wish.message, "Congrats");
        assert_eq!(received[1].wisher_code, "EMP131");
        assert!(celebration_wishes(&db, celebrant.id, Some(CelebrationKind::Birthday)).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_wishes_need_active_employees() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = hr(&db, &config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let celebrant = create_employee(&db, &config, "EMP133", date(2021, 10, 17), today).await?;
        let wisher = create_employee(&db, &config, "EMP134", date(2022, 1, 1), today).await?;
        update_employee(
            &db,
            &config,
            wisher.id,
            EmployeeUpdate {
                actor_id: hr.id,
                status: Some(EmployeeStatus::Inactive),
                ..Default::default()
            },
            now,
        )
        .await?;

        let result = send_celebration_wish(
            &db,
            NewWish {
                wisher_id: wisher.id,
                celebrant_id: celebrant.id,
                message: "Happy anniversary".to_string(),
                wish_type: CelebrationKind::WorkAnniversary,
            },
            now,
        )
        .await;
        assert!(matches!(result, Err(HrmsError::Validation { .. })));
        Ok(())
    }
}
