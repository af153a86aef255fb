//! Database connection, schema creation and seeding.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`; composite unique keys the entities
//! cannot express are added as indexes afterwards.

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Schema, Set,
};
use tracing::info;

use crate::config::ConfigLoader;
use crate::entities::{self, holiday, leave_type, message_category};
use crate::error::HrmsResult;

/// Default database when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://hrms.sqlite?mode=rwc";

/// Reads `DATABASE_URL`, falling back to a local SQLite file.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects, creates missing tables and seeds the catalogue.
pub async fn setup(url: &str, config: &ConfigLoader) -> HrmsResult<DatabaseConnection> {
    let db = Database::connect(url).await?;
    create_tables(&db).await?;
    seed(&db, config).await?;
    Ok(db)
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> HrmsResult<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

async fn create_index(db: &DatabaseConnection, stmt: IndexCreateStatement) -> HrmsResult<()> {
    let backend = db.get_database_backend();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Creates every table and unique index that does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> HrmsResult<()> {
    create_table(db, entities::Location).await?;
    create_table(db, entities::Employee).await?;
    create_table(db, entities::Department).await?;
    create_table(db, entities::Designation).await?;
    create_table(db, entities::MessageCategory).await?;
    create_table(db, entities::MessageSubtype).await?;
    create_table(db, entities::EmployeeNotice).await?;
    create_table(db, entities::CelebrationWish).await?;
    create_table(db, entities::LeaveType).await?;
    create_table(db, entities::Holiday).await?;
    create_table(db, entities::Leave).await?;
    create_table(db, entities::LeaveBalance).await?;
    create_table(db, entities::CompOffGrant).await?;
    create_table(db, entities::SystemState).await?;
    create_table(db, entities::Attendance).await?;
    create_table(db, entities::SalaryComponent).await?;
    create_table(db, entities::EmployeeSalary).await?;
    create_table(db, entities::EmployeeSalaryComponent).await?;
    create_table(db, entities::PayrollRun).await?;
    create_table(db, entities::PayrollRunEmployee).await?;
    create_table(db, entities::Payslip).await?;
    create_table(db, entities::PayslipComponent).await?;
    create_table(db, entities::Resignation).await?;
    create_table(db, entities::ResignationChecklist).await?;
    create_table(db, entities::ExitInterview).await?;
    create_table(db, entities::NoDueCertificate).await?;

    create_index(
        db,
        Index::create()
            .name("ux_leave_balances_employee_type_year")
            .table(entities::LeaveBalance)
            .col(entities::leave_balance::Column::EmployeeId)
            .col(entities::leave_balance::Column::LeaveTypeId)
            .col(entities::leave_balance::Column::Year)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    create_index(
        db,
        Index::create()
            .name("ux_attendance_employee_date")
            .table(entities::Attendance)
            .col(entities::attendance::Column::EmployeeId)
            .col(entities::attendance::Column::Date)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    create_index(
        db,
        Index::create()
            .name("ux_holidays_name_date_region")
            .table(entities::Holiday)
            .col(holiday::Column::Name)
            .col(holiday::Column::Date)
            .col(holiday::Column::Region)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    create_index(
        db,
        Index::create()
            .name("ux_payroll_runs_name_period")
            .table(entities::PayrollRun)
            .col(entities::payroll_run::Column::Name)
            .col(entities::payroll_run::Column::Year)
            .col(entities::payroll_run::Column::Month)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("ux_designations_title_department")
            .table(entities::Designation)
            .col(entities::designation::Column::Title)
            .col(entities::designation::Column::DepartmentId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;
    create_index(
        db,
        Index::create()
            .name("ux_message_subtypes_category_name")
            .table(entities::MessageSubtype)
            .col(entities::message_subtype::Column::CategoryId)
            .col(entities::message_subtype::Column::Name)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    create_index(
        db,
        Index::create()
            .name("ux_payroll_run_employees_run_employee")
            .table(entities::PayrollRunEmployee)
            .col(entities::payroll_run_employee::Column::PayrollRunId)
            .col(entities::payroll_run_employee::Column::EmployeeId)
            .unique()
            .if_not_exists()
            .to_owned(),
    )
    .await?;

    Ok(())
}

/// Counts of seeded rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    /// Leave types inserted.
    pub leave_types: usize,
    /// Holidays inserted.
    pub holidays: usize,
    /// Message categories inserted.
    pub message_categories: usize,
}

/// Inserts configured leave types and holidays that are not present yet.
pub async fn seed<C: ConnectionTrait>(db: &C, config: &ConfigLoader) -> HrmsResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in &config.leave_policy().leave_types {
        let exists = entities::LeaveType::find()
            .filter(leave_type::Column::Name.eq(seed.name.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        leave_type::ActiveModel {
            name: Set(seed.name.clone()),
            kind: Set(seed.kind),
            max_days: Set(seed.max_days),
            annual_allocation: Set(seed.annual_allocation),
            accrual_rate: Set(seed.accrual_rate),
            max_carry_forward: Set(seed.max_carry_forward),
            is_optional: Set(seed.kind == entities::LeaveKind::Optional),
            can_use_same_month: Set(seed.can_use_same_month),
            colour: Set(seed.colour.clone()),
            remark: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.leave_types += 1;
    }

    for calendar in config.config().holidays() {
        for seed in &calendar.holidays {
            let mut query = entities::Holiday::find()
                .filter(holiday::Column::Name.eq(seed.name.as_str()))
                .filter(holiday::Column::Date.eq(seed.date));
            query = match &seed.region {
                Some(region) => query.filter(holiday::Column::Region.eq(region.as_str())),
                None => query.filter(holiday::Column::Region.is_null()),
            };
            if query.one(db).await?.is_some() {
                continue;
            }
            let is_optional = seed.holiday_type == entities::HolidayType::Optional;
            holiday::ActiveModel {
                name: Set(seed.name.clone()),
                holiday_type: Set(seed.holiday_type),
                date: Set(seed.date),
                region: Set(seed.region.clone()),
                colour: Set(if is_optional { "#f9a825" } else { "#c62828" }.to_string()),
                description: Set(seed.description.clone()),
                is_optional: Set(is_optional),
                ..Default::default()
            }
            .insert(db)
            .await?;
            summary.holidays += 1;
        }
    }

    for name in &config.organization().message_categories {
        let exists = entities::MessageCategory::find()
            .filter(message_category::Column::Name.eq(name.as_str()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        message_category::ActiveModel {
            name: Set(name.clone()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await?;
        summary.message_categories += 1;
    }

    info!(
        leave_types = summary.leave_types,
        holidays = summary.holidays,
        message_categories = summary.message_categories,
        "Seeded catalogue"
    );
    Ok(summary)
}
