//! Database-backed operations.
//!
//! Each service reads rows through sea-orm, applies the pure
//! [`rules`](crate::rules), and writes the result back. Operations that
//! touch several rows take a [`DatabaseConnection`](sea_orm::DatabaseConnection)
//! and run inside one transaction; helpers that take a generic
//! [`ConnectionTrait`] can be composed inside that transaction.

pub mod attendance;
pub mod balances;
pub mod catalog;
pub mod employees;
pub mod leave_jobs;
pub mod leaves;
pub mod masters;
pub mod notices;
pub mod payroll;
pub mod resignations;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{self, employee, leave_type, LeaveKind};
use crate::error::{HrmsError, HrmsResult};

/// Fetches an employee by id.
pub async fn find_employee<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<employee::Model> {
    entities::Employee::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Employee", id))
}

/// Fetches the active leave type of a kind.
///
/// When several active types share a kind the oldest one wins.
pub async fn leave_type_by_kind<C: ConnectionTrait>(
    db: &C,
    kind: LeaveKind,
) -> HrmsResult<leave_type::Model> {
    entities::LeaveType::find()
        .filter(leave_type::Column::Kind.eq(kind))
        .filter(leave_type::Column::IsActive.eq(true))
        .order_by_asc(leave_type::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave type", kind.label()))
}

/// Fetches the acting employee and requires an HR, admin or super admin role.
pub async fn require_hr<C: ConnectionTrait>(db: &C, actor_id: i32) -> HrmsResult<employee::Model> {
    let actor = find_employee(db, actor_id).await?;
    if actor.role.is_hr_or_admin() {
        Ok(actor)
    } else {
        Err(HrmsError::forbidden(format!(
            "{} is not an HR administrator",
            actor.employee_code
        )))
    }
}

/// Whether `actor` may decide requests raised by `employee`.
///
/// HR roles may act for anyone; managers only for their direct reports.
pub fn can_manage(actor: &employee::Model, employee: &employee::Model) -> bool {
    actor.role.is_hr_or_admin()
        || employee.reporting_manager.as_deref() == Some(actor.employee_code.as_str())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use sea_orm::{Database, DatabaseConnection};

    use crate::config::ConfigLoader;
    use crate::entities::{employee, EmployeeRole};
    use crate::error::HrmsResult;

    use super::employees::{self, NewEmployee};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn config() -> ConfigLoader {
        ConfigLoader::load("./config/default").unwrap()
    }

    /// In-memory database with every table and the seeded catalogue.
    pub async fn setup_test_db(config: &ConfigLoader) -> HrmsResult<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await?;
        crate::db::create_tables(&db).await?;
        crate::db::seed(&db, config).await?;
        Ok(db)
    }

    /// Inserts an employee through the service so balances are initialized.
    ///
    /// Skips the onboarding role check; fixtures stand in for HR.
    pub async fn create_employee(
        db: &DatabaseConnection,
        config: &ConfigLoader,
        code: &str,
        joined: NaiveDate,
        today: NaiveDate,
    ) -> HrmsResult<employee::Model> {
        let input = NewEmployee::new(
            code,
            "Test",
            code,
            &format!("{}@example.com", code.to_lowercase()),
            joined,
        );
        let created = employees::insert_employee(
            db,
            config,
            input,
            today.and_hms_opt(10, 0, 0).unwrap(),
        )
        .await?;
        Ok(created.employee)
    }

    /// Creates an employee with a role, located in `location`.
    pub async fn create_employee_with(
        db: &DatabaseConnection,
        config: &ConfigLoader,
        code: &str,
        joined: NaiveDate,
        today: NaiveDate,
        role: EmployeeRole,
        location: Option<&str>,
        manager: Option<&str>,
    ) -> HrmsResult<employee::Model> {
        let mut input = NewEmployee::new(
            code,
            "Test",
            code,
            &format!("{}@example.com", code.to_lowercase()),
            joined,
        );
        input.role = Some(role);
        input.location = location.map(str::to_string);
        input.reporting_manager = manager.map(str::to_string);
        let created = employees::insert_employee(
            db,
            config,
            input,
            today.and_hms_opt(10, 0, 0).unwrap(),
        )
        .await?;
        Ok(created.employee)
    }
}
