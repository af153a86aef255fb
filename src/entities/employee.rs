//! Employee entity - the personnel record every other table hangs off.
//!
//! Probation and notice dates are stored denormalized; the service layer
//! recomputes them whenever joining date, probation days or resignation
//! date change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee role, used for approval rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Regular staff member.
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Line manager.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Human resources.
    #[sea_orm(string_value = "hr")]
    Hr,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Super administrator.
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl EmployeeRole {
    /// Whether the role may approve any employee's requests.
    pub fn is_hr_or_admin(self) -> bool {
        matches!(self, Self::Hr | Self::Admin | Self::SuperAdmin)
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed.
    #[sea_orm(string_value = "active")]
    Active,
    /// Left or suspended.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Employee database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Organization-assigned employee code (e.g. "EMP001")
    #[sea_orm(unique)]
    pub employee_code: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<Date>,
    pub marriage_date: Option<Date>,
    pub department: Option<String>,
    pub designation: Option<String>,
    /// Location name; drives state holidays and Saturday hours
    pub location: Option<String>,
    pub role: EmployeeRole,
    pub date_of_joining: Date,
    pub worker_type: Option<String>,
    /// Employee code of the reporting manager
    pub reporting_manager: Option<String>,
    pub status: EmployeeStatus,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub uan_number: Option<String>,
    pub esi_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub basic_salary: Option<Decimal>,
    pub probation_period_days: i32,
    pub probation_end_date: Date,
    pub notice_period_days: i32,
    pub resignation_date: Option<Date>,
    pub notice_period_start: Option<Date>,
    pub notice_period_end: Option<Date>,
    pub created_at: DateTime,
}

impl Model {
    /// First, middle and last name joined with single spaces.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Whether the employee is currently employed.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many leave applications
    #[sea_orm(has_many = "super::leave::Entity")]
    Leaves,
    /// One employee has a balance per leave type per year
    #[sea_orm(has_many = "super::leave_balance::Entity")]
    LeaveBalances,
    /// One attendance row per working day
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::leave::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leaves.def()
    }
}

impl Related<super::leave_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveBalances.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
