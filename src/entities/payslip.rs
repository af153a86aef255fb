//! Payslip entity - one employee's pay for one payroll run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payslip lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    #[sea_orm(string_value = "generated")]
    Generated,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Payslip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payroll_run_id: i32,
    pub employee_id: i32,
    /// `PS{YYYY}{MM}{employee_code}_{run_id}`
    #[sea_orm(unique)]
    pub payslip_number: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub basic_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gross_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_salary: Decimal,
    pub working_days: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub paid_days: Decimal,
    /// Approved unpaid leave days in the month
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub lop_days: Decimal,
    pub status: PayslipStatus,
    pub generated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_run::Entity",
        from = "Column::PayrollRunId",
        to = "super::payroll_run::Column::Id"
    )]
    PayrollRun,
    #[sea_orm(has_many = "super::payslip_component::Entity")]
    Components,
}

impl Related<super::payroll_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRun.def()
    }
}

impl Related<super::payslip_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
