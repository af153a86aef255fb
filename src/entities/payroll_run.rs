//! Payroll run entity - a monthly batch that generates payslips for the
//! employees selected when the run was created.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payroll run database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_runs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub year: i32,
    /// 1-12
    pub month: i32,
    pub status: PayrollStatus,
    pub total_employees: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_amount: Decimal,
    pub processed_by: Option<i32>,
    pub processed_at: Option<DateTime>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslips,
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
