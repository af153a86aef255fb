//! Employees selected for a payroll run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payroll run selection database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_run_employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payroll_run_id: i32,
    pub employee_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_run::Entity",
        from = "Column::PayrollRunId",
        to = "super::payroll_run::Column::Id"
    )]
    PayrollRun,
}

impl Related<super::payroll_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
