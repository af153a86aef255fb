//! One component line of an employee salary structure.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee salary component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_salary_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_salary_id: i32,
    pub component_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee_salary::Entity",
        from = "Column::EmployeeSalaryId",
        to = "super::employee_salary::Column::Id"
    )]
    EmployeeSalary,
}

impl Related<super::employee_salary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeSalary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
