//! Designation entity - a job title, optionally scoped to a department.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Designation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "designations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Title, stored on `employees.designation`; unique per department
    pub title: String,
    #[sea_orm(unique)]
    pub code: String,
    pub department_id: Option<i32>,
    /// Seniority level, 1 being the most junior
    pub level: i32,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub min_salary: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub max_salary: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
