//! Employee notice entity - a warning, appreciation or other formal
//! message issued to an employee.
//!
//! Category and sub-type are stored by name so a notice keeps its wording
//! after the masters change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee notice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_notices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub category: String,
    pub sub_type: Option<String>,
    pub notice_date: Date,
    pub subject: String,
    pub description: String,
    /// HR administrator who issued it
    pub issued_by: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
