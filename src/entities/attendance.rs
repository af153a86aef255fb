//! Attendance entity - one row per employee per local calendar day.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub date: Date,
    /// Office-local timestamp
    pub check_in: DateTime,
    pub check_out: Option<DateTime>,
    /// Reverse-geocoded address captured by the client
    pub check_in_address: Option<String>,
    pub check_out_address: Option<String>,
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
