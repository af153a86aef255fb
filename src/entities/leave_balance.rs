//! Leave balance entity - running totals per employee, leave type and year.
//!
//! `remaining = total - taken` is kept by the balance service; the table
//! itself only enforces uniqueness of (employee, leave type, year).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Leave balance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub year: i32,
    /// Days allocated for the year, including carry-forward
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub taken: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub remaining: Decimal,
    /// Days brought in from the previous year
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub carry_forward: Decimal,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::leave_type::Entity",
        from = "Column::LeaveTypeId",
        to = "super::leave_type::Column::Id"
    )]
    LeaveType,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::leave_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
