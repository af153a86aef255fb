//! Leave entity - one leave application.
//!
//! A request that only part of the balance can cover is stored as two rows:
//! a paid portion on the requested type and an unpaid portion on the Unpaid
//! type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl LeaveStatus {
    /// Lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }
}

/// Which half of the day a half-day leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum HalfDayPeriod {
    #[sea_orm(string_value = "first_half")]
    FirstHalf,
    #[sea_orm(string_value = "second_half")]
    SecondHalf,
}

/// Leave database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub days_requested: Decimal,
    pub reason: String,
    pub status: LeaveStatus,
    pub is_half_day: bool,
    pub half_day_period: Option<HalfDayPeriod>,
    /// Set on rows booked against the Unpaid type
    pub is_unpaid: bool,
    pub colour: String,
    pub applied_at: DateTime,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime>,
    pub rejection_reason: Option<String>,
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
