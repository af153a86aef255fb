//! Leave type entity - the catalogue of leave categories.
//!
//! Each type carries a `kind` so the engine can find the Earned, Optional,
//! Unpaid and Comp-off types without matching on display names.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The rule family a leave type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    /// Accrues monthly after probation and carries forward at year end.
    #[sea_orm(string_value = "earned")]
    Earned,
    /// Taken on optional holidays, capped per year.
    #[sea_orm(string_value = "optional")]
    Optional,
    /// Overflow type for days not covered by a balance.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Earned by working on a holiday.
    #[sea_orm(string_value = "comp_off")]
    CompOff,
    /// Fixed annual sick allocation, reset at year end.
    #[sea_orm(string_value = "sick")]
    Sick,
    /// Fixed annual casual allocation.
    #[sea_orm(string_value = "casual")]
    Casual,
    /// Any other HR-defined type.
    #[sea_orm(string_value = "other")]
    Other,
}

impl LeaveKind {
    /// Label used in messages and audit output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Earned => "Earned",
            Self::Optional => "Optional",
            Self::Unpaid => "Unpaid",
            Self::CompOff => "Comp-off",
            Self::Sick => "Sick",
            Self::Casual => "Casual",
            Self::Other => "Other",
        }
    }
}

/// Leave type database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub kind: LeaveKind,
    /// Maximum days a single application may span
    pub max_days: i32,
    /// Days granted when a balance is first created for the year
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub annual_allocation: Decimal,
    /// Days added per month by the accrual job
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub accrual_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub max_carry_forward: Decimal,
    pub is_optional: bool,
    pub can_use_same_month: bool,
    /// Calendar colour (hex)
    pub colour: String,
    pub remark: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leave::Entity")]
    Leaves,
    #[sea_orm(has_many = "super::leave_balance::Entity")]
    LeaveBalances,
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

impl ActiveModelBehavior for ActiveModel {}
