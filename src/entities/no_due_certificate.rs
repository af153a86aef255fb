//! No-due certificate and final settlement, at most one per resignation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How the final settlement is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// No-due certificate database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "no_due_certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub resignation_id: i32,
    /// `NDC{employee_code}{YYYYMMDD}`
    pub certificate_number: String,
    pub issue_date: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub pending_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub pending_bonus: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub final_settlement: Decimal,
    pub settlement_mode: Option<SettlementMode>,
    pub settlement_date: Option<Date>,
    pub is_completed: bool,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
