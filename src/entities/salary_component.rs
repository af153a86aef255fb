//! Salary component entity - the catalogue of earnings and deductions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    #[sea_orm(string_value = "earning")]
    Earning,
    #[sea_orm(string_value = "deduction")]
    Deduction,
}

/// How a component's default amount is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// `value` is the amount.
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// `value` percent of basic salary.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Entered manually per employee.
    #[sea_orm(string_value = "formula")]
    Formula,
}

/// Salary component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "salary_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub component_type: ComponentType,
    pub calculation_type: CalculationType,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub value: Decimal,
    /// Base the percentage applies to (only "basic" is recognised)
    pub percentage_of: Option<String>,
    pub is_taxable: bool,
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
