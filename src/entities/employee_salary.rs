//! Employee salary entity - a dated salary structure. Only one structure
//! per employee is active at a time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee salary database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee_salaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub effective_date: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub basic_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gross_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_salary: Decimal,
    pub is_active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_salary_component::Entity")]
    Components,
}

impl Related<super::employee_salary_component::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Components.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
