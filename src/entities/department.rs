//! Department entity - an organisational unit employees and designations
//! belong to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Department database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, stored on `employees.department`
    #[sea_orm(unique)]
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    /// Employee heading the department
    pub head_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::designation::Entity")]
    Designation,
}

impl Related<super::designation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Designation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
