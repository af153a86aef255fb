//! Message category entity - the kind of notice issued to an employee
//! (Warning, Appreciation, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message_subtype::Entity")]
    MessageSubtype,
}

impl Related<super::message_subtype::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MessageSubtype.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
