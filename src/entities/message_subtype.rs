//! Message sub-type entity - a finer reason within a message category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message sub-type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message_subtypes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    /// Unique within the category
    pub name: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::message_category::Entity",
        from = "Column::CategoryId",
        to = "super::message_category::Column::Id"
    )]
    MessageCategory,
}

impl Related<super::message_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MessageCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
