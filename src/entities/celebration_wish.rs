//! Celebration wish entity - a message one employee sends another on a
//! birthday or anniversary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why an employee is celebrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    #[sea_orm(string_value = "birthday")]
    Birthday,
    #[sea_orm(string_value = "work_anniversary")]
    WorkAnniversary,
    #[sea_orm(string_value = "marriage_anniversary")]
    MarriageAnniversary,
}

/// Celebration wish database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "celebration_wishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub celebrant_id: i32,
    pub wisher_id: i32,
    pub message: String,
    pub wish_type: CelebrationKind,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::CelebrantId",
        to = "super::employee::Column::Id"
    )]
    Celebrant,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Celebrant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
