//! Exit checklist item attached to a resignation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Checklist item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resignation_checklist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub resignation_id: i32,
    pub task: String,
    /// Owning department (HR, IT, Finance, ...)
    pub department: String,
    pub due_date: Date,
    pub is_completed: bool,
    pub completed_on: Option<Date>,
    pub remarks: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::resignation::Entity",
        from = "Column::ResignationId",
        to = "super::resignation::Column::Id"
    )]
    Resignation,
}

impl Related<super::resignation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resignation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
