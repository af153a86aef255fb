//! System state entity - key/value pairs recording which batch jobs have
//! already run (e.g. `monthly_accrual:2026-03`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Job key
    #[sea_orm(unique)]
    pub key: String,
    /// Short summary of the run
    pub value: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
