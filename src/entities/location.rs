//! Location entity - an office region that owns state holidays and
//! location-specific attendance rules.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Location database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, matched against `employees.location` and `holidays.region`
    #[sea_orm(unique)]
    pub name: String,
    /// Short code (e.g. "BBSR")
    pub code: Option<String>,
    /// Inactive locations are hidden from pickers
    pub is_active: bool,
}

/// Locations are referenced by name, not by foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
