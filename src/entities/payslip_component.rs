//! A line on a payslip. Lines copied from the salary structure keep their
//! component id; the loss-of-pay line has none.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::salary_component::ComponentType;

/// Payslip component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslip_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payslip_id: i32,
    pub component_id: Option<i32>,
    pub name: String,
    pub component_type: ComponentType,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payslip::Entity",
        from = "Column::PayslipId",
        to = "super::payslip::Column::Id"
    )]
    Payslip,
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
