//! Exit interview answers, at most one per resignation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Exit interview database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exit_interviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub resignation_id: i32,
    pub interview_date: Option<Date>,
    pub reason_for_leaving: Option<String>,
    /// 1-5
    pub job_satisfaction: Option<i32>,
    pub work_environment: Option<String>,
    pub management_feedback: Option<String>,
    pub suggestions: Option<String>,
    pub would_rejoin: Option<bool>,
    pub is_completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
