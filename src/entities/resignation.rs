//! Resignation entity - an employee's resignation and its exit workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resignation workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ResignationStatus {
    #[sea_orm(string_value = "applied")]
    Applied,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ResignationStatus {
    /// Statuses that block a new submission.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Applied | Self::UnderReview | Self::Accepted)
    }

    /// Lowercase name used in messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::UnderReview => "under_review",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
            Self::Completed => "completed",
        }
    }
}

/// How the employee leaves once accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    #[sea_orm(string_value = "serving_notice")]
    ServingNotice,
    #[sea_orm(string_value = "notice_completed")]
    NoticeCompleted,
    #[sea_orm(string_value = "immediate")]
    Immediate,
    #[sea_orm(string_value = "buyout")]
    Buyout,
}

/// Resignation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resignations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub resignation_date: Date,
    pub last_working_date: Date,
    pub reason: String,
    pub status: ResignationStatus,
    pub exit_status: Option<ExitStatus>,
    /// Employee id of the manager or HR person it was routed to
    pub applied_to: Option<i32>,
    pub applied_at: DateTime,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime>,
    pub feedback: Option<String>,
    pub withdrawal_reason: Option<String>,
    pub withdrawn_at: Option<DateTime>,
    pub completed_at: Option<DateTime>,
    /// 1 for the first submission, incremented on re-application
    pub resignation_count: i32,
    pub previous_resignation_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(has_many = "super::resignation_checklist::Entity")]
    Checklist,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::resignation_checklist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checklist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
