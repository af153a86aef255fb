//! Warnings, appreciations and other notices issued to employees.

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{self, employee_notice};
use crate::error::{HrmsError, HrmsResult};

use super::masters;

/// A notice to issue.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotice {
    pub actor_id: i32,
    pub employee_id: i32,
    /// Name of an active message category.
    pub category: String,
    /// Name of an active sub-type of that category.
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Defaults to the issue date.
    #[serde(default)]
    pub notice_date: Option<NaiveDate>,
    pub subject: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeFilter {
    #[serde(default)]
    pub employee_id: Option<i32>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Tally of the listed notices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoticeCounts {
    pub warnings: usize,
    pub appreciations: usize,
    pub others: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeList {
    pub notices: Vec<employee_notice::Model>,
    pub counts: NoticeCounts,
}

/// Issues a notice on behalf of HR.
pub async fn issue_notice<C: ConnectionTrait>(
    db: &C,
    input: NewNotice,
    now: NaiveDateTime,
) -> HrmsResult<employee_notice::Model> {
    let actor = super::require_hr(db, input.actor_id).await?;
    let employee = super::find_employee(db, input.employee_id).await?;
    let subject = input.subject.trim();
    if subject.is_empty() {
        return Err(HrmsError::validation("subject", "is required"));
    }
    let description = input.description.trim();
    if description.is_empty() {
        return Err(HrmsError::validation("description", "is required"));
    }

    let category = masters::active_category(db, &input.category).await?;
    let sub_type = match input.sub_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => Some(masters::active_subtype(db, &category, name).await?.name),
        None => None,
    };

    let notice = employee_notice::ActiveModel {
        employee_id: Set(employee.id),
        category: Set(category.name),
        sub_type: Set(sub_type),
        notice_date: Set(input.notice_date.unwrap_or(now.date())),
        subject: Set(subject.to_string()),
        description: Set(description.to_string()),
        issued_by: Set(actor.id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(
        notice_id = notice.id,
        employee_code = %employee.employee_code,
        category = %notice.category,
        issued_by = %actor.employee_code,
        "Notice issued"
    );
    Ok(notice)
}

fn count(notices: &[employee_notice::Model]) -> NoticeCounts {
    let mut counts = NoticeCounts {
        total: notices.len(),
        ..Default::default()
    };
    for notice in notices {
        match notice.category.to_lowercase().as_str() {
            "warning" => counts.warnings += 1,
            "appreciation" => counts.appreciations += 1,
            _ => counts.others += 1,
        }
    }
    counts
}

/// Notices newest first, with counts per kind.
pub async fn list_notices<C: ConnectionTrait>(db: &C, filter: &NoticeFilter) -> HrmsResult<NoticeList> {
    let mut query = entities::EmployeeNotice::find();
    if let Some(employee_id) = filter.employee_id {
        query = query.filter(employee_notice::Column::EmployeeId.eq(employee_id));
    }
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(employee_notice::Column::Category.eq(category));
    }
    let notices = query
        .order_by_desc(employee_notice::Column::NoticeDate)
        .order_by_desc(employee_notice::Column::Id)
        .all(db)
        .await?;
    let counts = count(&notices);
    Ok(NoticeList { notices, counts })
}

pub async fn delete_notice<C: ConnectionTrait>(db: &C, id: i32, actor_id: i32) -> HrmsResult<()> {
    super::require_hr(db, actor_id).await?;
    let notice = entities::EmployeeNotice::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Notice", id))?;
    entities::EmployeeNotice::delete_by_id(notice.id).exec(db).await?;
    info!(notice_id = id, employee_id = notice.employee_id, "Notice deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EmployeeRole;
    use crate::services::masters::{create_message_subtype, NewMessageSubtype};
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    fn notice(actor_id: i32, employee_id: i32, category: &str, day: u32) -> NewNotice {
        NewNotice {
            actor_id,
            employee_id,
            category: category.to_string(),
            sub_type: None,
            notice_date: Some(date(2026, 10, day)),
            subject: format!("{} notice", category),
            description: "Details on file".to_string(),
        }
    }

    #[tokio::test]
    async fn test_notices_are_counted_by_kind() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), today, EmployeeRole::Hr, None, None).await?;
        let employee = create_employee(&db, &config, "EMP700", date(2022, 1, 1), today).await?;
        let other = create_employee(&db, &config, "EMP701", date(2022, 1, 1), today).await?;

        issue_notice(&db, notice(hr.id, employee.id, "Warning", 2), now).await?;
        issue_notice(&db, notice(hr.id, employee.id, "Appreciation", 9), now).await?;
        issue_notice(&db, notice(hr.id, employee.id, "Warning", 12), now).await?;
        issue_notice(&db, notice(hr.id, employee.id, "Notice", 15), now).await?;
        issue_notice(&db, notice(hr.id, other.id, "Warning", 16), now).await?;

        let listed = list_notices(
            &db,
            &NoticeFilter {
                employee_id: Some(employee.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(
            listed.counts,
            NoticeCounts {
                warnings: 2,
                appreciations: 1,
                others: 1,
                total: 4,
            }
        );
        assert_eq!(listed.notices[0].notice_date, date(2026, 10, 15));
        assert_eq!(listed.notices[0].issued_by, hr.id);

        let warnings = list_notices(
            &db,
            &NoticeFilter {
                category: Some("Warning".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(warnings.counts.total, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_notice_needs_known_category_and_subtype() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), today, EmployeeRole::Hr, None, None).await?;
        let employee = create_employee(&db, &config, "EMP702", date(2022, 1, 1), today).await?;

        let unknown = issue_notice(&db, notice(hr.id, employee.id, "Memo", 10), now).await;
        assert!(matches!(unknown, Err(HrmsError::Validation { .. })));

        let warning = masters::active_category(&db, "Warning").await?;
        create_message_subtype(
            &db,
            NewMessageSubtype {
                actor_id: hr.id,
                category_id: warning.id,
                name: "Late Coming".to_string(),
            },
        )
        .await?;

        let mut praise = notice(hr.id, employee.id, "Appreciation", 10);
        praise.sub_type = Some("Late Coming".to_string());
        let mismatched = issue_notice(&db, praise, now).await;
        assert!(matches!(mismatched, Err(HrmsError::Validation { .. })));

        let mut late = notice(hr.id, employee.id, "Warning", 10);
        late.sub_type = Some("Late Coming".to_string());
        let issued = issue_notice(&db, late, now).await?;
        assert_eq!(issued.sub_type.as_deref(), Some("Late Coming"));
        Ok(())
    }

    #[tokio::test]
    async fn test_notices_are_issued_and_removed_by_hr() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let today = date(2026, 10, 17);
        let now = today.and_hms_opt(10, 0, 0).unwrap();
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), today, EmployeeRole::Hr, None, None).await?;
        let employee = create_employee(&db, &config, "EMP703", date(2022, 1, 1), today).await?;
        let peer = create_employee(&db, &config, "EMP704", date(2022, 1, 1), today).await?;

        let denied = issue_notice(&db, notice(peer.id, employee.id, "Warning", 10), now).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));

        let issued = issue_notice(&db, notice(hr.id, employee.id, "Warning", 10), now).await?;
        let denied = delete_notice(&db, issued.id, peer.id).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));
        delete_notice(&db, issued.id, hr.id).await?;
        assert_eq!(list_notices(&db, &NoticeFilter::default()).await?.counts.total, 0);
        Ok(())
    }
}
