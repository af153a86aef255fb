//! Daily check-in/check-out and attendance views.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AttendancePolicy;
use crate::entities::{self, attendance, employee};
use crate::error::{HrmsError, HrmsResult};
use crate::rules::{summarize_day, DayStatus, DaySummary};

use super::{catalog, employees};

/// Report rows per page.
pub const PAGE_SIZE: usize = 20;

async fn record_on<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    date: NaiveDate,
) -> HrmsResult<Option<attendance::Model>> {
    Ok(entities::Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Date.eq(date))
        .one(db)
        .await?)
}

fn clean_address(address: Option<String>) -> Option<String> {
    address.map(|a| a.trim().to_string()).filter(|a| !a.is_empty())
}

/// Records the first check-in of the day.
///
/// # Errors
///
/// `Duplicate` when the employee already checked in on `now`'s date.
pub async fn check_in<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    address: Option<String>,
    now: NaiveDateTime,
) -> HrmsResult<attendance::Model> {
    let employee = super::find_employee(db, employee_id).await?;
    if !employee.is_active() {
        return Err(HrmsError::validation("employee_id", "employee is not active"));
    }
    let today = now.date();
    if record_on(db, employee_id, today).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Check-in".to_string(),
            key: today.to_string(),
        });
    }

    let record = attendance::ActiveModel {
        employee_id: Set(employee_id),
        date: Set(today),
        check_in: Set(now),
        check_out: Set(None),
        check_in_address: Set(clean_address(address)),
        check_out_address: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(employee_id, date = %today, time = %now.time(), "Checked in");
    Ok(record)
}

/// Closes today's attendance record.
pub async fn check_out<C: ConnectionTrait>(
    db: &C,
    employee_id: i32,
    address: Option<String>,
    now: NaiveDateTime,
) -> HrmsResult<attendance::Model> {
    let today = now.date();
    let record = record_on(db, employee_id, today)
        .await?
        .ok_or_else(|| HrmsError::validation("check_out", "no check-in recorded today"))?;
    if record.check_out.is_some() {
        return Err(HrmsError::validation("check_out", "already checked out today"));
    }

    let mut active: attendance::ActiveModel = record.into();
    active.check_out = Set(Some(now));
    active.check_out_address = Set(clean_address(address));
    let record = active.update(db).await?;

    info!(employee_id, date = %today, time = %now.time(), "Checked out");
    Ok(record)
}

fn summarize(
    date: NaiveDate,
    record: Option<&attendance::Model>,
    now: NaiveDateTime,
    location: Option<&str>,
    policy: &AttendancePolicy,
) -> DaySummary {
    summarize_day(
        date,
        record.map(|r| r.check_in),
        record.and_then(|r| r.check_out),
        now,
        location,
        policy,
    )
}

/// One day of an employee's attendance.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceDay {
    pub record: Option<attendance::Model>,
    pub summary: DaySummary,
    /// Sunday.
    pub weekly_off: bool,
    /// Mandatory holiday name, if the office is closed.
    pub holiday: Option<String>,
}

/// Today's attendance for an employee.
pub async fn today<C: ConnectionTrait>(
    db: &C,
    policy: &AttendancePolicy,
    employee_id: i32,
    now: NaiveDateTime,
) -> HrmsResult<AttendanceDay> {
    let employee = super::find_employee(db, employee_id).await?;
    let date = now.date();
    let record = record_on(db, employee_id, date).await?;
    let location = employee.location.as_deref();
    let holiday = catalog::mandatory_holidays(db, date, date, location)
        .await?
        .into_iter()
        .next()
        .map(|h| h.name);
    Ok(AttendanceDay {
        summary: summarize(date, record.as_ref(), now, location, policy),
        record,
        weekly_off: date.weekday() == Weekday::Sun,
        holiday,
    })
}

/// Attendance for one employee and month, up to today.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAttendance {
    pub employee_id: i32,
    pub year: i32,
    pub month: u32,
    pub days: Vec<AttendanceDay>,
    pub present: u32,
    pub half_days: u32,
    pub lop_days: u32,
    /// Working days without a check-in.
    pub absent: u32,
    pub total_worked_minutes: i64,
}

/// Builds the monthly view of an employee's attendance.
///
/// Days after today are left out. Sundays and mandatory holidays without
/// a check-in are not counted as absences.
pub async fn monthly<C: ConnectionTrait>(
    db: &C,
    policy: &AttendancePolicy,
    employee_id: i32,
    year: i32,
    month: u32,
    now: NaiveDateTime,
) -> HrmsResult<MonthlyAttendance> {
    let employee = super::find_employee(db, employee_id).await?;
    let location = employee.location.as_deref();
    let (start, month_end) = catalog::month_bounds(year, month)?;
    let end = month_end.min(now.date());

    let records: HashMap<NaiveDate, attendance::Model> = entities::Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::Date.gte(start))
        .filter(attendance::Column::Date.lte(month_end))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.date, r))
        .collect();
    let holidays: HashMap<NaiveDate, String> =
        catalog::mandatory_holidays(db, start, month_end, location)
            .await?
            .into_iter()
            .map(|h| (h.date, h.name))
            .collect();

    let mut view = MonthlyAttendance {
        employee_id,
        year,
        month,
        days: Vec::new(),
        present: 0,
        half_days: 0,
        lop_days: 0,
        absent: 0,
        total_worked_minutes: 0,
    };

    let mut date = start;
    while date <= end {
        let record = records.get(&date).cloned();
        let summary = summarize(date, record.as_ref(), now, location, policy);
        let weekly_off = date.weekday() == Weekday::Sun;
        let holiday = holidays.get(&date).cloned();
        match summary.status {
            DayStatus::Present => view.present += 1,
            DayStatus::HalfDay => view.half_days += 1,
            DayStatus::Lop => view.lop_days += 1,
            DayStatus::Absent if !weekly_off && holiday.is_none() && date < now.date() => {
                view.absent += 1
            }
            _ => {}
        }
        view.total_worked_minutes += summary.worked_minutes.unwrap_or(0);
        view.days.push(AttendanceDay {
            record,
            summary,
            weekly_off,
            holiday,
        });
        date += Duration::days(1);
    }
    Ok(view)
}

/// Filters for the attendance report.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<DayStatus>,
    #[serde(default)]
    pub page: Option<usize>,
}

/// One attendance record with its employee and derived figures.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub employee_code: String,
    pub employee_name: String,
    pub location: Option<String>,
    pub record: attendance::Model,
    pub summary: DaySummary,
}

/// One page of the attendance report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub items: Vec<ReportRow>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Attendance records across employees in a date range, newest first.
///
/// The status filter applies to the derived day status, so it is
/// evaluated after the rows are summarized.
pub async fn report<C: ConnectionTrait>(
    db: &C,
    policy: &AttendancePolicy,
    filter: &ReportFilter,
    now: NaiveDateTime,
) -> HrmsResult<ReportPage> {
    if filter.from > filter.to {
        return Err(HrmsError::validation("to", "must not be before from"));
    }

    let people: HashMap<i32, employee::Model> = employees::list_employees(
        db,
        &employees::EmployeeFilter {
            status: None,
            department: None,
            location: filter.location.clone(),
            search: filter.search.clone(),
        },
    )
    .await?
    .into_iter()
    .map(|e| (e.id, e))
    .collect();

    let records = entities::Attendance::find()
        .filter(attendance::Column::Date.gte(filter.from))
        .filter(attendance::Column::Date.lte(filter.to))
        .filter(attendance::Column::EmployeeId.is_in(people.keys().copied().collect::<Vec<_>>()))
        .order_by_desc(attendance::Column::Date)
        .order_by_desc(attendance::Column::CheckIn)
        .all(db)
        .await?;

    let rows: Vec<ReportRow> = records
        .into_iter()
        .filter_map(|record| {
            let person = people.get(&record.employee_id)?;
            let summary = summarize(
                record.date,
                Some(&record),
                now,
                person.location.as_deref(),
                policy,
            );
            Some(ReportRow {
                employee_code: person.employee_code.clone(),
                employee_name: person.full_name(),
                location: person.location.clone(),
                record,
                summary,
            })
        })
        .filter(|row| filter.status.is_none_or(|s| row.summary.status == s))
        .collect();

    let total = rows.len();
    let total_pages = total.div_ceil(PAGE_SIZE);
    let page = filter.page.unwrap_or(1).max(1);
    let items = rows
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Ok(ReportPage {
        items,
        page,
        page_size: PAGE_SIZE,
        total,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EmployeeRole;
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_check_in_once_per_day() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let day = date(2026, 10, 19);
        let emp = create_employee(&db, &config, "EMP400", date(2024, 1, 1), day).await?;

        let record = check_in(&db, emp.id, Some(" Office ".to_string()), at(day, 9, 20)).await?;
        assert_eq!(record.date, day);
        assert_eq!(record.check_in_address.as_deref(), Some("Office"));

        let again = check_in(&db, emp.id, None, at(day, 9, 40)).await;
        assert!(matches!(again, Err(HrmsError::Duplicate { .. })));

        // Next day is a new record.
        check_in(&db, emp.id, None, at(date(2026, 10, 21), 9, 0)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_check_out_requires_open_record() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let day = date(2026, 10, 19);
        let emp = create_employee(&db, &config, "EMP401", date(2024, 1, 1), day).await?;

        let early = check_out(&db, emp.id, None, at(day, 18, 0)).await;
        assert!(matches!(early, Err(HrmsError::Validation { .. })));

        check_in(&db, emp.id, None, at(day, 9, 0)).await?;
        let closed = check_out(&db, emp.id, None, at(day, 18, 30)).await?;
        assert_eq!(closed.check_out, Some(at(day, 18, 30)));

        let twice = check_out(&db, emp.id, None, at(day, 19, 0)).await;
        assert!(matches!(twice, Err(HrmsError::Validation { .. })));

        let view = today(&db, config.attendance(), emp.id, at(day, 19, 0)).await?;
        assert_eq!(view.summary.status, DayStatus::Present);
        assert_eq!(view.summary.worked_minutes, Some(570));
        assert_eq!(view.summary.extra_hours_display, "0h 30m");
        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_view_counts_statuses() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let emp = create_employee(&db, &config, "EMP402", date(2024, 1, 1), date(2026, 10, 1)).await?;

        // Thu 1 Oct: full day. Sat 3 Oct: short day.
        check_in(&db, emp.id, None, at(date(2026, 10, 1), 9, 0)).await?;
        check_out(&db, emp.id, None, at(date(2026, 10, 1), 18, 0)).await?;
        check_in(&db, emp.id, None, at(date(2026, 10, 3), 10, 0)).await?;
        check_out(&db, emp.id, None, at(date(2026, 10, 3), 13, 0)).await?;

        let view = monthly(&db, config.attendance(), emp.id, 2026, 10, at(date(2026, 10, 5), 8, 0)).await?;
        assert_eq!(view.days.len(), 5);
        assert_eq!(view.present, 1);
        assert_eq!(view.half_days, 1);
        // Fri 2 Oct is Gandhi Jayanti, Sun 4 Oct is the weekly off and
        // Mon 5 Oct has not finished yet.
        assert_eq!(view.absent, 0);
        assert_eq!(view.days[1].holiday.as_deref(), Some("Gandhi Jayanti"));
        assert!(view.days[3].weekly_off);
        assert_eq!(view.total_worked_minutes, 720);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_filters_by_location_and_status() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let day = date(2026, 10, 19);
        let bbsr = create_employee_with(
            &db,
            &config,
            "EMP403",
            date(2024, 1, 1),
            day,
            EmployeeRole::Employee,
            Some("Bhubaneswar"),
            None,
        )
        .await?;
        let blr = create_employee_with(
            &db,
            &config,
            "EMP404",
            date(2024, 1, 1),
            day,
            EmployeeRole::Employee,
            Some("Bangalore"),
            None,
        )
        .await?;
        check_in(&db, bbsr.id, None, at(day, 9, 0)).await?;
        check_out(&db, bbsr.id, None, at(day, 10, 0)).await?;
        check_in(&db, blr.id, None, at(day, 9, 45)).await?;
        check_out(&db, blr.id, None, at(day, 19, 0)).await?;

        let all = report(
            &db,
            config.attendance(),
            &ReportFilter {
                from: day,
                to: day,
                location: None,
                search: None,
                status: None,
                page: None,
            },
            at(day, 20, 0),
        )
        .await?;
        assert_eq!(all.total, 2);
        assert_eq!(all.total_pages, 1);

        let lop = report(
            &db,
            config.attendance(),
            &ReportFilter {
                from: day,
                to: day,
                location: Some("Bhubaneswar".to_string()),
                search: None,
                status: Some(DayStatus::Lop),
                page: None,
            },
            at(day, 20, 0),
        )
        .await?;
        assert_eq!(lop.total, 1);
        assert_eq!(lop.items[0].employee_code, "EMP403");
        Ok(())
    }
}
