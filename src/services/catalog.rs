//! Leave types, holidays and office locations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{self, holiday, leave, leave_balance, leave_type, location, HolidayType, LeaveKind};
use crate::error::{HrmsError, HrmsResult};
use crate::rules::CalendarHoliday;

/// Input for a new leave type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveType {
    /// HR administrator making the change.
    pub actor_id: i32,
    /// Unique display name.
    pub name: String,
    /// Rule family.
    pub kind: LeaveKind,
    /// Longest single application in days.
    #[serde(default)]
    pub max_days: Option<i32>,
    /// Days granted when a yearly balance is opened.
    #[serde(default)]
    pub annual_allocation: Decimal,
    /// Days added by the monthly accrual job.
    #[serde(default)]
    pub accrual_rate: Decimal,
    /// Cap on days carried into the next year.
    #[serde(default)]
    pub max_carry_forward: Decimal,
    /// Whether accrued days can be used in the month they accrue.
    #[serde(default)]
    pub can_use_same_month: Option<bool>,
    /// Calendar colour.
    #[serde(default)]
    pub colour: Option<String>,
    /// Free-text remark.
    #[serde(default)]
    pub remark: Option<String>,
}

/// Partial update of a leave type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveTypeUpdate {
    pub actor_id: i32,
    pub name: Option<String>,
    pub max_days: Option<i32>,
    pub annual_allocation: Option<Decimal>,
    pub accrual_rate: Option<Decimal>,
    pub max_carry_forward: Option<Decimal>,
    pub can_use_same_month: Option<bool>,
    pub colour: Option<String>,
    pub remark: Option<String>,
    pub is_active: Option<bool>,
}

/// What happened to a leave type on delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveTypeRemoval {
    /// The row was removed.
    Deleted,
    /// Leaves or balances still reference it, so it was deactivated.
    Deactivated,
}

fn check_decimal(field: &str, value: Decimal) -> HrmsResult<()> {
    if value < Decimal::ZERO {
        return Err(HrmsError::validation(field, "must not be negative"));
    }
    Ok(())
}

async fn ensure_unique_leave_type_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except_id: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::LeaveType::find().filter(leave_type::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(leave_type::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Leave type".to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

/// Adds a leave type to the catalogue.
pub async fn create_leave_type<C: ConnectionTrait>(
    db: &C,
    input: NewLeaveType,
) -> HrmsResult<leave_type::Model> {
    super::require_hr(db, input.actor_id).await?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    let max_days = input.max_days.unwrap_or(30);
    if max_days <= 0 {
        return Err(HrmsError::validation("max_days", "must be positive"));
    }
    check_decimal("annual_allocation", input.annual_allocation)?;
    check_decimal("accrual_rate", input.accrual_rate)?;
    check_decimal("max_carry_forward", input.max_carry_forward)?;
    ensure_unique_leave_type_name(db, &name, None).await?;

    let model = leave_type::ActiveModel {
        name: Set(name),
        kind: Set(input.kind),
        max_days: Set(max_days),
        annual_allocation: Set(input.annual_allocation),
        accrual_rate: Set(input.accrual_rate),
        max_carry_forward: Set(input.max_carry_forward),
        is_optional: Set(input.kind == LeaveKind::Optional),
        can_use_same_month: Set(input.can_use_same_month.unwrap_or(true)),
        colour: Set(input.colour.unwrap_or_else(|| "#1976d2".to_string())),
        remark: Set(input.remark),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(leave_type_id = model.id, name = %model.name, kind = ?model.kind, "Leave type created");
    Ok(model)
}

/// Updates the supplied fields of a leave type.
pub async fn update_leave_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
    update: LeaveTypeUpdate,
) -> HrmsResult<leave_type::Model> {
    super::require_hr(db, update.actor_id).await?;
    let existing = entities::LeaveType::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave type", id))?;
    let mut active: leave_type::ActiveModel = existing.into();

    if let Some(name) = update.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(HrmsError::validation("name", "is required"));
        }
        ensure_unique_leave_type_name(db, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(max_days) = update.max_days {
        if max_days <= 0 {
            return Err(HrmsError::validation("max_days", "must be positive"));
        }
        active.max_days = Set(max_days);
    }
    if let Some(value) = update.annual_allocation {
        check_decimal("annual_allocation", value)?;
        active.annual_allocation = Set(value);
    }
    if let Some(value) = update.accrual_rate {
        check_decimal("accrual_rate", value)?;
        active.accrual_rate = Set(value);
    }
    if let Some(value) = update.max_carry_forward {
        check_decimal("max_carry_forward", value)?;
        active.max_carry_forward = Set(value);
    }
    if let Some(value) = update.can_use_same_month {
        active.can_use_same_month = Set(value);
    }
    if let Some(colour) = update.colour {
        active.colour = Set(colour);
    }
    if let Some(remark) = update.remark {
        active.remark = Set(Some(remark));
    }
    if let Some(is_active) = update.is_active {
        active.is_active = Set(is_active);
    }
    Ok(active.update(db).await?)
}

/// Deletes a leave type, or deactivates it when leaves or balances use it.
pub async fn delete_leave_type<C: ConnectionTrait>(
    db: &C,
    id: i32,
    actor_id: i32,
) -> HrmsResult<LeaveTypeRemoval> {
    super::require_hr(db, actor_id).await?;
    let existing = entities::LeaveType::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Leave type", id))?;

    let leaves = entities::Leave::find()
        .filter(leave::Column::LeaveTypeId.eq(id))
        .count(db)
        .await?;
    let balances = entities::LeaveBalance::find()
        .filter(leave_balance::Column::LeaveTypeId.eq(id))
        .count(db)
        .await?;

    if leaves + balances > 0 {
        let mut active: leave_type::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await?;
        info!(leave_type_id = id, leaves, balances, "Leave type in use; deactivated");
        Ok(LeaveTypeRemoval::Deactivated)
    } else {
        entities::LeaveType::delete_by_id(id).exec(db).await?;
        info!(leave_type_id = id, "Leave type deleted");
        Ok(LeaveTypeRemoval::Deleted)
    }
}

/// Lists leave types by name.
pub async fn list_leave_types<C: ConnectionTrait>(
    db: &C,
    include_inactive: bool,
) -> HrmsResult<Vec<leave_type::Model>> {
    let mut query = entities::LeaveType::find();
    if !include_inactive {
        query = query.filter(leave_type::Column::IsActive.eq(true));
    }
    Ok(query.order_by_asc(leave_type::Column::Name).all(db).await?)
}

/// Input for a new holiday.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHoliday {
    pub actor_id: i32,
    pub name: String,
    pub holiday_type: HolidayType,
    pub date: NaiveDate,
    /// Location name; required for state holidays.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_holiday_colour(holiday_type: HolidayType) -> &'static str {
    match holiday_type {
        HolidayType::Optional => "#f9a825",
        _ => "#c62828",
    }
}

async fn ensure_unique_holiday<C: ConnectionTrait>(
    db: &C,
    name: &str,
    date: NaiveDate,
    region: Option<&str>,
    except_id: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::Holiday::find()
        .filter(holiday::Column::Name.eq(name))
        .filter(holiday::Column::Date.eq(date));
    query = match region {
        Some(region) => query.filter(holiday::Column::Region.eq(region)),
        None => query.filter(holiday::Column::Region.is_null()),
    };
    if let Some(id) = except_id {
        query = query.filter(holiday::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Holiday".to_string(),
            key: format!("{} on {}", name, date),
        });
    }
    Ok(())
}

/// Adds a holiday to the calendar.
pub async fn create_holiday<C: ConnectionTrait>(db: &C, input: NewHoliday) -> HrmsResult<holiday::Model> {
    super::require_hr(db, input.actor_id).await?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    let region = input.region.filter(|r| !r.trim().is_empty());
    if input.holiday_type == HolidayType::State && region.is_none() {
        return Err(HrmsError::validation("region", "is required for state holidays"));
    }
    ensure_unique_holiday(db, &name, input.date, region.as_deref(), None).await?;

    let model = holiday::ActiveModel {
        name: Set(name),
        holiday_type: Set(input.holiday_type),
        date: Set(input.date),
        region: Set(region),
        colour: Set(input
            .colour
            .unwrap_or_else(|| default_holiday_colour(input.holiday_type).to_string())),
        description: Set(input.description),
        is_optional: Set(input.holiday_type == HolidayType::Optional),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(holiday_id = model.id, name = %model.name, date = %model.date, "Holiday created");
    Ok(model)
}

/// Replaces a holiday's fields.
pub async fn update_holiday<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: NewHoliday,
) -> HrmsResult<holiday::Model> {
    super::require_hr(db, input.actor_id).await?;
    let existing = entities::Holiday::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Holiday", id))?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    let region = input.region.filter(|r| !r.trim().is_empty());
    if input.holiday_type == HolidayType::State && region.is_none() {
        return Err(HrmsError::validation("region", "is required for state holidays"));
    }
    ensure_unique_holiday(db, &name, input.date, region.as_deref(), Some(id)).await?;

    let mut active: holiday::ActiveModel = existing.into();
    active.name = Set(name);
    active.holiday_type = Set(input.holiday_type);
    active.date = Set(input.date);
    active.region = Set(region);
    if let Some(colour) = input.colour {
        active.colour = Set(colour);
    }
    active.description = Set(input.description);
    active.is_optional = Set(input.holiday_type == HolidayType::Optional);
    Ok(active.update(db).await?)
}

/// Removes a holiday.
pub async fn delete_holiday<C: ConnectionTrait>(db: &C, id: i32, actor_id: i32) -> HrmsResult<()> {
    super::require_hr(db, actor_id).await?;
    let result = entities::Holiday::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HrmsError::not_found("Holiday", id));
    }
    Ok(())
}

/// Lists holidays by date, optionally for one year and one location.
///
/// With a region, national holidays and that region's holidays are returned.
pub async fn list_holidays<C: ConnectionTrait>(
    db: &C,
    year: Option<i32>,
    region: Option<&str>,
) -> HrmsResult<Vec<holiday::Model>> {
    let mut query = entities::Holiday::find();
    if let Some(year) = year {
        let (start, end) = year_bounds(year)?;
        query = query
            .filter(holiday::Column::Date.gte(start))
            .filter(holiday::Column::Date.lte(end));
    }
    let holidays = query.order_by_asc(holiday::Column::Date).all(db).await?;
    Ok(match region {
        Some(region) => holidays
            .into_iter()
            .filter(|h| h.applies_to(Some(region)))
            .collect(),
        None => holidays,
    })
}

fn year_bounds(year: i32) -> HrmsResult<(NaiveDate, NaiveDate)> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| HrmsError::validation("year", format!("{} is out of range", year)))
}

/// Holidays in `[start, end]` visible at `location`, as calendar entries
/// for working-day counting.
pub async fn calendar_holidays<C: ConnectionTrait>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
    location: Option<&str>,
) -> HrmsResult<Vec<CalendarHoliday>> {
    let holidays = entities::Holiday::find()
        .filter(holiday::Column::Date.gte(start))
        .filter(holiday::Column::Date.lte(end))
        .order_by_asc(holiday::Column::Date)
        .all(db)
        .await?;
    Ok(holidays
        .into_iter()
        .filter(|h| h.applies_to(location))
        .map(|h| CalendarHoliday {
            date: h.date,
            mandatory: h.is_mandatory_for(location),
            optional: h.is_optional_holiday(),
            name: h.name,
        })
        .collect())
}

/// Mandatory holidays in `[start, end]` for `location`.
pub async fn mandatory_holidays<C: ConnectionTrait>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
    location: Option<&str>,
) -> HrmsResult<Vec<CalendarHoliday>> {
    Ok(calendar_holidays(db, start, end, location)
        .await?
        .into_iter()
        .filter(|h| h.mandatory)
        .collect())
}

/// Optional holidays in `[start, end]`.
pub async fn optional_holidays<C: ConnectionTrait>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
) -> HrmsResult<Vec<holiday::Model>> {
    Ok(entities::Holiday::find()
        .filter(holiday::Column::Date.gte(start))
        .filter(holiday::Column::Date.lte(end))
        .order_by_asc(holiday::Column::Date)
        .all(db)
        .await?
        .into_iter()
        .filter(|h| h.is_optional_holiday())
        .collect())
}

/// Holidays falling on `date` for an employee at `location`.
pub async fn holidays_on<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
    location: Option<&str>,
) -> HrmsResult<Vec<holiday::Model>> {
    Ok(entities::Holiday::find()
        .filter(holiday::Column::Date.eq(date))
        .all(db)
        .await?
        .into_iter()
        .filter(|h| h.applies_to(location))
        .collect())
}

/// Input for a new office location.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLocation {
    pub actor_id: i32,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Adds an office location.
pub async fn create_location<C: ConnectionTrait>(db: &C, input: NewLocation) -> HrmsResult<location::Model> {
    super::require_hr(db, input.actor_id).await?;
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(HrmsError::validation("name", "is required"));
    }
    let exists = entities::Location::find()
        .filter(location::Column::Name.eq(name.as_str()))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(HrmsError::Duplicate {
            entity: "Location".to_string(),
            key: name,
        });
    }
    let model = location::ActiveModel {
        name: Set(name),
        code: Set(input.code),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(location_id = model.id, name = %model.name, "Location created");
    Ok(model)
}

/// Lists locations by name.
pub async fn list_locations<C: ConnectionTrait>(db: &C, active_only: bool) -> HrmsResult<Vec<location::Model>> {
    let mut query = entities::Location::find();
    if active_only {
        query = query.filter(location::Column::IsActive.eq(true));
    }
    Ok(query.order_by_asc(location::Column::Name).all(db).await?)
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> HrmsResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| HrmsError::validation("month", format!("{}-{} is not a month", year, month)))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| HrmsError::validation("month", format!("{}-{} is out of range", year, month)))?;
    Ok((start, end))
}
