//! Department, designation and notice category masters.
//!
//! Employees reference departments and designations by name, so renaming
//! a master does not rewrite employee rows, and a master that is still in
//! use is deactivated rather than deleted.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entities::{
    self, department, designation, employee, message_category, message_subtype,
};
use crate::error::{HrmsError, HrmsResult};

/// What happened to a master on delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterRemoval {
    Deleted,
    /// Still referenced, so it was deactivated.
    Deactivated,
}

/// Filter for master lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MasterFilter {
    /// Matches name, title or code.
    #[serde(default)]
    pub search: Option<String>,
    /// `Some(true)` for active only, `Some(false)` for inactive only.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Designations only.
    #[serde(default)]
    pub department_id: Option<i32>,
}

fn required(field: &str, value: &str) -> HrmsResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(HrmsError::validation(field, "is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

// =============================================================================
// Departments
// =============================================================================

/// Input for a new department.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub actor_id: i32,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub head_id: Option<i32>,
}

/// Partial update of a department.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentUpdate {
    pub actor_id: i32,
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub head_id: Option<i32>,
    pub is_active: Option<bool>,
}

/// A department with its head count.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentView {
    #[serde(flatten)]
    pub department: department::Model,
    pub employee_count: u64,
    pub designation_count: u64,
}

async fn find_department<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<department::Model> {
    entities::Department::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Department", id))
}

async fn ensure_department_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::Department::find().filter(department::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(department::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Department".to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

/// Fetches the active department called `name`, for validating employee
/// records.
pub async fn ensure_department<C: ConnectionTrait>(db: &C, name: &str) -> HrmsResult<department::Model> {
    entities::Department::find()
        .filter(department::Column::Name.eq(name.trim()))
        .filter(department::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| {
            HrmsError::validation("department", format!("'{}' is not an active department", name))
        })
}

/// Adds a department.
pub async fn create_department<C: ConnectionTrait>(
    db: &C,
    input: NewDepartment,
    now: NaiveDateTime,
) -> HrmsResult<department::Model> {
    super::require_hr(db, input.actor_id).await?;
    let name = required("name", &input.name)?;
    ensure_department_name_free(db, &name, None).await?;
    if let Some(head) = input.head_id {
        super::find_employee(db, head).await?;
    }

    let model = department::ActiveModel {
        name: Set(name),
        code: Set(input.code),
        description: Set(input.description),
        head_id: Set(input.head_id),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(department_id = model.id, name = %model.name, "Department created");
    Ok(model)
}

/// Updates the fields present in `update`.
///
/// A rename is carried over to employees filed under the old name in the
/// same transaction.
pub async fn update_department(
    db: &DatabaseConnection,
    id: i32,
    update: DepartmentUpdate,
) -> HrmsResult<department::Model> {
    let txn = db.begin().await?;
    super::require_hr(&txn, update.actor_id).await?;
    let current = find_department(&txn, id).await?;
    let old_name = current.name.clone();
    let mut active: department::ActiveModel = current.into();

    let mut renamed = None;
    if let Some(name) = update.name {
        let name = required("name", &name)?;
        ensure_department_name_free(&txn, &name, Some(id)).await?;
        if name != old_name {
            renamed = Some(name.clone());
        }
        active.name = Set(name);
    }
    if update.code.is_some() {
        active.code = Set(update.code);
    }
    if update.description.is_some() {
        active.description = Set(update.description);
    }
    if let Some(head) = update.head_id {
        super::find_employee(&txn, head).await?;
        active.head_id = Set(Some(head));
    }
    if let Some(is_active) = update.is_active {
        active.is_active = Set(is_active);
    }
    let model = active.update(&txn).await?;

    if let Some(new_name) = renamed {
        let moved = entities::Employee::update_many()
            .col_expr(employee::Column::Department, Expr::value(new_name))
            .filter(employee::Column::Department.eq(old_name.as_str()))
            .exec(&txn)
            .await?;
        info!(department_id = id, from = %old_name, employees = moved.rows_affected, "Department renamed");
    }
    txn.commit().await?;
    Ok(model)
}

async fn department_usage<C: ConnectionTrait>(db: &C, model: &department::Model) -> HrmsResult<(u64, u64)> {
    let employees = entities::Employee::find()
        .filter(employee::Column::Department.eq(model.name.as_str()))
        .count(db)
        .await?;
    let designations = entities::Designation::find()
        .filter(designation::Column::DepartmentId.eq(model.id))
        .count(db)
        .await?;
    Ok((employees, designations))
}

/// Deletes a department, or deactivates it while employees or
/// designations still refer to it.
pub async fn delete_department<C: ConnectionTrait>(
    db: &C,
    id: i32,
    actor_id: i32,
) -> HrmsResult<MasterRemoval> {
    super::require_hr(db, actor_id).await?;
    let current = find_department(db, id).await?;
    let (employees, designations) = department_usage(db, &current).await?;
    if employees + designations > 0 {
        let mut active: department::ActiveModel = current.into();
        active.is_active = Set(false);
        active.update(db).await?;
        info!(department_id = id, employees, designations, "Department in use; deactivated");
        return Ok(MasterRemoval::Deactivated);
    }
    entities::Department::delete_by_id(id).exec(db).await?;
    info!(department_id = id, "Department deleted");
    Ok(MasterRemoval::Deleted)
}

/// Lists departments by name with their head counts.
pub async fn list_departments<C: ConnectionTrait>(
    db: &C,
    filter: &MasterFilter,
) -> HrmsResult<Vec<DepartmentView>> {
    let mut query = entities::Department::find();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(
            Condition::any()
                .add(department::Column::Name.contains(search.trim()))
                .add(department::Column::Code.contains(search.trim())),
        );
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(department::Column::IsActive.eq(is_active));
    }
    let departments = query.order_by_asc(department::Column::Name).all(db).await?;

    let mut views = Vec::with_capacity(departments.len());
    for department in departments {
        let (employee_count, designation_count) = department_usage(db, &department).await?;
        views.push(DepartmentView {
            department,
            employee_count,
            designation_count,
        });
    }
    Ok(views)
}

// =============================================================================
// Designations
// =============================================================================

/// Input for a new designation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDesignation {
    pub actor_id: i32,
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub department_id: Option<i32>,
    /// Defaults to 1.
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_salary: Option<Decimal>,
    #[serde(default)]
    pub max_salary: Option<Decimal>,
}

/// Partial update of a designation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignationUpdate {
    pub actor_id: i32,
    pub title: Option<String>,
    pub code: Option<String>,
    pub department_id: Option<i32>,
    pub level: Option<i32>,
    pub description: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub is_active: Option<bool>,
}

async fn find_designation<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<designation::Model> {
    entities::Designation::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Designation", id))
}

fn check_salary_band(min: Option<Decimal>, max: Option<Decimal>) -> HrmsResult<()> {
    for (field, value) in [("min_salary", min), ("max_salary", max)] {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(HrmsError::validation(field, "must not be negative"));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(HrmsError::validation("min_salary", "must not exceed max_salary"));
        }
    }
    Ok(())
}

async fn ensure_designation_free<C: ConnectionTrait>(
    db: &C,
    title: &str,
    code: &str,
    department_id: Option<i32>,
    except: Option<i32>,
) -> HrmsResult<()> {
    let mut by_code = entities::Designation::find().filter(designation::Column::Code.eq(code));
    let mut by_title = entities::Designation::find().filter(designation::Column::Title.eq(title));
    by_title = match department_id {
        Some(id) => by_title.filter(designation::Column::DepartmentId.eq(id)),
        None => by_title.filter(designation::Column::DepartmentId.is_null()),
    };
    if let Some(id) = except {
        by_code = by_code.filter(designation::Column::Id.ne(id));
        by_title = by_title.filter(designation::Column::Id.ne(id));
    }
    if by_code.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Designation code".to_string(),
            key: code.to_string(),
        });
    }
    if by_title.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Designation".to_string(),
            key: title.to_string(),
        });
    }
    Ok(())
}

/// Checks that `title` is an active designation, and that it belongs to
/// `department` when the designation is scoped to one.
pub async fn ensure_designation<C: ConnectionTrait>(
    db: &C,
    title: &str,
    department: Option<&str>,
) -> HrmsResult<()> {
    let candidates = entities::Designation::find()
        .filter(designation::Column::Title.eq(title.trim()))
        .filter(designation::Column::IsActive.eq(true))
        .all(db)
        .await?;
    if candidates.is_empty() {
        return Err(HrmsError::validation(
            "designation",
            format!("'{}' is not an active designation", title),
        ));
    }
    let department_id = match department {
        Some(name) => Some(ensure_department(db, name).await?.id),
        None => None,
    };
    let fits = candidates
        .iter()
        .any(|d| d.department_id.is_none() || d.department_id == department_id);
    if fits {
        Ok(())
    } else {
        Err(HrmsError::validation(
            "designation",
            format!(
                "'{}' does not belong to {}",
                title,
                department.unwrap_or("an unassigned employee")
            ),
        ))
    }
}

/// Adds a designation.
pub async fn create_designation<C: ConnectionTrait>(
    db: &C,
    input: NewDesignation,
    now: NaiveDateTime,
) -> HrmsResult<designation::Model> {
    super::require_hr(db, input.actor_id).await?;
    let title = required("title", &input.title)?;
    let code = required("code", &input.code)?;
    let level = input.level.unwrap_or(1);
    if level < 1 {
        return Err(HrmsError::validation("level", "must be at least 1"));
    }
    check_salary_band(input.min_salary, input.max_salary)?;
    if let Some(id) = input.department_id {
        find_department(db, id).await?;
    }
    ensure_designation_free(db, &title, &code, input.department_id, None).await?;

    let model = designation::ActiveModel {
        title: Set(title),
        code: Set(code),
        department_id: Set(input.department_id),
        level: Set(level),
        description: Set(input.description),
        min_salary: Set(input.min_salary),
        max_salary: Set(input.max_salary),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(designation_id = model.id, title = %model.title, "Designation created");
    Ok(model)
}

/// Updates the fields present in `update`.
pub async fn update_designation<C: ConnectionTrait>(
    db: &C,
    id: i32,
    update: DesignationUpdate,
) -> HrmsResult<designation::Model> {
    super::require_hr(db, update.actor_id).await?;
    let current = find_designation(db, id).await?;

    let title = match update.title {
        Some(title) => required("title", &title)?,
        None => current.title.clone(),
    };
    let code = match update.code {
        Some(code) => required("code", &code)?,
        None => current.code.clone(),
    };
    let department_id = update.department_id.or(current.department_id);
    if let Some(id) = update.department_id {
        find_department(db, id).await?;
    }
    let min_salary = update.min_salary.or(current.min_salary);
    let max_salary = update.max_salary.or(current.max_salary);
    check_salary_band(min_salary, max_salary)?;
    ensure_designation_free(db, &title, &code, department_id, Some(id)).await?;

    let mut active: designation::ActiveModel = current.into();
    active.title = Set(title);
    active.code = Set(code);
    active.department_id = Set(department_id);
    active.min_salary = Set(min_salary);
    active.max_salary = Set(max_salary);
    if let Some(level) = update.level {
        if level < 1 {
            return Err(HrmsError::validation("level", "must be at least 1"));
        }
        active.level = Set(level);
    }
    if update.description.is_some() {
        active.description = Set(update.description);
    }
    if let Some(is_active) = update.is_active {
        active.is_active = Set(is_active);
    }
    Ok(active.update(db).await?)
}

/// Deletes a designation, or deactivates it while employees hold it.
pub async fn delete_designation<C: ConnectionTrait>(
    db: &C,
    id: i32,
    actor_id: i32,
) -> HrmsResult<MasterRemoval> {
    super::require_hr(db, actor_id).await?;
    let current = find_designation(db, id).await?;
    let holders = entities::Employee::find()
        .filter(employee::Column::Designation.eq(current.title.as_str()))
        .count(db)
        .await?;
    if holders > 0 {
        let mut active: designation::ActiveModel = current.into();
        active.is_active = Set(false);
        active.update(db).await?;
        info!(designation_id = id, holders, "Designation in use; deactivated");
        return Ok(MasterRemoval::Deactivated);
    }
    entities::Designation::delete_by_id(id).exec(db).await?;
    info!(designation_id = id, "Designation deleted");
    Ok(MasterRemoval::Deleted)
}

/// Lists designations by level then title.
pub async fn list_designations<C: ConnectionTrait>(
    db: &C,
    filter: &MasterFilter,
) -> HrmsResult<Vec<designation::Model>> {
    let mut query = entities::Designation::find();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.filter(
            Condition::any()
                .add(designation::Column::Title.contains(search.trim()))
                .add(designation::Column::Code.contains(search.trim())),
        );
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(designation::Column::IsActive.eq(is_active));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(designation::Column::DepartmentId.eq(department_id));
    }
    Ok(query
        .order_by_asc(designation::Column::Level)
        .order_by_asc(designation::Column::Title)
        .all(db)
        .await?)
}

/// Active designations of one department, by title.
pub async fn designations_by_department<C: ConnectionTrait>(
    db: &C,
    department_id: i32,
) -> HrmsResult<Vec<designation::Model>> {
    find_department(db, department_id).await?;
    Ok(entities::Designation::find()
        .filter(designation::Column::DepartmentId.eq(department_id))
        .filter(designation::Column::IsActive.eq(true))
        .order_by_asc(designation::Column::Title)
        .all(db)
        .await?)
}

// =============================================================================
// Message categories
// =============================================================================

/// Input for a new message category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessageCategory {
    pub actor_id: i32,
    pub name: String,
}

/// Input for a new message sub-type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMessageSubtype {
    pub actor_id: i32,
    pub category_id: i32,
    pub name: String,
}

/// Rename or (de)activate a category or sub-type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageMasterUpdate {
    pub actor_id: i32,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<message_category::Model> {
    entities::MessageCategory::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Message category", id))
}

async fn find_subtype<C: ConnectionTrait>(db: &C, id: i32) -> HrmsResult<message_subtype::Model> {
    entities::MessageSubtype::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::not_found("Message sub-type", id))
}

async fn ensure_category_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::MessageCategory::find().filter(message_category::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(message_category::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Message category".to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

async fn ensure_subtype_name_free<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
    name: &str,
    except: Option<i32>,
) -> HrmsResult<()> {
    let mut query = entities::MessageSubtype::find()
        .filter(message_subtype::Column::CategoryId.eq(category_id))
        .filter(message_subtype::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(message_subtype::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(HrmsError::Duplicate {
            entity: "Message sub-type".to_string(),
            key: name.to_string(),
        });
    }
    Ok(())
}

/// Fetches the active category called `name`.
pub async fn active_category<C: ConnectionTrait>(db: &C, name: &str) -> HrmsResult<message_category::Model> {
    entities::MessageCategory::find()
        .filter(message_category::Column::Name.eq(name.trim()))
        .filter(message_category::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| HrmsError::validation("category", format!("'{}' is not an active category", name)))
}

/// Fetches the active sub-type `name` of a category.
pub async fn active_subtype<C: ConnectionTrait>(
    db: &C,
    category: &message_category::Model,
    name: &str,
) -> HrmsResult<message_subtype::Model> {
    entities::MessageSubtype::find()
        .filter(message_subtype::Column::CategoryId.eq(category.id))
        .filter(message_subtype::Column::Name.eq(name.trim()))
        .filter(message_subtype::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| {
            HrmsError::validation(
                "sub_type",
                format!("'{}' is not an active sub-type of {}", name, category.name),
            )
        })
}

pub async fn create_message_category<C: ConnectionTrait>(
    db: &C,
    input: NewMessageCategory,
) -> HrmsResult<message_category::Model> {
    super::require_hr(db, input.actor_id).await?;
    let name = required("name", &input.name)?;
    ensure_category_name_free(db, &name, None).await?;
    let model = message_category::ActiveModel {
        name: Set(name),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(category_id = model.id, name = %model.name, "Message category created");
    Ok(model)
}

pub async fn update_message_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
    update: MessageMasterUpdate,
) -> HrmsResult<message_category::Model> {
    super::require_hr(db, update.actor_id).await?;
    let current = find_category(db, id).await?;
    let mut active: message_category::ActiveModel = current.into();
    if let Some(name) = update.name {
        let name = required("name", &name)?;
        ensure_category_name_free(db, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(is_active) = update.is_active {
        active.is_active = Set(is_active);
    }
    Ok(active.update(db).await?)
}

/// Deletes a category with its sub-types. Notices keep the names they
/// were issued with.
pub async fn delete_message_category(db: &DatabaseConnection, id: i32, actor_id: i32) -> HrmsResult<()> {
    let txn = db.begin().await?;
    super::require_hr(&txn, actor_id).await?;
    let current = find_category(&txn, id).await?;
    entities::MessageSubtype::delete_many()
        .filter(message_subtype::Column::CategoryId.eq(id))
        .exec(&txn)
        .await?;
    entities::MessageCategory::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    info!(category_id = id, name = %current.name, "Message category deleted");
    Ok(())
}

/// Lists categories by name.
pub async fn list_message_categories<C: ConnectionTrait>(
    db: &C,
    include_inactive: bool,
) -> HrmsResult<Vec<message_category::Model>> {
    let mut query = entities::MessageCategory::find();
    if !include_inactive {
        query = query.filter(message_category::Column::IsActive.eq(true));
    }
    Ok(query.order_by_asc(message_category::Column::Name).all(db).await?)
}

pub async fn create_message_subtype<C: ConnectionTrait>(
    db: &C,
    input: NewMessageSubtype,
) -> HrmsResult<message_subtype::Model> {
    super::require_hr(db, input.actor_id).await?;
    let category = find_category(db, input.category_id).await?;
    let name = required("name", &input.name)?;
    ensure_subtype_name_free(db, category.id, &name, None).await?;
    let model = message_subtype::ActiveModel {
        category_id: Set(category.id),
        name: Set(name),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(subtype_id = model.id, category = %category.name, name = %model.name, "Message sub-type created");
    Ok(model)
}

pub async fn update_message_subtype<C: ConnectionTrait>(
    db: &C,
    id: i32,
    update: MessageMasterUpdate,
) -> HrmsResult<message_subtype::Model> {
    super::require_hr(db, update.actor_id).await?;
    let current = find_subtype(db, id).await?;
    let category_id = current.category_id;
    let mut active: message_subtype::ActiveModel = current.into();
    if let Some(name) = update.name {
        let name = required("name", &name)?;
        ensure_subtype_name_free(db, category_id, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(is_active) = update.is_active {
        active.is_active = Set(is_active);
    }
    Ok(active.update(db).await?)
}

pub async fn delete_message_subtype<C: ConnectionTrait>(db: &C, id: i32, actor_id: i32) -> HrmsResult<()> {
    super::require_hr(db, actor_id).await?;
    find_subtype(db, id).await?;
    entities::MessageSubtype::delete_by_id(id).exec(db).await?;
    info!(subtype_id = id, "Message sub-type deleted");
    Ok(())
}

/// Sub-types by name, optionally of one category.
pub async fn list_message_subtypes<C: ConnectionTrait>(
    db: &C,
    category_id: Option<i32>,
    include_inactive: bool,
) -> HrmsResult<Vec<message_subtype::Model>> {
    let mut query = entities::MessageSubtype::find();
    if let Some(category_id) = category_id {
        query = query.filter(message_subtype::Column::CategoryId.eq(category_id));
    }
    if !include_inactive {
        query = query.filter(message_subtype::Column::IsActive.eq(true));
    }
    Ok(query.order_by_asc(message_subtype::Column::Name).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EmployeeRole;
    use crate::services::employees::{update_employee, EmployeeUpdate};
    use crate::services::test_support::{config, create_employee, create_employee_with, date, setup_test_db};

    fn now() -> NaiveDateTime {
        date(2026, 10, 17).and_hms_opt(10, 0, 0).unwrap()
    }

    fn engineer(actor_id: i32, department_id: Option<i32>) -> NewDesignation {
        NewDesignation {
            actor_id,
            title: "Software Engineer".to_string(),
            code: "SE1".to_string(),
            department_id,
            level: Some(2),
            description: None,
            min_salary: Some(Decimal::from(30000)),
            max_salary: Some(Decimal::from(60000)),
        }
    }

    fn department(actor_id: i32, name: &str) -> NewDepartment {
        NewDepartment {
            actor_id,
            name: name.to_string(),
            code: None,
            description: None,
            head_id: None,
        }
    }

    #[tokio::test]
    async fn test_department_crud_and_search() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), now().date(), EmployeeRole::Hr, None, None).await?;

        let engineering = create_department(&db, department(hr.id, "Engineering"), now()).await?;
        create_department(&db, department(hr.id, "Finance"), now()).await?;
        let again = create_department(&db, department(hr.id, " Engineering "), now()).await;
        assert!(matches!(again, Err(HrmsError::Duplicate { .. })));

        let filter = MasterFilter {
            search: Some("engin".to_string()),
            ..Default::default()
        };
        let found = list_departments(&db, &filter).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].department.id, engineering.id);

        let retired = update_department(
            &db,
            engineering.id,
            DepartmentUpdate {
                actor_id: hr.id,
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        assert!(!retired.is_active);
        let active_only = list_departments(&db, &MasterFilter { is_active: Some(true), ..Default::default() }).await?;
        assert_eq!(active_only.len(), 1);
        assert_eq!(active_only[0].department.name, "Finance");

        assert_eq!(delete_department(&db, engineering.id, hr.id).await?, MasterRemoval::Deleted);
        Ok(())
    }

    #[tokio::test]
    async fn test_masters_require_hr() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let clerk = create_employee(&db, &config, "EMP600", date(2020, 1, 1), now().date()).await?;

        let denied = create_department(&db, department(clerk.id, "Engineering"), now()).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));
        let denied = create_designation(&db, engineer(clerk.id, None), now()).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));
        let denied = create_message_category(&db, NewMessageCategory { actor_id: clerk.id, name: "Memo".to_string() }).await;
        assert!(matches!(denied, Err(HrmsError::Forbidden { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_designations_by_department_lists_active_titles() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), now().date(), EmployeeRole::Hr, None, None).await?;
        let engineering = create_department(&db, department(hr.id, "Engineering"), now()).await?;

        create_designation(&db, engineer(hr.id, Some(engineering.id)), now()).await?;
        let lead = create_designation(
            &db,
            NewDesignation {
                title: "Architect".to_string(),
                code: "ARC".to_string(),
                level: Some(4),
                ..engineer(hr.id, Some(engineering.id))
            },
            now(),
        )
        .await?;
        let duplicate = create_designation(
            &db,
            NewDesignation {
                code: "SE2".to_string(),
                ..engineer(hr.id, Some(engineering.id))
            },
            now(),
        )
        .await;
        assert!(matches!(duplicate, Err(HrmsError::Duplicate { .. })));
        let inverted = create_designation(
            &db,
            NewDesignation {
                code: "SE3".to_string(),
                min_salary: Some(Decimal::from(90000)),
                ..engineer(hr.id, None)
            },
            now(),
        )
        .await;
        assert!(matches!(inverted, Err(HrmsError::Validation { .. })));

        let titles: Vec<String> = designations_by_department(&db, engineering.id)
            .await?
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["Architect", "Software Engineer"]);

        update_designation(
            &db,
            lead.id,
            DesignationUpdate {
                actor_id: hr.id,
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(designations_by_department(&db, engineering.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_employee_department_and_designation_are_validated() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), now().date(), EmployeeRole::Hr, None, None).await?;
        let employee = create_employee(&db, &config, "EMP601", date(2020, 1, 1), now().date()).await?;
        let engineering = create_department(&db, department(hr.id, "Engineering"), now()).await?;
        create_department(&db, department(hr.id, "Finance"), now()).await?;
        create_designation(&db, engineer(hr.id, Some(engineering.id)), now()).await?;

        let unknown = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                department: Some("Marketing".to_string()),
                ..Default::default()
            },
            now(),
        )
        .await;
        assert!(matches!(unknown, Err(HrmsError::Validation { .. })));

        let wrong_department = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                department: Some("Finance".to_string()),
                designation: Some("Software Engineer".to_string()),
                ..Default::default()
            },
            now(),
        )
        .await;
        assert!(matches!(wrong_department, Err(HrmsError::Validation { .. })));

        let placed = update_employee(
            &db,
            &config,
            employee.id,
            EmployeeUpdate {
                actor_id: hr.id,
                department: Some("Engineering".to_string()),
                designation: Some("Software Engineer".to_string()),
                ..Default::default()
            },
            now(),
        )
        .await?;
        assert_eq!(placed.department.as_deref(), Some("Engineering"));

        // Held by an employee, so only deactivated; renames follow through.
        assert_eq!(delete_department(&db, engineering.id, hr.id).await?, MasterRemoval::Deactivated);
        update_department(
            &db,
            engineering.id,
            DepartmentUpdate {
                actor_id: hr.id,
                name: Some("Product Engineering".to_string()),
                ..Default::default()
            },
        )
        .await?;
        let moved = crate::services::find_employee(&db, employee.id).await?;
        assert_eq!(moved.department.as_deref(), Some("Product Engineering"));
        Ok(())
    }

    #[tokio::test]
    async fn test_message_subtypes_belong_to_their_category() -> HrmsResult<()> {
        let config = config();
        let db = setup_test_db(&config).await?;
        let hr = create_employee_with(&db, &config, "HR001", date(2020, 1, 1), now().date(), EmployeeRole::Hr, None, None).await?;

        let seeded = list_message_categories(&db, false).await?;
        let names: Vec<&str> = seeded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Appreciation", "Notice", "Warning"]);

        let warning = active_category(&db, "Warning").await?;
        let late = create_message_subtype(
            &db,
            NewMessageSubtype {
                actor_id: hr.id,
                category_id: warning.id,
                name: "Late Coming".to_string(),
            },
        )
        .await?;
        let again = create_message_subtype(
            &db,
            NewMessageSubtype {
                actor_id: hr.id,
                category_id: warning.id,
                name: "Late Coming".to_string(),
            },
        )
        .await;
        assert!(matches!(again, Err(HrmsError::Duplicate { .. })));

        let appreciation = active_category(&db, "Appreciation").await?;
        let elsewhere = active_subtype(&db, &appreciation, "Late Coming").await;
        assert!(matches!(elsewhere, Err(HrmsError::Validation { .. })));
        assert_eq!(active_subtype(&db, &warning, "Late Coming").await?.id, late.id);

        delete_message_category(&db, warning.id, hr.id).await?;
        assert!(list_message_subtypes(&db, Some(warning.id), true).await?.is_empty());
        Ok(())
    }
}
