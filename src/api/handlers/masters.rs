//! Department, designation and message category endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::{ActorQuery, InactiveQuery, SubtypeQuery};
use crate::api::state::AppState;
use crate::services::masters::{
    self, DepartmentUpdate, DesignationUpdate, MasterFilter, MessageMasterUpdate, NewDepartment,
    NewDesignation, NewMessageCategory, NewMessageSubtype,
};

use super::{ApiResult, RequestLog};

/// Handler for GET /departments.
pub(super) async fn list_departments(
    State(state): State<AppState>,
    query: Result<Query<MasterFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_departments");
    let filter = log.query(query)?;
    log.ok(masters::list_departments(state.db(), &filter).await)
}

/// Handler for POST /departments.
pub(super) async fn create_department(
    State(state): State<AppState>,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_department");
    let input = log.body(payload)?;
    log.created(masters::create_department(state.db(), input, state.now()).await)
}

/// Handler for PUT /departments/:id.
pub(super) async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<DepartmentUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_department");
    let update = log.body(payload)?;
    log.ok(masters::update_department(state.db(), id, update).await)
}

/// Handler for DELETE /departments/:id?actor_id=.
///
/// A department still in use is deactivated; the body says which happened.
pub(super) async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_department");
    let actor = log.query(query)?.actor_id;
    log.ok(masters::delete_department(state.db(), id, actor).await)
}

/// Handler for GET /departments/:id/designations.
pub(super) async fn department_designations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("department_designations");
    log.ok(masters::designations_by_department(state.db(), id).await)
}

/// Handler for GET /designations.
pub(super) async fn list_designations(
    State(state): State<AppState>,
    query: Result<Query<MasterFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_designations");
    let filter = log.query(query)?;
    log.ok(masters::list_designations(state.db(), &filter).await)
}

/// Handler for POST /designations.
pub(super) async fn create_designation(
    State(state): State<AppState>,
    payload: Result<Json<NewDesignation>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_designation");
    let input = log.body(payload)?;
    log.created(masters::create_designation(state.db(), input, state.now()).await)
}

/// Handler for PUT /designations/:id.
pub(super) async fn update_designation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<DesignationUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_designation");
    let update = log.body(payload)?;
    log.ok(masters::update_designation(state.db(), id, update).await)
}

/// Handler for DELETE /designations/:id?actor_id=.
pub(super) async fn delete_designation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_designation");
    let actor = log.query(query)?.actor_id;
    log.ok(masters::delete_designation(state.db(), id, actor).await)
}

/// Handler for GET /message-categories.
pub(super) async fn list_message_categories(
    State(state): State<AppState>,
    query: Result<Query<InactiveQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_message_categories");
    let query = log.query(query)?;
    log.ok(masters::list_message_categories(state.db(), query.include_inactive).await)
}

/// Handler for POST /message-categories.
pub(super) async fn create_message_category(
    State(state): State<AppState>,
    payload: Result<Json<NewMessageCategory>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_message_category");
    let input = log.body(payload)?;
    log.created(masters::create_message_category(state.db(), input).await)
}

/// Handler for PUT /message-categories/:id.
pub(super) async fn update_message_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<MessageMasterUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_message_category");
    let update = log.body(payload)?;
    log.ok(masters::update_message_category(state.db(), id, update).await)
}

/// Handler for DELETE /message-categories/:id?actor_id=.
pub(super) async fn delete_message_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_message_category");
    let actor = log.query(query)?.actor_id;
    log.no_content(masters::delete_message_category(state.db(), id, actor).await)
}

/// Handler for GET /message-subtypes.
pub(super) async fn list_message_subtypes(
    State(state): State<AppState>,
    query: Result<Query<SubtypeQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_message_subtypes");
    let query = log.query(query)?;
    let result =
        masters::list_message_subtypes(state.db(), query.category_id, query.include_inactive).await;
    log.ok(result)
}

/// Handler for POST /message-subtypes.
pub(super) async fn create_message_subtype(
    State(state): State<AppState>,
    payload: Result<Json<NewMessageSubtype>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_message_subtype");
    let input = log.body(payload)?;
    log.created(masters::create_message_subtype(state.db(), input).await)
}

/// Handler for PUT /message-subtypes/:id.
pub(super) async fn update_message_subtype(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<MessageMasterUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_message_subtype");
    let update = log.body(payload)?;
    log.ok(masters::update_message_subtype(state.db(), id, update).await)
}

/// Handler for DELETE /message-subtypes/:id?actor_id=.
pub(super) async fn delete_message_subtype(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_message_subtype");
    let actor = log.query(query)?.actor_id;
    log.no_content(masters::delete_message_subtype(state.db(), id, actor).await)
}
