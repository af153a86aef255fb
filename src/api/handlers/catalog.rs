//! Leave type and holiday catalogue endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::{ActorQuery, HolidayQuery, InactiveQuery};
use crate::api::state::AppState;
use crate::services::catalog::{self, LeaveTypeUpdate, NewHoliday, NewLeaveType};

use super::{ApiResult, RequestLog};

/// Handler for GET /leave-types.
pub(super) async fn list_leave_types(
    State(state): State<AppState>,
    query: Result<Query<InactiveQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_leave_types");
    let query = log.query(query)?;
    log.ok(catalog::list_leave_types(state.db(), query.include_inactive).await)
}

/// Handler for POST /leave-types.
pub(super) async fn create_leave_type(
    State(state): State<AppState>,
    payload: Result<Json<NewLeaveType>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_leave_type");
    let input = log.body(payload)?;
    log.created(catalog::create_leave_type(state.db(), input).await)
}

/// Handler for PUT /leave-types/:id.
pub(super) async fn update_leave_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<LeaveTypeUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_leave_type");
    let update = log.body(payload)?;
    log.ok(catalog::update_leave_type(state.db(), id, update).await)
}

/// Handler for DELETE /leave-types/:id?actor_id=.
///
/// A type still referenced by leaves or balances is deactivated instead;
/// the body says which happened.
pub(super) async fn delete_leave_type(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_leave_type");
    let actor = log.query(query)?.actor_id;
    log.ok(catalog::delete_leave_type(state.db(), id, actor).await)
}

/// Handler for GET /holidays.
pub(super) async fn list_holidays(
    State(state): State<AppState>,
    query: Result<Query<HolidayQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_holidays");
    let query = log.query(query)?;
    let result = catalog::list_holidays(state.db(), query.year, query.region.as_deref()).await;
    log.ok(result)
}

/// Handler for POST /holidays.
pub(super) async fn create_holiday(
    State(state): State<AppState>,
    payload: Result<Json<NewHoliday>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_holiday");
    let input = log.body(payload)?;
    log.created(catalog::create_holiday(state.db(), input).await)
}

/// Handler for PUT /holidays/:id.
pub(super) async fn update_holiday(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<NewHoliday>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_holiday");
    let input = log.body(payload)?;
    log.ok(catalog::update_holiday(state.db(), id, input).await)
}

/// Handler for DELETE /holidays/:id?actor_id=.
pub(super) async fn delete_holiday(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_holiday");
    let actor = log.query(query)?.actor_id;
    log.no_content(catalog::delete_holiday(state.db(), id, actor).await)
}
