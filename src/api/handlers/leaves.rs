//! Leave application, approval and comp-off endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::{
    ActorRequest, LeaveStatusRequest, OwnerRequest, RejectLeaveRequest, StatsQuery,
};
use crate::api::state::AppState;
use crate::services::balances::{self, BalanceAdjustment};
use crate::services::leaves::{self, CompOffClaim, LeaveApplication, LeaveFilter};

use super::{ApiResult, RequestLog};

/// Handler for POST /leaves.
///
/// Responds with every row the application produced (a paid/unpaid split
/// or an optional-holiday split yields more than one), the warnings raised
/// and the decision trace.
pub(super) async fn apply_leave(
    State(state): State<AppState>,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("apply_leave");
    let input = log.body(payload)?;
    let result = leaves::apply_leave(state.db(), state.config(), input, state.now()).await;
    log.created(result)
}

/// Handler for GET /leaves.
pub(super) async fn list_leaves(
    State(state): State<AppState>,
    query: Result<Query<LeaveFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_leaves");
    let filter = log.query(query)?;
    log.ok(leaves::list_leaves(state.db(), &filter).await)
}

/// Handler for GET /leaves/stats.
pub(super) async fn leave_stats(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("leave_stats");
    let query = log.query(query)?;
    log.ok(leaves::leave_stats(state.db(), query.employee_id).await)
}

/// Handler for GET /leaves/:id.
pub(super) async fn get_leave(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let log = RequestLog::start("get_leave");
    log.ok(leaves::get_leave(state.db(), id).await)
}

/// Handler for POST /leaves/:id/approve.
pub(super) async fn approve_leave(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("approve_leave");
    let request = log.body(payload)?;
    let result =
        leaves::approve_leave(state.db(), state.config(), id, request.actor_id, state.now()).await;
    log.ok(result)
}

/// Handler for POST /leaves/:id/reject.
pub(super) async fn reject_leave(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<RejectLeaveRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("reject_leave");
    let request = log.body(payload)?;
    let result = leaves::reject_leave(
        state.db(),
        state.config(),
        id,
        request.actor_id,
        request.reason,
        state.now(),
    )
    .await;
    log.ok(result)
}

/// Handler for POST /leaves/:id/status.
pub(super) async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<LeaveStatusRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_leave_status");
    let request = log.body(payload)?;
    let result = leaves::update_status(
        state.db(),
        state.config(),
        id,
        request.status,
        request.actor_id,
        request.reason,
        state.now(),
    )
    .await;
    log.ok(result)
}

/// Handler for POST /leaves/:id/withdraw.
pub(super) async fn withdraw_leave(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<OwnerRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("withdraw_leave");
    let request = log.body(payload)?;
    log.ok(leaves::withdraw_leave(state.db(), id, request.employee_id, state.now()).await)
}

/// Handler for POST /balances/adjust.
pub(super) async fn adjust_balance(
    State(state): State<AppState>,
    payload: Result<Json<BalanceAdjustment>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("adjust_balance");
    let input = log.body(payload)?;
    log.ok(balances::adjust_balance(state.db(), input, state.now()).await)
}

/// Handler for POST /comp-offs.
pub(super) async fn earn_comp_off(
    State(state): State<AppState>,
    payload: Result<Json<CompOffClaim>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("earn_comp_off");
    let claim = log.body(payload)?;
    let result = leaves::earn_comp_off(state.db(), state.config(), claim, state.now()).await;
    log.created(result)
}
