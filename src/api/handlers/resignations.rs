//! Resignation workflow and exit-process endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::{
    ActorRequest, ApproveResignationRequest, OwnerRequest, RejectResignationRequest,
};
use crate::api::state::AppState;
use crate::services::resignations::{
    self, ChecklistUpdate, ExitInterviewInput, NoDueInput, ResignationFilter, ResignationRequest,
};

use super::{ApiResult, RequestLog};

/// Handler for POST /resignations.
pub(super) async fn submit_resignation(
    State(state): State<AppState>,
    payload: Result<Json<ResignationRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("submit_resignation");
    let input = log.body(payload)?;
    let result =
        resignations::submit_resignation(state.db(), state.config(), input, state.now()).await;
    log.created(result)
}

/// Handler for GET /resignations.
pub(super) async fn list_resignations(
    State(state): State<AppState>,
    query: Result<Query<ResignationFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_resignations");
    let filter = log.query(query)?;
    log.ok(resignations::list_resignations(state.db(), &filter).await)
}

/// Handler for GET /resignations/counts.
pub(super) async fn resignation_counts(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("resignation_counts");
    log.ok(resignations::resignation_counts(state.db()).await)
}

/// Handler for GET /resignations/:id.
///
/// Includes the checklist, exit documents, notice progress and timeline.
pub(super) async fn resignation_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("resignation_detail");
    log.ok(resignations::resignation_detail(state.db(), id, state.today()).await)
}

/// Handler for POST /resignations/:id/review.
pub(super) async fn review_resignation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("review_resignation");
    let request = log.body(payload)?;
    log.ok(resignations::review_resignation(state.db(), id, request.actor_id).await)
}

/// Handler for POST /resignations/:id/approve.
pub(super) async fn approve_resignation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ApproveResignationRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("approve_resignation");
    let request = log.body(payload)?;
    let result = resignations::approve_resignation(
        state.db(),
        id,
        request.actor_id,
        request.feedback,
        state.now(),
    )
    .await;
    log.ok(result)
}

/// Handler for POST /resignations/:id/reject.
pub(super) async fn reject_resignation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<RejectResignationRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("reject_resignation");
    let request = log.body(payload)?;
    let result = resignations::reject_resignation(
        state.db(),
        id,
        request.actor_id,
        request.feedback,
        state.now(),
    )
    .await;
    log.ok(result)
}

/// Handler for POST /resignations/:id/withdraw.
pub(super) async fn withdraw_resignation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<OwnerRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("withdraw_resignation");
    let request = log.body(payload)?;
    let result = resignations::withdraw_resignation(
        state.db(),
        id,
        request.employee_id,
        request.reason,
        state.now(),
    )
    .await;
    log.ok(result)
}

/// Handler for POST /resignations/:id/complete.
pub(super) async fn complete_resignation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("complete_resignation");
    let request = log.body(payload)?;
    let result =
        resignations::complete_resignation(state.db(), id, request.actor_id, state.now()).await;
    log.ok(result)
}

/// Handler for PUT /resignations/:id/exit-interview.
pub(super) async fn save_exit_interview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ExitInterviewInput>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("save_exit_interview");
    let input = log.body(payload)?;
    log.ok(resignations::save_exit_interview(state.db(), id, input).await)
}

/// Handler for PUT /resignations/:id/no-due-certificate.
pub(super) async fn save_no_due_certificate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<NoDueInput>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("save_no_due_certificate");
    let input = log.body(payload)?;
    let result =
        resignations::save_no_due_certificate(state.db(), id, input, state.today()).await;
    log.ok(result)
}

/// Handler for PUT /resignation-checklist/:item_id.
pub(super) async fn update_checklist_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    payload: Result<Json<ChecklistUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_checklist_item");
    let update = log.body(payload)?;
    let result =
        resignations::update_checklist_item(state.db(), item_id, update, state.today()).await;
    log.ok(result)
}
