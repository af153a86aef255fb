//! Attendance punch and report endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Datelike;

use crate::api::request::{EmployeeQuery, MonthQuery, PunchRequest};
use crate::api::state::AppState;
use crate::services::attendance::{self, ReportFilter};

use super::{ApiResult, RequestLog};

/// Handler for POST /attendance/check-in.
pub(super) async fn check_in(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("check_in");
    let request = log.body(payload)?;
    let result =
        attendance::check_in(state.db(), request.employee_id, request.address, state.now()).await;
    log.created(result)
}

/// Handler for POST /attendance/check-out.
pub(super) async fn check_out(
    State(state): State<AppState>,
    payload: Result<Json<PunchRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("check_out");
    let request = log.body(payload)?;
    let result =
        attendance::check_out(state.db(), request.employee_id, request.address, state.now())
            .await;
    log.ok(result)
}

/// Handler for GET /attendance/today.
pub(super) async fn today(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("attendance_today");
    let query = log.query(query)?;
    let policy = state.config().attendance();
    log.ok(attendance::today(state.db(), policy, query.employee_id, state.now()).await)
}

/// Handler for GET /attendance/monthly.
///
/// Year and month default to the current month.
pub(super) async fn monthly(
    State(state): State<AppState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("attendance_monthly");
    let query = log.query(query)?;
    let now = state.now();
    let year = query.year.unwrap_or(now.year());
    let month = query.month.unwrap_or(now.month());
    let policy = state.config().attendance();
    log.ok(attendance::monthly(state.db(), policy, query.employee_id, year, month, now).await)
}

/// Handler for GET /attendance/report.
pub(super) async fn report(
    State(state): State<AppState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("attendance_report");
    let filter = log.query(query)?;
    let policy = state.config().attendance();
    log.ok(attendance::report(state.db(), policy, &filter, state.now()).await)
}
