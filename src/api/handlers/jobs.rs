//! Manual triggers for the leave batch jobs.
//!
//! The scheduler runs the same service functions; both paths are safe to
//! repeat because accrual and year-end record a job key per period.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Datelike;

use crate::api::request::{YearEndRequest, YearQuery};
use crate::api::state::AppState;
use crate::services::leave_jobs;

use super::{ApiResult, RequestLog};

/// Handler for POST /jobs/monthly-accrual.
pub(super) async fn monthly_accrual(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("monthly_accrual");
    let now = state.now();
    let result = leave_jobs::run_monthly_accrual(state.db(), state.config(), now.date(), now).await;
    log.ok(result)
}

/// Handler for POST /jobs/year-end.
pub(super) async fn year_end(
    State(state): State<AppState>,
    payload: Result<Json<YearEndRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("year_end");
    let request = log.body(payload)?;
    let result =
        leave_jobs::run_year_end(state.db(), state.config(), request.year, state.now()).await;
    log.ok(result)
}

/// Handler for POST /jobs/comp-off-expiry.
pub(super) async fn comp_off_expiry(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("comp_off_expiry");
    let now = state.now();
    log.ok(leave_jobs::expire_comp_offs(state.db(), now.date(), now).await)
}

/// Handler for GET /jobs/carry-forward-summary.
///
/// Defaults to the year that closed most recently.
pub(super) async fn carry_forward_summary(
    State(state): State<AppState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("carry_forward_summary");
    let year = log.query(query)?.year.unwrap_or(state.today().year() - 1);
    log.ok(leave_jobs::carry_forward_summary(state.db(), state.config(), year).await)
}
