//! HTTP request handlers for the HRMS API.
//!
//! Every handler follows the same shape: open a [`RequestLog`] (correlation
//! id plus timing), unpack the body or query, call one service function with
//! "now" from the application clock, and serialize the result.

mod attendance;
mod catalog;
mod employees;
mod jobs;
mod leaves;
mod masters;
mod notices;
mod payroll;
mod resignations;

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::HrmsResult;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// Handler return type; both arms render as JSON.
pub(crate) type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // hr
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/:id",
            get(employees::get_employee).put(employees::update_employee),
        )
        .route("/employees/:id/balances", get(employees::employee_balances))
        .route("/celebrations", get(employees::celebrations))
        .route(
            "/locations",
            get(employees::list_locations).post(employees::create_location),
        )
        .route("/employees/:id/wishes", get(employees::celebration_wishes))
        .route("/celebrations/wishes", post(employees::send_celebration_wish))
        .route("/notices", get(notices::list_notices).post(notices::issue_notice))
        .route("/notices/:id", delete(notices::delete_notice))
        // masters
        .route(
            "/departments",
            get(masters::list_departments).post(masters::create_department),
        )
        .route(
            "/departments/:id",
            put(masters::update_department).delete(masters::delete_department),
        )
        .route("/departments/:id/designations", get(masters::department_designations))
        .route(
            "/designations",
            get(masters::list_designations).post(masters::create_designation),
        )
        .route(
            "/designations/:id",
            put(masters::update_designation).delete(masters::delete_designation),
        )
        .route(
            "/message-categories",
            get(masters::list_message_categories).post(masters::create_message_category),
        )
        .route(
            "/message-categories/:id",
            put(masters::update_message_category).delete(masters::delete_message_category),
        )
        .route(
            "/message-subtypes",
            get(masters::list_message_subtypes).post(masters::create_message_subtype),
        )
        .route(
            "/message-subtypes/:id",
            put(masters::update_message_subtype).delete(masters::delete_message_subtype),
        )
        // leave catalogue
        .route(
            "/leave-types",
            get(catalog::list_leave_types).post(catalog::create_leave_type),
        )
        .route(
            "/leave-types/:id",
            put(catalog::update_leave_type).delete(catalog::delete_leave_type),
        )
        .route(
            "/holidays",
            get(catalog::list_holidays).post(catalog::create_holiday),
        )
        .route(
            "/holidays/:id",
            put(catalog::update_holiday).delete(catalog::delete_holiday),
        )
        // leave engine
        .route("/leaves", get(leaves::list_leaves).post(leaves::apply_leave))
        .route("/leaves/stats", get(leaves::leave_stats))
        .route("/leaves/:id", get(leaves::get_leave))
        .route("/leaves/:id/approve", post(leaves::approve_leave))
        .route("/leaves/:id/reject", post(leaves::reject_leave))
        .route("/leaves/:id/status", post(leaves::update_status))
        .route("/leaves/:id/withdraw", post(leaves::withdraw_leave))
        .route("/balances/adjust", post(leaves::adjust_balance))
        .route("/comp-offs", post(leaves::earn_comp_off))
        .route("/jobs/monthly-accrual", post(jobs::monthly_accrual))
        .route("/jobs/year-end", post(jobs::year_end))
        .route("/jobs/comp-off-expiry", post(jobs::comp_off_expiry))
        .route("/jobs/carry-forward-summary", get(jobs::carry_forward_summary))
        // attendance
        .route("/attendance/check-in", post(attendance::check_in))
        .route("/attendance/check-out", post(attendance::check_out))
        .route("/attendance/today", get(attendance::today))
        .route("/attendance/monthly", get(attendance::monthly))
        .route("/attendance/report", get(attendance::report))
        // payroll
        .route(
            "/payroll/components",
            get(payroll::list_components).post(payroll::create_component),
        )
        .route(
            "/payroll/components/:id",
            put(payroll::update_component).delete(payroll::delete_component),
        )
        .route("/payroll/components/:id/toggle", post(payroll::toggle_component))
        .route("/payroll/salaries", post(payroll::create_salary_structure))
        .route("/payroll/salaries/:employee_id", get(payroll::active_salary))
        .route("/payroll/quick-salary", get(payroll::quick_salary))
        .route("/payroll/available-employees", get(payroll::available_employees))
        .route(
            "/payroll/runs",
            get(payroll::list_payroll_runs).post(payroll::create_payroll_run),
        )
        .route(
            "/payroll/runs/:id",
            get(payroll::get_payroll_run).delete(payroll::delete_payroll_run),
        )
        .route("/payroll/runs/:id/process", post(payroll::process_payroll_run))
        .route("/payroll/payslips", get(payroll::list_payslips))
        .route("/payroll/payslips/:id", get(payroll::get_payslip))
        .route("/payroll/payslips/:id/status", post(payroll::update_payslip_status))
        .route("/payroll/payslip-periods", get(payroll::payslip_periods))
        // resignation
        .route(
            "/resignations",
            get(resignations::list_resignations).post(resignations::submit_resignation),
        )
        .route("/resignations/counts", get(resignations::resignation_counts))
        .route("/resignations/:id", get(resignations::resignation_detail))
        .route("/resignations/:id/review", post(resignations::review_resignation))
        .route("/resignations/:id/approve", post(resignations::approve_resignation))
        .route("/resignations/:id/reject", post(resignations::reject_resignation))
        .route("/resignations/:id/withdraw", post(resignations::withdraw_resignation))
        .route("/resignations/:id/complete", post(resignations::complete_resignation))
        .route(
            "/resignations/:id/exit-interview",
            put(resignations::save_exit_interview),
        )
        .route(
            "/resignations/:id/no-due-certificate",
            put(resignations::save_no_due_certificate),
        )
        .route(
            "/resignation-checklist/:item_id",
            put(resignations::update_checklist_item),
        )
        .with_state(state)
}

/// Handler for GET /health.
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Correlation id and timing for one request.
pub(crate) struct RequestLog {
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
}

impl RequestLog {
    /// Opens the log line for `operation`.
    pub(crate) fn start(operation: &'static str) -> Self {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, operation, "Processing request");
        Self {
            correlation_id,
            operation,
            started: Instant::now(),
        }
    }

    /// Unpacks a JSON body, mapping rejections to `400` errors.
    pub(crate) fn body<T>(
        &self,
        payload: Result<Json<T>, JsonRejection>,
    ) -> Result<T, ApiErrorResponse> {
        match payload {
            Ok(Json(body)) => Ok(body),
            Err(rejection) => {
                warn!(
                    correlation_id = %self.correlation_id,
                    operation = self.operation,
                    error = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(rejection.into())
            }
        }
    }

    /// Unpacks a query string, mapping rejections to `400` errors.
    pub(crate) fn query<T>(
        &self,
        query: Result<Query<T>, QueryRejection>,
    ) -> Result<T, ApiErrorResponse> {
        match query {
            Ok(Query(query)) => Ok(query),
            Err(rejection) => {
                warn!(
                    correlation_id = %self.correlation_id,
                    operation = self.operation,
                    error = %rejection.body_text(),
                    "Rejected query string"
                );
                Err(rejection.into())
            }
        }
    }

    /// Renders a service result with `200 OK`.
    pub(crate) fn ok<T: Serialize>(self, result: HrmsResult<T>) -> ApiResult {
        self.finish(StatusCode::OK, result)
    }

    /// Renders a service result with `201 Created`.
    pub(crate) fn created<T: Serialize>(self, result: HrmsResult<T>) -> ApiResult {
        self.finish(StatusCode::CREATED, result)
    }

    /// Renders an empty success as `204 No Content`.
    pub(crate) fn no_content(self, result: HrmsResult<()>) -> ApiResult {
        match result {
            Ok(()) => {
                self.completed();
                Ok(StatusCode::NO_CONTENT.into_response())
            }
            Err(err) => Err(self.failed(err.into())),
        }
    }

    fn finish<T: Serialize>(self, status: StatusCode, result: HrmsResult<T>) -> ApiResult {
        match result {
            Ok(body) => {
                self.completed();
                Ok((
                    status,
                    [(header::CONTENT_TYPE, "application/json")],
                    Json(body),
                )
                    .into_response())
            }
            Err(err) => Err(self.failed(err.into())),
        }
    }

    fn completed(&self) {
        info!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            duration_us = self.started.elapsed().as_micros(),
            "Request completed successfully"
        );
    }

    fn failed(&self, error: ApiErrorResponse) -> ApiErrorResponse {
        warn!(
            correlation_id = %self.correlation_id,
            operation = self.operation,
            status = error.status.as_u16(),
            code = %error.error.code,
            message = %error.error.message,
            "Request failed"
        );
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrmsError;

    #[test]
    fn test_ok_renders_json_with_200() {
        let response = RequestLog::start("test").ok(Ok(vec![1, 2, 3])).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_created_uses_201() {
        let response = RequestLog::start("test").created(Ok("done")).unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_no_content_has_empty_204() {
        let response = RequestLog::start("test").no_content(Ok(())).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_service_error_is_mapped() {
        let result: HrmsResult<()> = Err(HrmsError::not_found("Leave", 4));
        let error = RequestLog::start("test").ok(result).unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error.code, "NOT_FOUND");
    }
}
