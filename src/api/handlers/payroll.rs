//! Salary component, salary structure, payroll run and payslip endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::{
    ActorQuery, ActorRequest, EmployeeQuery, InactiveQuery, PayslipStatusRequest,
    QuickSalaryQuery,
};
use crate::api::state::AppState;
use crate::error::HrmsError;
use crate::rules::quick_salary as quick_salary_breakdown;
use crate::services::payroll::{
    self, NewPayrollRun, NewSalaryComponent, NewSalaryStructure, PayslipFilter,
    SalaryComponentUpdate,
};

use super::{ApiResult, RequestLog};

/// Handler for GET /payroll/components.
pub(super) async fn list_components(
    State(state): State<AppState>,
    query: Result<Query<InactiveQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_components");
    let query = log.query(query)?;
    log.ok(payroll::list_components(state.db(), query.include_inactive).await)
}

/// Handler for POST /payroll/components.
pub(super) async fn create_component(
    State(state): State<AppState>,
    payload: Result<Json<NewSalaryComponent>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_component");
    let input = log.body(payload)?;
    log.created(payroll::create_component(state.db(), input).await)
}

/// Handler for PUT /payroll/components/:id.
pub(super) async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<SalaryComponentUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_component");
    let update = log.body(payload)?;
    log.ok(payroll::update_component(state.db(), id, update).await)
}

/// Handler for POST /payroll/components/:id/toggle.
pub(super) async fn toggle_component(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("toggle_component");
    log.ok(payroll::toggle_component(state.db(), id).await)
}

/// Handler for DELETE /payroll/components/:id.
pub(super) async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("delete_component");
    log.no_content(payroll::delete_component(state.db(), id).await)
}

/// Handler for POST /payroll/salaries.
pub(super) async fn create_salary_structure(
    State(state): State<AppState>,
    payload: Result<Json<NewSalaryStructure>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_salary_structure");
    let input = log.body(payload)?;
    log.created(payroll::create_salary_structure(state.db(), input, state.now()).await)
}

/// Handler for GET /payroll/salaries/:employee_id.
pub(super) async fn active_salary(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("active_salary");
    let result = payroll::active_salary(state.db(), employee_id)
        .await
        .and_then(|salary| {
            salary.ok_or_else(|| HrmsError::not_found("Active salary structure", employee_id))
        });
    log.ok(result)
}

/// Handler for GET /payroll/quick-salary.
pub(super) async fn quick_salary(
    State(state): State<AppState>,
    query: Result<Query<QuickSalaryQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("quick_salary");
    let query = log.query(query)?;
    log.ok(Ok(quick_salary_breakdown(query.basic, state.config().payroll())))
}

/// Handler for GET /payroll/available-employees.
pub(super) async fn available_employees(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("available_employees");
    log.ok(payroll::available_employees(state.db()).await)
}

/// Handler for GET /payroll/runs.
pub(super) async fn list_payroll_runs(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("list_payroll_runs");
    log.ok(payroll::list_payroll_runs(state.db()).await)
}

/// Handler for POST /payroll/runs.
pub(super) async fn create_payroll_run(
    State(state): State<AppState>,
    payload: Result<Json<NewPayrollRun>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_payroll_run");
    let input = log.body(payload)?;
    log.created(payroll::create_payroll_run(state.db(), input, state.now()).await)
}

/// Handler for GET /payroll/runs/:id.
pub(super) async fn get_payroll_run(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("get_payroll_run");
    log.ok(payroll::get_payroll_run(state.db(), id).await)
}

/// Handler for DELETE /payroll/runs/:id?actor_id=.
pub(super) async fn delete_payroll_run(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_payroll_run");
    let query = log.query(query)?;
    log.no_content(payroll::delete_payroll_run(state.db(), id, query.actor_id).await)
}

/// Handler for POST /payroll/runs/:id/process.
///
/// Generates one payslip per selected employee; employees without an active
/// salary structure or with an existing payslip are reported as skipped.
pub(super) async fn process_payroll_run(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("process_payroll_run");
    let request = log.body(payload)?;
    let result =
        payroll::process_payroll_run(state.db(), id, request.actor_id, state.now()).await;
    log.ok(result)
}

/// Handler for GET /payroll/payslips.
pub(super) async fn list_payslips(
    State(state): State<AppState>,
    query: Result<Query<PayslipFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_payslips");
    let filter = log.query(query)?;
    log.ok(payroll::list_payslips(state.db(), &filter).await)
}

/// Handler for GET /payroll/payslips/:id.
pub(super) async fn get_payslip(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let log = RequestLog::start("get_payslip");
    log.ok(payroll::get_payslip(state.db(), id).await)
}

/// Handler for POST /payroll/payslips/:id/status.
pub(super) async fn update_payslip_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<PayslipStatusRequest>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_payslip_status");
    let request = log.body(payload)?;
    let result =
        payroll::update_payslip_status(state.db(), id, request.status, request.actor_id).await;
    log.ok(result)
}

/// Handler for GET /payroll/payslip-periods.
pub(super) async fn payslip_periods(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("payslip_periods");
    let query = log.query(query)?;
    log.ok(payroll::payslip_periods(state.db(), query.employee_id).await)
}
