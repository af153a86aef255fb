//! Employee, location and celebration endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Datelike;

use crate::api::request::{InactiveQuery, WishQuery, YearQuery};
use crate::api::state::AppState;
use crate::services::balances;
use crate::services::catalog::{self, NewLocation};
use crate::services::employees::{self, EmployeeFilter, EmployeeUpdate, NewEmployee, NewWish};

use super::{ApiResult, RequestLog};

/// Handler for POST /employees.
///
/// Creates the employee and the opening leave balances in one transaction.
pub(super) async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_employee");
    let input = log.body(payload)?;
    let result =
        employees::create_employee(state.db(), state.config(), input, state.now()).await;
    log.created(result)
}

/// Handler for GET /employees.
pub(super) async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<EmployeeFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_employees");
    let filter = log.query(query)?;
    let today = state.today();
    let result = employees::list_employees(state.db(), &filter)
        .await
        .map(|list| {
            list.into_iter()
                .map(|employee| employees::profile(employee, today))
                .collect::<Vec<_>>()
        });
    log.ok(result)
}

/// Handler for GET /employees/:id.
pub(super) async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult {
    let log = RequestLog::start("get_employee");
    log.ok(employees::get_employee(state.db(), id, state.today()).await)
}

/// Handler for PUT /employees/:id.
pub(super) async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("update_employee");
    let update = log.body(payload)?;
    let result =
        employees::update_employee(state.db(), state.config(), id, update, state.now()).await;
    log.ok(result)
}

/// Handler for GET /employees/:id/balances.
pub(super) async fn employee_balances(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("employee_balances");
    let year = log.query(query)?.year.unwrap_or(state.today().year());
    log.ok(balances::employee_balances(state.db(), id, year).await)
}

/// Handler for GET /celebrations.
pub(super) async fn celebrations(State(state): State<AppState>) -> ApiResult {
    let log = RequestLog::start("celebrations");
    log.ok(employees::celebrations(state.db(), state.today()).await)
}

/// Handler for POST /celebrations/wishes.
pub(super) async fn send_celebration_wish(
    State(state): State<AppState>,
    payload: Result<Json<NewWish>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("send_celebration_wish");
    let input = log.body(payload)?;
    log.created(employees::send_celebration_wish(state.db(), input, state.now()).await)
}

/// Handler for GET /employees/:id/wishes.
pub(super) async fn celebration_wishes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<WishQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("celebration_wishes");
    let kind = log.query(query)?.wish_type;
    log.ok(employees::celebration_wishes(state.db(), id, kind).await)
}

/// Handler for GET /locations.
pub(super) async fn list_locations(
    State(state): State<AppState>,
    query: Result<Query<InactiveQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_locations");
    let query = log.query(query)?;
    log.ok(catalog::list_locations(state.db(), !query.include_inactive).await)
}

/// Handler for POST /locations.
pub(super) async fn create_location(
    State(state): State<AppState>,
    payload: Result<Json<NewLocation>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("create_location");
    let input = log.body(payload)?;
    log.created(catalog::create_location(state.db(), input).await)
}
