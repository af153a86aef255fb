//! Employee notice endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::request::ActorQuery;
use crate::api::state::AppState;
use crate::services::notices::{self, NewNotice, NoticeFilter};

use super::{ApiResult, RequestLog};

/// Handler for GET /notices.
///
/// Returns the notices with warning, appreciation and other counts.
pub(super) async fn list_notices(
    State(state): State<AppState>,
    query: Result<Query<NoticeFilter>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("list_notices");
    let filter = log.query(query)?;
    log.ok(notices::list_notices(state.db(), &filter).await)
}

/// Handler for POST /notices.
pub(super) async fn issue_notice(
    State(state): State<AppState>,
    payload: Result<Json<NewNotice>, JsonRejection>,
) -> ApiResult {
    let log = RequestLog::start("issue_notice");
    let input = log.body(payload)?;
    log.created(notices::issue_notice(state.db(), input, state.now()).await)
}

/// Handler for DELETE /notices/:id?actor_id=.
pub(super) async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    query: Result<Query<ActorQuery>, QueryRejection>,
) -> ApiResult {
    let log = RequestLog::start("delete_notice");
    let actor = log.query(query)?.actor_id;
    log.no_content(notices::delete_notice(state.db(), id, actor).await)
}
