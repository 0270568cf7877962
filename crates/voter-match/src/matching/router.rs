use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::directory::{CandidateStore, IssueStore};
use super::guard::MatchRequest;
use super::service::{MatchService, MatchServiceError};

/// Query string accepted by the issue listing.
#[derive(Debug, Default, Deserialize)]
pub struct IssuesQuery {
    #[serde(default)]
    pub region: Option<String>,
}

/// Router builder exposing the issue listing and candidate matching endpoints.
pub fn match_router<I, C>(service: Arc<MatchService<I, C>>) -> Router
where
    I: IssueStore + 'static,
    C: CandidateStore + 'static,
{
    Router::new()
        .route("/api/v1/issues", get(issues_handler::<I, C>))
        .route("/api/v1/match-candidates", post(match_handler::<I, C>))
        .with_state(service)
}

pub(crate) async fn issues_handler<I, C>(
    State(service): State<Arc<MatchService<I, C>>>,
    Query(query): Query<IssuesQuery>,
) -> Response
where
    I: IssueStore + 'static,
    C: CandidateStore + 'static,
{
    match service.issues(query.region.as_deref()) {
        Ok(issues) => {
            let payload = json!({ "success": true, "issues": issues });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn match_handler<I, C>(
    State(service): State<Arc<MatchService<I, C>>>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Response
where
    I: IssueStore + 'static,
    C: CandidateStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.match_candidates(request) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Unreadable bodies keep the `{success, error}` shape instead of axum's plain-text rejection.
fn rejection_response(rejection: JsonRejection) -> Response {
    debug!(status = %rejection.status(), "rejected match request body");
    let payload = json!({
        "success": false,
        "error": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_response(err: MatchServiceError) -> Response {
    let status = match err {
        MatchServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        MatchServiceError::Directory(_) => {
            warn!(error = %err, "directory lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "success": false,
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
