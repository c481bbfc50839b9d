use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PlacementId, PlacementStatus, Program};
use super::intake::PlacementSubmission;
use super::repository::{AlertPublisher, PlacementRepository, RepositoryError};
use super::service::{PlacementService, PlacementServiceError, SelectionError};

/// Router builder exposing HTTP endpoints for intake, ranking, and
/// selection.
pub fn placement_router<R, A>(service: Arc<PlacementService<R, A>>) -> Router
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/enrollment/placements", post(submit_handler::<R, A>))
        .route(
            "/api/v1/enrollment/placements/:placement_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/placements/:placement_id/recommendations",
            post(recommend_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/placements/:placement_id/selection",
            post(select_handler::<R, A>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, A>(
    State(service): State<Arc<PlacementService<R, A>>>,
    axum::Json(submission): axum::Json<PlacementSubmission>,
) -> Response
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(PlacementServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "placement already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<PlacementService<R, A>>>,
    Path(placement_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = PlacementId(placement_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(PlacementServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "placement_id": id.0,
                "status": PlacementStatus::Submitted.label(),
                "rationale": "pending recommendation",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn recommend_handler<R, A>(
    State(service): State<Arc<PlacementService<R, A>>>,
    Path(placement_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = PlacementId(placement_id);
    match service.recommend(&id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(PlacementServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "placement not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SelectionRequest {
    pub(crate) program: String,
}

pub(crate) async fn select_handler<R, A>(
    State(service): State<Arc<PlacementService<R, A>>>,
    Path(placement_id): Path<String>,
    axum::Json(request): axum::Json<SelectionRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = PlacementId(placement_id);
    let Some(program) = Program::from_code(&request.program) else {
        let payload = json!({
            "error": format!("unknown program code '{}'", request.program),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.select(&id, program) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(PlacementServiceError::Selection(SelectionError::NotYetRecommended)) => {
            let payload = json!({
                "error": SelectionError::NotYetRecommended.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(PlacementServiceError::Selection(error @ SelectionError::NotRecommended(_))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PlacementServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "placement not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
