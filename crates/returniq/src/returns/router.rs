use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ReturnSubmission;
use super::repository::{AlertPublisher, RepositoryError, ReturnId, ReturnRepository, ReturnStatus};
use super::service::{ReturnsService, ReturnsServiceError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) brand_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/// Router builder exposing intake, analysis, and seller review endpoints.
pub fn returns_router<R, A>(service: Arc<ReturnsService<R, A>>) -> Router
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/returns",
            post(submit_handler::<R, A>).get(list_handler::<R, A>),
        )
        .route("/api/v1/returns/analyze", post(analyze_handler::<R, A>))
        .route(
            "/api/v1/returns/:return_id",
            get(fetch_handler::<R, A>).patch(update_status_handler::<R, A>),
        )
        .with_state(service)
}

fn error_response(error: ReturnsServiceError) -> Response {
    let status = match &error {
        ReturnsServiceError::MissingField(_) => StatusCode::BAD_REQUEST,
        ReturnsServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReturnsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReturnsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReturnsServiceError::Repository(RepositoryError::Unavailable(_))
        | ReturnsServiceError::Alert(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, A>(
    State(service): State<Arc<ReturnsService<R, A>>>,
    axum::Json(submission): axum::Json<ReturnSubmission>,
) -> Response
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.submit(submission).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analyze_handler<R, A>(
    State(service): State<Arc<ReturnsService<R, A>>>,
    axum::Json(submission): axum::Json<ReturnSubmission>,
) -> Response
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.analyze(&submission).await {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<ReturnsService<R, A>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    let brand_id = query.brand_id.as_deref();
    let listed = service
        .list(brand_id)
        .and_then(|returns| Ok((returns, service.stats(brand_id)?)));

    match listed {
        Ok((returns, stats)) => {
            let payload = json!({ "returns": returns, "stats": stats });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R, A>(
    State(service): State<Arc<ReturnsService<R, A>>>,
    Path(return_id): Path<String>,
) -> Response
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.get(&ReturnId(return_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R, A>(
    State(service): State<Arc<ReturnsService<R, A>>>,
    Path(return_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    R: ReturnRepository + 'static,
    A: AlertPublisher + 'static,
{
    let status = match update.status.as_deref().map(str::parse::<ReturnStatus>) {
        Some(Ok(status)) => status,
        _ => {
            let payload = json!({ "error": "Invalid status" });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.update_status(&ReturnId(return_id), status) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}
