//! `/api` routes.

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tracing::info;

use crate::metrics::latest_metrics;
use crate::services::{Action, ServiceError};
use crate::state::AppState;
use crate::tasks::TaskError;
use crate::types::{Metrics, NewTaskRequest, ServiceActionRequest, ServiceInfo, Task};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("error performing action '{action}' on service '{name}': {source}")]
    Service {
        action: String,
        name: String,
        source: ServiceError,
    },
    #[error(transparent)]
    Task(#[from] TaskError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service {
                source: ServiceError::UnknownAction(_),
                ..
            } => StatusCode::NOT_IMPLEMENTED,
            ApiError::Service { .. } => StatusCode::BAD_REQUEST,
            ApiError::Task(TaskError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Task(TaskError::EmptyDescription) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("error decoding request body: {}", rejection.body_text()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/metrics", get(metrics))
        .route("/api/services", get(list_services).post(service_action))
        .route(
            "/api/tasks",
            get(list_tasks).post(create_task).delete(delete_task),
        )
        .with_state(state)
}

async fn metrics(State(state): State<AppState>) -> Json<Metrics> {
    Json(latest_metrics(&state).await)
}

async fn list_services(State(state): State<AppState>) -> Json<BTreeMap<String, ServiceInfo>> {
    Json(state.services.list().await)
}

async fn service_action(
    State(state): State<AppState>,
    body: Result<Json<ServiceActionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body.map_err(bad_body)?;
    let wrap = |source: ServiceError| ApiError::Service {
        action: req.action.clone(),
        name: req.name.clone(),
        source,
    };
    let action: Action = req.action.parse().map_err(wrap)?;
    state.services.perform(&req.name, action).await.map_err(wrap)?;
    info!(service = %req.name, action = %req.action, "service action accepted");
    Ok(StatusCode::ACCEPTED)
}

async fn list_tasks(State(state): State<AppState>) -> Json<BTreeMap<u64, Task>> {
    Json(state.tasks.list().await)
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(req) = body.map_err(bad_body)?;
    let task = state.tasks.submit(&req.description, req.run_time).await?;
    info!(id = task.id, run_time = %task.run_time, "task scheduled");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn delete_task(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<StatusCode, ApiError> {
    let id = params
        .get("id")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| ApiError::BadRequest("missing or invalid task id".into()))?;
    state.tasks.delete(id).await?;
    info!(id, "task removed");
    Ok(StatusCode::NO_CONTENT)
}
