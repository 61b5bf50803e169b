//! Syllabus text to tasks

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use syllabus_core::Task;
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/create-events", post(create_events))
}

#[derive(Deserialize)]
pub struct CreateEventsRequest {
    pub text: String,
}

/// POST /api/create-events - Resolve syllabus text into dated tasks
async fn create_events(
    State(state): State<AppState>,
    Json(request): Json<CreateEventsRequest>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.resolver.resolve(&request.text);
    info!(count = tasks.len(), "Resolved syllabus tasks");
    Ok(Json(tasks))
}
