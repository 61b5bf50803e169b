//! Google Calendar endpoints for the configured account

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use syllabus_core::Task;
use syllabus_core::event::CalendarEvent;
use syllabus_provider_google::with_saved_session;
use tracing::info;

use crate::routes::AppError;
use crate::state::{AppState, CalendarAccess};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/calendar", get(upcoming_events).post(create_events))
}

fn calendar_access(state: &AppState) -> Result<Arc<CalendarAccess>, AppError> {
    state
        .calendar
        .clone()
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "No calendar account configured"))
}

/// GET /api/calendar - Next upcoming events on the calendar
async fn upcoming_events(State(state): State<AppState>) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let access = calendar_access(&state)?;
    let service = &access.service;

    let events = with_saved_session(&access.sessions, &access.account, |mut session| async move {
        let result = service.upcoming(&mut session).await;
        (session, result)
    })
    .await?;

    info!(account = %access.account, count = events.len(), "Listed upcoming events");
    Ok(Json(events))
}

/// POST /api/calendar - Create one event per task
async fn create_events(
    State(state): State<AppState>,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let access = calendar_access(&state)?;
    let service = &access.service;
    let batch = &tasks;

    let events = with_saved_session(&access.sessions, &access.account, |mut session| async move {
        let result = service.push_tasks(&mut session, batch).await;
        (session, result)
    })
    .await?;

    info!(account = %access.account, count = events.len(), "Pushed tasks to calendar");
    Ok(Json(events))
}
