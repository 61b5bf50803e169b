//! Saved tasks, scoped to the caller identified by `x-user-id`

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
};
use syllabus_core::{StoredTask, Task};
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

const USER_HEADER: &str = "x-user-id";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(save_tasks))
        .route("/api/tasks/{id}", delete(delete_task))
}

fn owner(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "Missing x-user-id header"))
}

/// GET /api/tasks - The caller's saved tasks
async fn list_tasks(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Vec<StoredTask>>, AppError> {
    let owner = owner(&headers)?;
    let tasks = state.store.list(&owner)?;
    info!(owner = %owner, count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

/// POST /api/tasks - Save tasks for the caller
async fn save_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(tasks): Json<Vec<Task>>,
) -> Result<Json<Vec<StoredTask>>, AppError> {
    let owner = owner(&headers)?;
    let saved = state.store.save(&tasks, &owner)?;
    info!(owner = %owner, count = saved.len(), "Saved tasks");
    Ok(Json(saved))
}

/// DELETE /api/tasks/{id} - Delete one of the caller's tasks
async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let owner = owner(&headers)?;
    state.store.delete(id, &owner)?;
    info!(owner = %owner, id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    fn request(method: &str, uri: &str, user: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, request("GET", "/api/tasks", None, None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing x-user-id header");
    }

    #[tokio::test]
    async fn test_tasks_are_scoped_to_their_owner() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let tasks = json!([
            { "title": "Midterm Exam", "date": "2024-10-15" },
            { "title": "Paper due", "date": "2024-11-01", "start_time": "17:00" }
        ]);
        let (status, saved) = send(&app, request("POST", "/api/tasks", Some("alice"), Some(tasks))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved[0]["user_id"], "alice");
        assert_eq!(saved[1]["start_time"], "17:00");

        let (_, theirs) = send(&app, request("GET", "/api/tasks", Some("bob"), None)).await;
        assert_eq!(theirs, json!([]));

        let (_, mine) = send(&app, request("GET", "/api/tasks", Some("alice"), None)).await;
        assert_eq!(mine.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_only_touches_own_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let tasks = json!([{ "title": "Final Exam", "date": "2024-12-10" }]);
        let (_, saved) = send(&app, request("POST", "/api/tasks", Some("alice"), Some(tasks))).await;
        let uri = format!("/api/tasks/{}", saved[0]["id"]);

        let (status, _) = send(&app, request("DELETE", &uri, Some("bob"), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, mine) = send(&app, request("GET", "/api/tasks", Some("alice"), None)).await;
        assert_eq!(mine.as_array().unwrap().len(), 1);

        send(&app, request("DELETE", &uri, Some("alice"), None)).await;
        let (_, mine) = send(&app, request("GET", "/api/tasks", Some("alice"), None)).await;
        assert_eq!(mine, json!([]));
    }
}
