//! Document upload to plain text

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/extract", get(health).post(extract))
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ExtractedText {
    pub text: String,
}

/// GET /api/extract - Liveness check for the upload endpoint
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        message: "Extract API is up.",
    })
}

fn malformed_upload(err: MultipartError) -> AppError {
    AppError::new(StatusCode::BAD_REQUEST, format!("Malformed upload: {}", err.body_text()))
}

/// POST /api/extract - Extract text from the multipart `file` field
async fn extract(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<ExtractedText>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed_upload)? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(malformed_upload)?;

        let text = state.extractor.extract(&bytes, &mime_type, file_name.as_deref())?;
        info!(
            file = file_name.as_deref().unwrap_or("-"),
            mime = %mime_type,
            chars = text.len(),
            "Extracted document text"
        );
        return Ok(Json(ExtractedText { text }));
    }

    Err(AppError::new(StatusCode::BAD_REQUEST, "No file uploaded"))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use crate::routes::test_support::{app, send};

    const BOUNDARY: &str = "syllabus-boundary";

    fn upload(field: &str, file_name: &str, mime: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {mime}\r\n\r\n{content}\r\n--{b}--\r\n",
            b = BOUNDARY,
        );
        Request::builder()
            .method("POST")
            .uri("/api/extract")
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let request = Request::builder().uri("/api/extract").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Extract API is up.");
    }

    #[tokio::test]
    async fn test_plain_text_upload_returns_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, upload("file", "syllabus.txt", "text/plain", "Week 1: Intro")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Week 1: Intro");
    }

    #[tokio::test]
    async fn test_unsupported_type_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, upload("file", "scan.png", "image/png", "not really a png")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Unsupported file type"));
    }

    #[tokio::test]
    async fn test_truncated_multipart_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"syllabus.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nWeek 1: Intro",
            b = BOUNDARY,
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/extract")
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed upload"));
    }

    #[tokio::test]
    async fn test_missing_file_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, upload("attachment", "syllabus.txt", "text/plain", "Week 1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file uploaded");
    }
}
