//! API routes for the schedule parser

pub mod tasks;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload with a larger body limit
        .route(
            "/tasks",
            post(tasks::create_task).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/:id/status", get(tasks::task_status))
        .route("/tasks/:id/result", get(tasks::task_result))
        .route("/tasks/:id/memory", get(tasks::task_memory))
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "session-parser",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Exam and credit schedule workbook parser",
        "endpoints": {
            "POST /api/tasks": "Upload a workbook (multipart field 'file')",
            "GET /api/tasks": "List tasks and queue stats",
            "GET /api/tasks/:id/status": "Task lifecycle status",
            "GET /api/tasks/:id/result": "Parsed schedule document",
            "GET /api/tasks/:id/memory": "Short summary of the parsed schedule"
        }
    }))
}
