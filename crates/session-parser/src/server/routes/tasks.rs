//! Task endpoints: upload, status, result and memory

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::processing::{JobRecord, JobStatus, QueueStats};
use crate::server::state::AppState;
use crate::types::{ScheduleDocument, ScheduleMemory};

/// Multipart field carrying the workbook
pub const FILE_FIELD: &str = "file";

/// Response to an accepted upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    pub task_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

/// Task status snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    pub task_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl From<JobRecord> for TaskStatusResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            task_id: job.id,
            status: job.status,
            created_at: job.created_at,
            started_at: job.started_at,
            finished_at: job.finished_at,
            error: job.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMemoryResponse {
    pub task_id: Uuid,
    pub memory: ScheduleMemory,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskStatusResponse>,
    pub stats: QueueStats,
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TaskCreated>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, data) = upload.ok_or_else(|| Error::validation("File is required"))?;
    tracing::info!("Received upload '{}' ({} bytes)", file_name, data.len());

    let job = state.orchestrator().submit(&data, &file_name).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(TaskCreated {
            task_id: job.id,
            status: job.status,
            created_at: job.created_at,
        }),
    ))
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Json<TaskListResponse> {
    let orchestrator = state.orchestrator();
    Json(TaskListResponse {
        tasks: orchestrator.list().into_iter().map(Into::into).collect(),
        stats: orchestrator.stats(),
    })
}

/// GET /api/tasks/:id/status
pub async fn task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskStatusResponse>> {
    let job = state.orchestrator().status(parse_task_id(&id)?)?;
    Ok(Json(job.into()))
}

/// GET /api/tasks/:id/result
pub async fn task_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleDocument>> {
    let document = state.orchestrator().result(parse_task_id(&id)?).await?;
    Ok(Json(document))
}

/// GET /api/tasks/:id/memory
pub async fn task_memory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskMemoryResponse>> {
    let task_id = parse_task_id(&id)?;
    let memory = state.orchestrator().memory(task_id).await?;
    Ok(Json(TaskMemoryResponse { task_id, memory }))
}

/// A malformed id names no task
fn parse_task_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::JobNotFound(Uuid::nil()))
}
