use super::{ApiError, AppState};
use crate::defaults;
use crate::error::RecapError;
use crate::export;
use crate::job::types::{Job, JobFlags, JobStatus};
use crate::job::JobRequest;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Per-request feature flag overrides; unset flags fall back to the
/// configured defaults.
#[derive(Debug, Deserialize, Default)]
pub struct FlagParams {
    summary: Option<bool>,
    dialogue: Option<bool>,
    actions: Option<bool>,
}

impl FlagParams {
    fn resolve(self, defaults: JobFlags) -> JobFlags {
        JobFlags {
            summary: self.summary.unwrap_or(defaults.summary),
            dialogue: self.dialogue.unwrap_or(defaults.dialogue),
            actions: self.actions.unwrap_or(defaults.actions),
        }
    }
}

/// Reject files whose extension marks them as something other than audio.
///
/// Decoding problems remain the collaborators' concern; this is only the
/// cheap reject of obviously wrong uploads before a job exists.
fn validate_extension(filename: &str) -> Result<(), RecapError> {
    let accepted = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            defaults::ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        });
    if accepted {
        Ok(())
    } else {
        Err(RecapError::UnsupportedFormat {
            filename: filename.to_string(),
        })
    }
}

pub async fn create_job(
    State(state): State<AppState>,
    Query(params): Query<FlagParams>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            validate_extension(&filename)?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
            upload = Some((filename, bytes));
        }
    }
    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("multipart field `file` is required"))?;

    let spool = tempfile::NamedTempFile::new().map_err(RecapError::from)?;
    tokio::fs::write(spool.path(), &bytes)
        .await
        .map_err(RecapError::from)?;
    let audio = spool.into_temp_path();

    let flags = params.resolve(state.default_flags);

    // Reserve before registering: a full queue leaves no trace of the job.
    let slot = state.queue.reserve()?;
    let id = Uuid::new_v4();
    let job = state.store.create(id);
    slot.send(JobRequest { id, audio, flags });

    tracing::info!(job = %id, %filename, ?flags, "job accepted");
    Ok((StatusCode::ACCEPTED, Json(job)))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let job = state.store.get(id).ok_or(RecapError::JobNotFound {
        id: id.to_string(),
    })?;
    Ok(Json(job))
}

pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    state.store.request_cancel(id)?;
    let job = state.store.get(id).ok_or(RecapError::JobNotFound {
        id: id.to_string(),
    })?;
    tracing::info!(job = %id, "cancellation requested");
    Ok(Json(job))
}

pub async fn export_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.store.get(id).ok_or(RecapError::JobNotFound {
        id: id.to_string(),
    })?;
    if job.status != JobStatus::Completed {
        return Err(ApiError::conflict("Job is not completed"));
    }
    let markdown = export::recap_to_markdown(&job.result.unwrap_or_default());
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
