//! Axum route handler for the tailoring pipeline.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{ensure_enough_text, extract_text};
use crate::resume::ResumeDocument;
use crate::state::AppState;
use crate::tailoring::models::{GenerationOutput, Language};
use crate::tailoring::pipeline::{run_pipeline, TailoringResult};
use crate::usage::{client_id_from_headers, UsageSnapshot};

/// Minimum job description length, in trimmed characters.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub data: GenerationOutput,
    pub document: ResumeDocument,
    pub usage: UsageSnapshot,
}

struct UploadedFile {
    name: String,
    bytes: Bytes,
}

#[derive(Default)]
struct ProcessForm {
    file: Option<UploadedFile>,
    job_description: Option<String>,
    language: Option<String>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("Malformed form data: {}", e.body_text()))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ProcessForm, AppError> {
    let mut form = ProcessForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile { name, bytes });
            }
            Some("jobDescription") => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("language") => {
                form.language = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Human-readable upload limit for error messages.
fn format_upload_limit(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

async fn tailor_upload(
    state: &AppState,
    file: UploadedFile,
    job_description: &str,
    language: Language,
) -> Result<TailoringResult, AppError> {
    let cv_text = extract_text(file.bytes, &file.name).await?;
    ensure_enough_text(&cv_text)?;
    run_pipeline(state.tailor.as_ref(), &cv_text, job_description, language).await
}

/// POST /api/v1/process
///
/// Multipart form: `file` (PDF, DOCX or text CV), `jobDescription`, optional `language`.
/// A run is reserved atomically before any model call and refunded if the
/// run fails.
pub async fn handle_process(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let client_id = client_id_from_headers(&headers)?;
    let record = state.usage.load(client_id).await?;
    if !record.can_process() {
        return Err(AppError::QuotaExhausted { tier: record.tier });
    }

    let form = read_form(multipart).await?;

    let file = form
        .file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let max = state.config.max_upload_bytes;
    if file.bytes.len() > max {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}.",
            format_upload_limit(max)
        )));
    }

    let job_description = form.job_description.unwrap_or_default();
    if job_description.trim().chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(
            "Job description too short. Please provide more details.".to_string(),
        ));
    }

    let language: Language = form.language.as_deref().unwrap_or_default().parse()?;

    let record = state.usage.try_reserve(client_id).await?;
    info!(
        %client_id,
        file = %file.name,
        %language,
        uses = record.uses,
        "Starting tailoring run"
    );

    let result = match tailor_upload(&state, file, &job_description, language).await {
        Ok(result) => result,
        Err(e) => {
            if let Err(release_err) = state.usage.release(client_id).await {
                warn!(%client_id, "Could not refund reserved run: {release_err}");
            }
            return Err(e);
        }
    };

    Ok(Json(ProcessResponse {
        success: true,
        data: result.data,
        document: result.document,
        usage: UsageSnapshot::from(&record),
    }))
}
