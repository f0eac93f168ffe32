//! Axum route handlers for segmenting and exporting resume text.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{export_resume, ExportFormat};
use crate::resume::ResumeDocument;
use crate::tailoring::models::Language;

#[derive(Debug, Deserialize)]
pub struct SectionsRequest {
    pub resume_text: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume_text: String,
    pub format: String,
    #[serde(default)]
    pub language: Language,
}

/// POST /api/v1/resume/sections
///
/// Segments and classifies resume text without rendering it.
pub async fn handle_sections(
    Json(request): Json<SectionsRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let document = ResumeDocument::from_text(&request.resume_text, request.language.direction());
    Ok(Json(document))
}

/// POST /api/v1/resume/export
///
/// Renders resume text as a downloadable PDF, Markdown or plain-text file.
pub async fn handle_export(Json(request): Json<ExportRequest>) -> Result<Response, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("Resume text is empty".to_string()));
    }
    let format: ExportFormat = request.format.parse()?;

    let file = export_resume(&request.resume_text, format, request.language.direction()).await?;
    info!(?format, bytes = file.bytes.len(), "Exported resume");
    Ok(file.into_response())
}
