//! Resume export: renders a segmented resume as PDF, Markdown or plain text.

pub mod metrics;
pub mod pdf;
pub mod text;

use std::str::FromStr;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::errors::AppError;
use crate::resume::{ResumeDocument, TextDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "tailored-resume.pdf",
            ExportFormat::Markdown => "tailored-resume.md",
            ExportFormat::Text => "tailored-resume.txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(AppError::Validation(format!(
                "Unsupported export format '{other}'. Use pdf, md or txt."
            ))),
        }
    }
}

/// A rendered file ready to be sent as an attachment.
#[derive(Debug)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl IntoResponse for ExportedFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.format.file_name());
        (
            [
                (header::CONTENT_TYPE, self.format.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Renders an already-built document. PDF layout runs on the blocking pool.
pub async fn export_document(
    document: ResumeDocument,
    format: ExportFormat,
) -> Result<ExportedFile, AppError> {
    let bytes = match format {
        ExportFormat::Markdown => text::render_markdown(&document).into_bytes(),
        ExportFormat::Text => text::render_plain_text(&document).into_bytes(),
        ExportFormat::Pdf => tokio::task::spawn_blocking(move || pdf::render_pdf(&document))
            .await
            .map_err(|e| {
                warn!("PDF render task aborted: {e}");
                AppError::Render("PDF rendering failed".to_string())
            })??,
    };

    Ok(ExportedFile { format, bytes })
}

/// Segments `resume_text` and renders it in `format`.
pub async fn export_resume(
    resume_text: &str,
    format: ExportFormat,
    direction: TextDirection,
) -> Result<ExportedFile, AppError> {
    export_document(ResumeDocument::from_text(resume_text, direction), format).await
}
