//! Text extraction from uploaded CV files.
//!
//! PDF and DOCX parsing are CPU-bound and run on the blocking pool. A parser
//! panic on a malformed file surfaces as an unreadable-file error, not a crash.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::errors::AppError;

/// Minimum amount of text (trimmed, in characters) a CV must yield.
pub const MIN_CV_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
    PlainText,
}

impl SourceFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(SourceFormat::Pdf),
            "docx" => Some(SourceFormat::Docx),
            "txt" | "md" => Some(SourceFormat::PlainText),
            _ => None,
        }
    }
}

/// Extracts raw text from an uploaded file.
pub async fn extract_text(bytes: Bytes, filename: &str) -> Result<String, AppError> {
    let format = SourceFormat::from_filename(filename).ok_or_else(|| {
        AppError::Validation("Unsupported file type. Please upload a PDF, DOCX or text file.".to_string())
    })?;

    let text = match format {
        SourceFormat::Pdf => extract_pdf(bytes).await?,
        SourceFormat::Docx => extract_docx(bytes).await?,
        SourceFormat::PlainText => String::from_utf8_lossy(&bytes).into_owned(),
    };

    debug!(filename, chars = text.chars().count(), "Extracted CV text");
    Ok(text)
}

async fn extract_pdf(bytes: Bytes) -> Result<String, AppError> {
    let joined =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read the PDF file".to_string(),
            ))
        }
        Err(e) => {
            warn!("PDF extraction aborted: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read the PDF file".to_string(),
            ))
        }
    }
}

#[derive(Debug, Error)]
enum DocxError {
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Main body part of a WordprocessingML package.
const DOCX_DOCUMENT_PART: &str = "word/document.xml";

async fn extract_docx(bytes: Bytes) -> Result<String, AppError> {
    let joined = tokio::task::spawn_blocking(move || docx_text(&bytes)).await;

    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("DOCX extraction failed: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read the DOCX file".to_string(),
            ))
        }
        Err(e) => {
            warn!("DOCX extraction aborted: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read the DOCX file".to_string(),
            ))
        }
    }
}

fn docx_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_DOCUMENT_PART)?
        .read_to_string(&mut xml)?;
    document_xml_text(&xml)
}

/// One output line per `w:p`. Text comes from `w:t` runs only; `w:tab` and
/// `w:br` become a tab and a line break.
fn document_xml_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Rejects extractions too short to describe a career.
pub fn ensure_enough_text(text: &str) -> Result<(), AppError> {
    if text.trim().chars().count() < MIN_CV_TEXT_CHARS {
        return Err(AppError::Validation(
            "Could not extract enough text from the CV. Please check the file.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use zip::write::FileOptions;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Cohen</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>EXPERIENCE</w:t></w:r></w:p>
    <w:p><w:r><w:t>Acme &amp; Co | Engineer</w:t><w:tab/><w:t>2020</w:t></w:r></w:p>
    <w:p><w:r><w:instrText>PAGE</w:instrText><w:t>- Shipped</w:t><w:br/><w:t>billing</w:t></w:r></w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#;

    fn docx_bytes(parts: &[(&str, &str)]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_document_xml_paragraphs_and_runs() {
        let text = document_xml_text(DOCUMENT_XML).unwrap();
        assert_eq!(
            text,
            "Jane Cohen\nSenior Engineer\n\nEXPERIENCE\nAcme & Co | Engineer\t2020\n- Shipped\nbilling"
        );
    }

    #[tokio::test]
    async fn test_docx_upload_is_extracted() {
        let bytes = docx_bytes(&[
            ("[Content_Types].xml", "<Types/>"),
            (DOCX_DOCUMENT_PART, DOCUMENT_XML),
        ]);
        let text = extract_text(bytes, "Resume.DOCX").await.unwrap();
        assert!(text.starts_with("Jane Cohen\nSenior Engineer\n"));

        let sections = crate::resume::segment(&text);
        assert_eq!(sections[1].heading, "EXPERIENCE");
    }

    #[tokio::test]
    async fn test_docx_without_document_part_is_unprocessable() {
        let bytes = docx_bytes(&[("word/styles.xml", "<w:styles/>")]);
        let err = extract_text(bytes, "cv.docx").await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_garbage_docx_is_unprocessable() {
        let err = extract_text(Bytes::from_static(b"not a zip archive"), "cv.docx")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_source_format_from_filename() {
        assert_eq!(SourceFormat::from_filename("cv.pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_filename("CV.PDF"), Some(SourceFormat::Pdf));
        assert_eq!(
            SourceFormat::from_filename("notes.v2.txt"),
            Some(SourceFormat::PlainText)
        );
        assert_eq!(SourceFormat::from_filename("cv.docx"), Some(SourceFormat::Docx));
        assert_eq!(SourceFormat::from_filename("cv.doc"), None);
        assert_eq!(SourceFormat::from_filename("README"), None);
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let text = extract_text(Bytes::from_static(b"Jane Cohen\nSKILLS\nRust"), "cv.txt")
            .await
            .unwrap();
        assert_eq!(text, "Jane Cohen\nSKILLS\nRust");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let text = extract_text(Bytes::from_static(b"Jane \xff Cohen"), "cv.md")
            .await
            .unwrap();
        assert!(text.starts_with("Jane "));
        assert!(text.ends_with(" Cohen"));
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_validation_error() {
        let err = extract_text(Bytes::from_static(b"\xd0\xcf\x11\xe0"), "cv.doc")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_unprocessable() {
        let err = extract_text(Bytes::from_static(b"definitely not a pdf"), "cv.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn test_ensure_enough_text() {
        assert!(ensure_enough_text("short").is_err());
        assert!(ensure_enough_text(&"x".repeat(MIN_CV_TEXT_CHARS)).is_ok());
        let padded = format!("   {}   ", "x".repeat(MIN_CV_TEXT_CHARS - 1));
        assert!(ensure_enough_text(&padded).is_err());
    }
}
