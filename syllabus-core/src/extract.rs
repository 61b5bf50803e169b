//! Uploaded document → plain text.

use std::io::{Cursor, Read};

use tracing::debug;

use crate::error::{SyllabusError, SyllabusResult};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

/// Turns a document into text for the resolver.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], mime_type: &str, file_name: Option<&str>) -> SyllabusResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Markdown,
    Docx,
    Pdf,
    Image,
}

impl DocumentKind {
    /// Detect from the MIME type, falling back to the file extension when the
    /// type is missing or generic.
    pub fn detect(mime_type: &str, file_name: Option<&str>) -> Option<Self> {
        let mime = mime_type.split(';').next().unwrap_or_default().trim().to_lowercase();

        let by_mime = match mime.as_str() {
            "text/plain" => Some(DocumentKind::PlainText),
            "text/markdown" | "text/x-markdown" => Some(DocumentKind::Markdown),
            DOCX_MIME => Some(DocumentKind::Docx),
            "application/pdf" => Some(DocumentKind::Pdf),
            m if m.starts_with("image/") => Some(DocumentKind::Image),
            _ => None,
        };

        by_mime.or_else(|| {
            let ext = file_name?.rsplit_once('.')?.1.to_lowercase();
            match ext.as_str() {
                "txt" => Some(DocumentKind::PlainText),
                "md" | "markdown" => Some(DocumentKind::Markdown),
                "docx" => Some(DocumentKind::Docx),
                "pdf" => Some(DocumentKind::Pdf),
                "png" | "jpg" | "jpeg" | "gif" | "webp" | "tif" | "tiff" => Some(DocumentKind::Image),
                _ => None,
            }
        })
    }
}

/// Plain text, Markdown, DOCX and PDF. Images are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], mime_type: &str, file_name: Option<&str>) -> SyllabusResult<String> {
        let kind = DocumentKind::detect(mime_type, file_name)
            .ok_or_else(|| SyllabusError::UnsupportedFormat(mime_type.to_string()))?;
        debug!(?kind, size = bytes.len(), "Extracting text");

        let text = match kind {
            DocumentKind::PlainText | DocumentKind::Markdown => String::from_utf8(bytes.to_vec())
                .map_err(|e| SyllabusError::ExtractionFailed(format!("Text is not valid UTF-8: {}", e)))?,
            DocumentKind::Docx => docx_text(bytes)?,
            DocumentKind::Pdf => pdf_text(bytes)?,
            DocumentKind::Image => {
                return Err(SyllabusError::UnsupportedFormat(format!(
                    "{} (no text extractor for {:?} documents)",
                    mime_type, kind
                )));
            }
        };

        if text.trim().is_empty() {
            return Err(SyllabusError::ExtractionFailed("Document contains no text".to_string()));
        }

        Ok(text)
    }
}

/// Text layer of a PDF. Scanned pages without one come back empty.
fn pdf_text(bytes: &[u8]) -> SyllabusResult<String> {
    // pdf-extract panics on some malformed files instead of returning an error.
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| SyllabusError::ExtractionFailed("PDF parser aborted on a malformed file".to_string()))?;

    result.map_err(|e| SyllabusError::ExtractionFailed(format!("Invalid PDF: {}", e)))
}

/// Paragraph text of a DOCX body, one paragraph per line.
fn docx_text(bytes: &[u8]) -> SyllabusResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SyllabusError::ExtractionFailed(format!("Not a DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| SyllabusError::ExtractionFailed(format!("Missing {}: {}", DOCX_BODY, e)))?
        .read_to_string(&mut xml)?;

    let doc = roxmltree::Document::parse(&xml)
        .map_err(|e| SyllabusError::ExtractionFailed(format!("Invalid document XML: {}", e)))?;

    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "p")
        .map(|p| {
            let mut line = String::new();
            for node in p.descendants() {
                match node.tag_name().name() {
                    "t" => line.push_str(node.text().unwrap_or_default()),
                    "tab" => line.push('\t'),
                    "br" => line.push('\n'),
                    _ => {}
                }
            }
            line
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx(body_xml: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options: zip::write::FileOptions<'_, ()> = zip::write::FileOptions::default();
        zip.start_file(DOCX_BODY, options).unwrap();
        zip.write_all(body_xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_by_mime_then_extension() {
        assert_eq!(DocumentKind::detect("text/plain; charset=utf-8", None), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::detect(DOCX_MIME, None), Some(DocumentKind::Docx));
        assert_eq!(
            DocumentKind::detect("application/octet-stream", Some("Syllabus.DOCX")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::detect("image/png", None), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::detect("application/zip", Some("archive.zip")), None);
    }

    #[test]
    fn test_extracts_plain_text() {
        let text = DocumentExtractor
            .extract(b"Fall 2024\nMW 9:00-10:50am", "text/plain", None)
            .unwrap();

        assert_eq!(text, "Fall 2024\nMW 9:00-10:50am");
    }

    #[test]
    fn test_extracts_docx_paragraphs_as_lines() {
        let bytes = docx(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Fall 2024</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Week 1 (Mon): </w:t></w:r><w:r><w:t>Hawkins v. McGee</w:t></w:r></w:p>
  </w:body>
</w:document>"#,
        );

        let text = DocumentExtractor.extract(&bytes, DOCX_MIME, Some("syllabus.docx")).unwrap();

        assert_eq!(text, "Fall 2024\nWeek 1 (Mon): Hawkins v. McGee");
    }

    #[test]
    fn test_extracts_pdf_text_layer() {
        let bytes = include_bytes!("../testdata/week1.pdf");

        let text = DocumentExtractor.extract(bytes, "application/pdf", Some("syllabus.pdf")).unwrap();

        assert!(text.contains("Week 1") && text.contains("Introduction"), "got {:?}", text);
    }

    #[test]
    fn test_corrupt_pdf_fails_extraction() {
        let result = DocumentExtractor.extract(b"%PDF-1.7 truncated", "application/pdf", None);

        assert!(matches!(result, Err(SyllabusError::ExtractionFailed(_))));
    }

    #[test]
    fn test_rejects_images_and_unknown_types() {
        let image = DocumentExtractor.extract(b"\x89PNG", "image/png", None);
        let unknown = DocumentExtractor.extract(b"\x00\x01", "application/octet-stream", Some("blob.bin"));

        assert!(matches!(image, Err(SyllabusError::UnsupportedFormat(_))));
        assert!(matches!(unknown, Err(SyllabusError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_document_fails_extraction() {
        let result = DocumentExtractor.extract(b"  \n ", "text/plain", None);

        assert!(matches!(result, Err(SyllabusError::ExtractionFailed(_))));
    }

    #[test]
    fn test_corrupt_docx_fails_extraction() {
        let result = DocumentExtractor.extract(b"not a zip", DOCX_MIME, None);

        assert!(matches!(result, Err(SyllabusError::ExtractionFailed(_))));
    }
}
