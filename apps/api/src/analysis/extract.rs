//! Text extraction: turns an uploaded PDF or DOCX buffer into plain text.

use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
use tracing::{debug, warn};

use crate::analysis::error::AnalysisError;

/// Declared kind of an uploaded document, derived from its file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Unknown(String),
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            other => DocumentKind::Unknown(other.to_string()),
        }
    }

    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentKind::Unknown(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Unknown(ext) => ext,
        }
    }
}

/// An uploaded document borrowed for the duration of one extraction call.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    pub bytes: &'a [u8],
    pub kind: &'a DocumentKind,
}

/// Extracts all text from the document in document order.
///
/// Returns `UnsupportedFormat` for unknown kinds and `ExtractionFailure` when the
/// document cannot be read or yields no text at all.
pub fn extract_text(doc: RawDocument<'_>) -> Result<String, AnalysisError> {
    let text = match doc.kind {
        DocumentKind::Pdf => extract_pdf_text(doc.bytes)?,
        DocumentKind::Docx => extract_docx_text(doc.bytes)?,
        DocumentKind::Unknown(ext) => return Err(AnalysisError::UnsupportedFormat(ext.clone())),
    };

    if text.trim().is_empty() {
        return Err(AnalysisError::ExtractionFailure(
            "document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

/// Concatenates per-page text. Pages that fail are logged and skipped.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    let pdf = lopdf::Document::load_mem(bytes)
        .map_err(|e| AnalysisError::ExtractionFailure(format!("malformed PDF: {e}")))?;

    if pdf.is_encrypted() {
        return Err(AnalysisError::ExtractionFailure(
            "PDF is encrypted".to_string(),
        ));
    }

    let pages = pdf.get_pages();
    let mut text = String::new();
    for page_number in pages.keys() {
        match pdf.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => warn!("Skipping PDF page {page_number}: {e}"),
        }
    }

    // lopdf misses text drawn with embedded CID fonts; pdf-extract decodes those.
    if text.trim().is_empty() && !pages.is_empty() {
        match pdf_extract::extract_text_from_mem(bytes) {
            Ok(full) => text = full,
            Err(e) => debug!("pdf-extract fallback failed: {e}"),
        }
    }

    debug!("Extracted {} chars from {} PDF pages", text.len(), pages.len());
    Ok(text)
}

/// Extracts the DOCX body as one blob, one line per paragraph.
fn extract_docx_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| AnalysisError::ExtractionFailure(format!("unreadable DOCX: {e:?}")))?;

    if docx.document.children.is_empty() {
        return Err(AnalysisError::ExtractionFailure(
            "DOCX has no document body".to_string(),
        ));
    }

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => paragraphs.push(paragraph_text(para)),
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    #[allow(irrefutable_let_patterns)]
                    let TableChild::TableRow(row) = row else { continue };
                    for cell in &row.cells {
                        #[allow(irrefutable_let_patterns)]
                        let TableRowChild::TableCell(cell) = cell else { continue };
                        for content in &cell.children {
                            if let TableCellContent::Paragraph(para) = content {
                                paragraphs.push(paragraph_text(para));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    collect_paragraph_children(&para.children, &mut out);
    out
}

fn collect_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}
