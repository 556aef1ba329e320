use std::collections::BTreeMap;

use log::debug;
use lopdf::{Document, Object, ObjectId};

use crate::error::ExtractionError;

/// A paged document that exposes positioned text runs per page
pub trait PagedDocument {
    fn page_count(&self) -> usize;

    /// Text runs on the page at `index` (zero-based), in reading order
    fn page_runs(&self, index: usize) -> Result<Vec<String>, ExtractionError>;
}

/// PDF document parsed with lopdf
pub struct PdfDocument {
    document: Document,
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let document = Document::load_mem(bytes)?;
        // get_pages is keyed by 1-based page number, already in document order
        let pages = document.get_pages().into_values().collect();

        Ok(PdfDocument { document, pages })
    }
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_runs(&self, index: usize) -> Result<Vec<String>, ExtractionError> {
        let page_id = *self
            .pages
            .get(index)
            .ok_or(ExtractionError::PageOutOfRange(index))?;

        let encodings: BTreeMap<Vec<u8>, &str> = self
            .document
            .get_page_fonts(page_id)
            .into_iter()
            .map(|(name, font)| (name, font.get_font_encoding()))
            .collect();
        let content = self.document.get_and_decode_page_content(page_id)?;

        let mut encoding = None;
        let mut runs = Vec::new();
        for operation in &content.operations {
            match operation.operator.as_str() {
                "Tf" => {
                    encoding = operation
                        .operands
                        .first()
                        .and_then(|font| font.as_name().ok())
                        .and_then(|font| encodings.get(font).copied());
                }
                // Every show operator is its own run
                "Tj" | "TJ" | "'" | "\"" => {
                    let mut run = String::new();
                    collect_shown_text(&mut run, encoding, &operation.operands);
                    let run = run.trim();
                    if !run.is_empty() {
                        runs.push(run.to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(runs)
    }
}

fn collect_shown_text(run: &mut String, encoding: Option<&str>, operands: &[Object]) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => run.push_str(&Document::decode_text(encoding, bytes)),
            Object::Array(items) => collect_shown_text(run, encoding, items),
            // TJ kerning wider than a tenth of an em reads as a word gap
            Object::Integer(offset) if *offset < -100 => run.push(' '),
            Object::Real(offset) if *offset < -100.0 => run.push(' '),
            _ => {}
        }
    }
}

/// Flatten a paged document into one string
///
/// Runs are joined with a space within a page and every page is followed
/// by a space.
///
/// # Arguments
/// * `document` - Any paged document, usually a [`PdfDocument`]
///
/// # Returns
/// The document text, empty for a document without pages
///
/// # Errors
/// Returns an error if a page cannot be decoded
pub fn document_text(document: &dyn PagedDocument) -> Result<String, ExtractionError> {
    let mut text = String::new();

    for index in 0..document.page_count() {
        let runs = document.page_runs(index)?;
        text.push_str(&runs.join(" "));
        text.push(' ');
    }

    Ok(text)
}

/// Extract the text of a PDF held in memory
///
/// An empty buffer counts as an empty document and yields an empty string.
///
/// # Arguments
/// * `bytes` - The raw PDF file
///
/// # Errors
/// Returns [`ExtractionError::Document`] if the buffer is not a readable PDF
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.is_empty() {
        return Ok(String::new());
    }

    let document = PdfDocument::from_bytes(bytes)?;
    debug!("Parsed PDF with {} pages", document.page_count());

    document_text(&document)
}
