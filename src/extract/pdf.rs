//! PDF text-layer boundary
//!
//! ## Strategy
//! 1. pdf-extract over the whole document, split by page (fast path)
//! 2. If pdf-extract rejects the document, walk pages with lopdf one at a
//!    time so a single broken page only loses that page

use crate::error::{PipelineError, Result};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Per-page text; `None` for a page with no usable text layer
pub trait PdfTextLayer: Send + Sync {
    fn page_texts(&self, path: &Path) -> Result<Vec<Option<String>>>;
}

#[derive(Debug, Default)]
pub struct PdfExtractLayer;

impl PdfExtractLayer {
    pub fn new() -> Self {
        Self
    }

    fn pdf_extract_pages(bytes: &[u8], path: &Path) -> Result<Vec<Option<String>>> {
        // pdf-extract (and its cff-parser dependency) can panic on malformed fonts
        match catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        })) {
            Ok(Ok(pages)) => Ok(pages.iter().map(|p| non_empty(p)).collect()),
            Ok(Err(e)) => Err(PipelineError::degraded(
                path,
                format!("pdf-extract failed: {}", e),
            )),
            Err(_panic) => Err(PipelineError::degraded(
                path,
                "pdf-extract panicked, likely malformed fonts",
            )),
        }
    }

    fn lopdf_pages(bytes: &[u8], path: &Path) -> Result<Vec<Option<String>>> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| PipelineError::degraded(path, format!("Failed to load PDF: {}", e)))?;

        let pages = doc
            .get_pages()
            .keys()
            .map(|&number| {
                match catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[number]))) {
                    Ok(Ok(text)) => non_empty(&text),
                    Ok(Err(e)) => {
                        tracing::debug!("[Extractor] Page {} unreadable: {}", number, e);
                        None
                    }
                    Err(_panic) => {
                        tracing::debug!("[Extractor] Page {} panicked during extraction", number);
                        None
                    }
                }
            })
            .collect();

        Ok(pages)
    }
}

impl PdfTextLayer for PdfExtractLayer {
    fn page_texts(&self, path: &Path) -> Result<Vec<Option<String>>> {
        let bytes = std::fs::read(path)
            .map_err(|e| PipelineError::degraded(path, format!("Failed to read PDF: {}", e)))?;

        tracing::debug!("[Extractor] PDF file size: {} bytes", bytes.len());

        match Self::pdf_extract_pages(&bytes, path) {
            Ok(pages) => Ok(pages),
            Err(e) => {
                tracing::warn!("[Extractor] {}; retrying page by page", e);
                Self::lopdf_pages(&bytes, path)
            }
        }
    }
}

/// Trim each line, drop blank lines; `None` when nothing is left
fn non_empty(text: &str) -> Option<String> {
    let cleaned = text
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
