//! Text Extractor
//!
//! Turns any inbox file into a single text payload.
//!
//! ## Supported Formats
//! - Raster images: orientation search + binarization, then OCR
//! - PDF: text layer of every page, newline-joined
//! - Anything else: read as text, undecodable bytes dropped
//!
//! Extraction never fails. Backend problems degrade to empty or partial
//! text plus a warning, so the document still gets classified (as `other`
//! when nothing was read).

pub mod pdf;

pub use pdf::{PdfExtractLayer, PdfTextLayer};

use crate::error::PipelineError;
use crate::models::{ExtractedText, InputDocument, SourceModality};
use crate::ocr::OcrEngine;
use crate::vision::ImageNormalizer;
use std::borrow::Cow;
use std::sync::Arc;

pub struct TextExtractor {
    ocr: Arc<dyn OcrEngine>,
    normalizer: ImageNormalizer,
    pdf: Arc<dyn PdfTextLayer>,
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, pdf: Arc<dyn PdfTextLayer>) -> Self {
        Self {
            normalizer: ImageNormalizer::new(Arc::clone(&ocr)),
            ocr,
            pdf,
        }
    }

    pub fn extract(&self, doc: &InputDocument) -> ExtractedText {
        let modality = SourceModality::from_extension(&doc.extension);
        let mut warnings = Vec::new();

        let raw_text = match modality {
            SourceModality::Image => self.extract_image(doc, &mut warnings),
            SourceModality::Pdf => self.extract_pdf(doc, &mut warnings),
            SourceModality::PlainText => Self::read_plain_text(doc, &mut warnings),
        };

        tracing::debug!(
            "[Extractor] {:?}: {} chars, {} words from {}",
            modality,
            raw_text.len(),
            raw_text.split_whitespace().count(),
            doc.path.display()
        );

        for warning in &warnings {
            tracing::warn!("[Extractor] {}", warning);
        }

        ExtractedText {
            raw_text,
            modality,
            warnings,
        }
    }

    fn extract_image(&self, doc: &InputDocument, warnings: &mut Vec<String>) -> String {
        let image = match image::load_from_memory(&doc.bytes) {
            Ok(img) => img,
            Err(e) => {
                warnings.push(
                    PipelineError::degraded(&doc.path, format!("Failed to decode image: {}", e))
                        .to_string(),
                );
                return String::new();
            }
        };

        let normalized = self.normalizer.normalize(&image);

        match self.ocr.recognize(&normalized) {
            Ok(text) => text,
            Err(e) => {
                warnings.push(PipelineError::degraded(&doc.path, e.to_string()).to_string());
                String::new()
            }
        }
    }

    fn extract_pdf(&self, doc: &InputDocument, warnings: &mut Vec<String>) -> String {
        let pages = match self.pdf.page_texts(&doc.path) {
            Ok(pages) => pages,
            Err(e) => {
                warnings.push(e.to_string());
                return String::new();
            }
        };

        let missing: Vec<String> = pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_none())
            .map(|(i, _)| (i + 1).to_string())
            .collect();

        if !missing.is_empty() {
            warnings.push(
                PipelineError::degraded(
                    &doc.path,
                    format!("no text layer on page(s) {}", missing.join(", ")),
                )
                .to_string(),
            );
        }

        pages
            .iter()
            .map(|page| page.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn read_plain_text(doc: &InputDocument, warnings: &mut Vec<String>) -> String {
        match String::from_utf8_lossy(&doc.bytes) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                warnings.push(
                    PipelineError::degraded(&doc.path, "dropped undecodable bytes").to_string(),
                );
                text.replace(char::REPLACEMENT_CHARACTER, "")
            }
        }
    }
}
