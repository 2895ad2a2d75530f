//! Batch Driver
//!
//! Walks the inbox one document at a time: extract, classify, optionally
//! synthesize an answer key, archive. Every error is caught at the
//! document boundary and recorded in the [`BatchReport`]; nothing short of
//! an unreadable inbox aborts the run.

pub mod report;


pub use report::{BatchReport, DocumentOutcome, OutcomeStatus};

use crate::ai::{AnswerSynthesizer, ContentClassifier, GeminiClient, TextGenerator};
use crate::archive::ArchiveOrganizer;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::extract::{PdfExtractLayer, PdfTextLayer, TextExtractor};
use crate::models::{ClassificationResult, ExtractedText, InputDocument};
use crate::ocr::{OcrEngine, TesseractEngine};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub struct Pipeline {
    config: PipelineConfig,
    extractor: Arc<TextExtractor>,
    classifier: ContentClassifier,
    synthesizer: Option<AnswerSynthesizer>,
    organizer: ArchiveOrganizer,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        backend: Arc<dyn TextGenerator>,
        ocr: Arc<dyn OcrEngine>,
        pdf: Arc<dyn PdfTextLayer>,
    ) -> Self {
        let classifier = ContentClassifier::new(
            Arc::clone(&backend),
            config.subjects.clone(),
            config.classify_char_budget,
        );
        let synthesizer = config
            .synthesize_answers
            .then(|| AnswerSynthesizer::new(backend));
        let organizer = ArchiveOrganizer::new(&config.archive_root, &config.artifact_extension)
            .with_dry_run(config.dry_run);

        Self {
            extractor: Arc::new(TextExtractor::new(ocr, pdf)),
            classifier,
            synthesizer,
            organizer,
            config,
        }
    }

    /// Wire up the production backends: Gemini, tesseract, pdf-extract
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(GeminiClient::from_config(&config)?);
        let ocr = Arc::new(TesseractEngine::new(
            &config.tesseract_cmd,
            &config.ocr_language,
        ));
        Ok(Self::new(config, backend, ocr, Arc::new(PdfExtractLayer::new())))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&mut self) -> Result<BatchReport> {
        let started_at = Utc::now();
        let inbox = list_inbox(&self.config.inbox_dir)?;

        tracing::info!(
            "[Pipeline] {} document(s) in {}{}",
            inbox.len(),
            self.config.inbox_dir.display(),
            if self.config.dry_run { " (dry run)" } else { "" }
        );

        let mut outcomes = Vec::with_capacity(inbox.len());
        for path in inbox {
            let outcome = self.process(&path).await;
            match outcome.status {
                OutcomeStatus::Failed => tracing::error!(
                    "[Pipeline] FAILED {}: {}",
                    path.display(),
                    outcome.error.as_deref().unwrap_or("unknown error")
                ),
                _ => tracing::info!(
                    "[Pipeline] {} -> {}",
                    path.display(),
                    outcome
                        .destination
                        .as_deref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_default()
                ),
            }
            outcomes.push(outcome);
        }

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        self.clear_inbox(&report).await;
        Ok(report)
    }

    async fn process(&mut self, path: &Path) -> DocumentOutcome {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => return DocumentOutcome::failed(path, Vec::new(), e.to_string()),
        };
        let doc = InputDocument::from_bytes(path, bytes);

        let (doc, extracted) = match self.extract(doc).await {
            Ok(pair) => pair,
            Err(e) => return DocumentOutcome::failed(path, Vec::new(), e.to_string()),
        };
        let mut warnings = extracted.warnings.clone();

        let classification = self.classify(&extracted, &mut warnings).await;

        // nothing to answer on a blank page
        let artifact = match &self.synthesizer {
            Some(_) if extracted.is_blank() => None,
            Some(synthesizer) => match synthesizer.synthesize(&extracted.raw_text).await {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    tracing::warn!("[Synthesizer] {}: {}", path.display(), e);
                    warnings.push(e.to_string());
                    None
                }
            },
            None => None,
        };

        match self
            .organizer
            .archive(&doc, &classification, artifact.as_ref())
        {
            Ok(archived) => DocumentOutcome {
                source: doc.path.clone(),
                status: if self.config.dry_run {
                    OutcomeStatus::Planned
                } else {
                    OutcomeStatus::Archived
                },
                label: Some(classification.label),
                destination: Some(archived.destination()),
                artifact: archived.artifact_path,
                warnings,
                error: None,
            },
            Err(e) => {
                let mut outcome = DocumentOutcome::failed(path, warnings, e.to_string());
                outcome.label = Some(classification.label);
                outcome
            }
        }
    }

    /// OCR and PDF parsing block, so they run off the async workers
    async fn extract(&self, doc: InputDocument) -> Result<(InputDocument, ExtractedText)> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || {
            let text = extractor.extract(&doc);
            (doc, text)
        })
        .await
        .map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("extraction task failed: {}", e),
            ))
        })
    }

    /// Never fails: an unusable backend answer files the document under `other`
    async fn classify(
        &self,
        extracted: &ExtractedText,
        warnings: &mut Vec<String>,
    ) -> ClassificationResult {
        if extracted.is_blank() {
            let message = "no text extracted, classified as other".to_string();
            tracing::warn!("[Classifier] {}", message);
            warnings.push(message);
            return ClassificationResult::other();
        }

        match self.classifier.classify(&extracted.raw_text).await {
            Ok(result) => result,
            Err(e) => {
                let e = PipelineError::ClassificationUnavailable(e.to_string());
                tracing::warn!("[Classifier] {}, falling back to other", e);
                warnings.push(e.to_string());
                ClassificationResult::other()
            }
        }
    }

    async fn clear_inbox(&self, report: &BatchReport) {
        if !self.config.clear_inbox || self.config.dry_run {
            return;
        }
        if report.failed() > 0 {
            tracing::warn!(
                "[Pipeline] Keeping {}: {} document(s) failed",
                self.config.inbox_dir.display(),
                report.failed()
            );
            return;
        }

        match tokio::fs::remove_dir_all(&self.config.inbox_dir).await {
            Ok(()) => tracing::info!(
                "[Pipeline] Removed inbox {}",
                self.config.inbox_dir.display()
            ),
            Err(e) => tracing::error!(
                "[Pipeline] Failed to remove inbox {}: {}",
                self.config.inbox_dir.display(),
                e
            ),
        }
    }
}

/// Regular files directly inside `inbox`, hidden files skipped, sorted by name
pub fn list_inbox(inbox: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(inbox)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            e.into_io_error()
                .map(PipelineError::Io)
                .unwrap_or_else(|| PipelineError::Config(message))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}
