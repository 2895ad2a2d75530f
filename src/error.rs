//! Error taxonomy for the ingestion pipeline
//!
//! Every stage returns `Result<_, PipelineError>`. The batch driver is the
//! only place these are turned into per-document outcomes, so none of them
//! can abort a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// OCR, PDF or text read produced partial or empty content
    #[error("extraction degraded for {}: {reason}", path.display())]
    ExtractionDegraded { path: PathBuf, reason: String },

    /// Classification backend failed or answered with nothing usable
    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    /// Answer-key generation failed; archiving continues without the artifact
    #[error("answer synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Move of the original or write of the artifact failed
    #[error("archive write failed for {}: {source}", path.display())]
    ArchiveWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("OCR engine error: {0}")]
    Ocr(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArchiveWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn degraded(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ExtractionDegraded {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
