//! Pipeline configuration
//!
//! Defaults, overridden by `SORTER_*` environment variables (a `.env` file
//! is loaded first), overridden in turn by CLI flags in `main.rs`.

use crate::error::{PipelineError, Result};
use crate::models::OTHER_LABEL;
use std::fmt;
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for documents
    pub inbox_dir: PathBuf,

    /// Root of the subject-organized archive
    pub archive_root: PathBuf,

    /// Subject labels, lowercase. `other` is implicit and never listed.
    pub subjects: Vec<String>,

    /// Characters of extracted text sent for classification
    pub classify_char_budget: usize,

    /// Generate an answer-key artifact for each document
    pub synthesize_answers: bool,

    /// Extension (without dot) of the answer-key artifact
    pub artifact_extension: String,

    /// Delete the inbox after the run
    pub clear_inbox: bool,

    /// Plan destinations without touching the filesystem
    pub dry_run: bool,

    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,

    /// tesseract executable
    pub tesseract_cmd: String,
    pub ocr_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inbox_dir: PathBuf::from("incoming"),
            archive_root: PathBuf::from("worksheets"),
            subjects: ["math", "english", "biology", "economics"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            classify_char_budget: 3000,
            synthesize_answers: false,
            artifact_extension: "html".to_string(),
            clear_inbox: false,
            dry_run: false,
            model: "gemini-1.5-pro".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            request_timeout_secs: 120,
            tesseract_cmd: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("inbox_dir", &self.inbox_dir)
            .field("archive_root", &self.archive_root)
            .field("subjects", &self.subjects)
            .field("classify_char_budget", &self.classify_char_budget)
            .field("synthesize_answers", &self.synthesize_answers)
            .field("artifact_extension", &self.artifact_extension)
            .field("clear_inbox", &self.clear_inbox)
            .field("dry_run", &self.dry_run)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("ocr_language", &self.ocr_language)
            .finish()
    }
}

impl PipelineConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `SORTER_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("SORTER_INBOX") {
            config.inbox_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SORTER_ARCHIVE") {
            config.archive_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("SORTER_SUBJECTS") {
            config.subjects = normalize_subjects(v.split(','));
        }
        if let Some(v) = lookup("SORTER_CHAR_BUDGET") {
            config.classify_char_budget = v.trim().parse().map_err(|_| {
                PipelineError::Config(format!("SORTER_CHAR_BUDGET is not a number: {}", v))
            })?;
        }
        if let Some(v) = lookup("SORTER_ANSWERS") {
            config.synthesize_answers = parse_flag("SORTER_ANSWERS", &v)?;
        }
        if let Some(v) = lookup("SORTER_CLEAR_INBOX") {
            config.clear_inbox = parse_flag("SORTER_CLEAR_INBOX", &v)?;
        }
        if let Some(v) = lookup("SORTER_MODEL") {
            config.model = v;
        }
        if let Some(v) = lookup("SORTER_API_BASE") {
            config.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("SORTER_TESSERACT") {
            config.tesseract_cmd = v;
        }
        if let Some(v) = lookup("SORTER_OCR_LANG") {
            config.ocr_language = v;
        }
        config.api_key = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subjects.is_empty() {
            return Err(PipelineError::Config(
                "at least one subject label is required".to_string(),
            ));
        }
        if self.classify_char_budget == 0 {
            return Err(PipelineError::Config(
                "classification character budget must be positive".to_string(),
            ));
        }
        if self.artifact_extension.is_empty()
            || self
                .artifact_extension
                .contains(|c| matches!(c, '.' | '/' | '\\'))
        {
            return Err(PipelineError::Config(format!(
                "invalid artifact extension: {:?}",
                self.artifact_extension
            )));
        }
        Ok(())
    }
}

/// Lowercase, trim, drop blanks and duplicates, drop `other`
pub fn normalize_subjects<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut subjects: Vec<String> = Vec::new();
    for s in raw {
        let s = s.as_ref().trim().to_lowercase();
        if s.is_empty() || s == OTHER_LABEL || subjects.contains(&s) {
            continue;
        }
        subjects.push(s);
    }
    subjects
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(PipelineError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}
