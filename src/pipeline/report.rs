//! Per-run report, optionally written as JSON with `--report`

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Original moved into the archive
    Archived,
    /// Dry run: destination computed, nothing moved
    Planned,
    /// Left in the inbox
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub source: PathBuf,
    pub status: OutcomeStatus,
    pub label: Option<String>,
    pub destination: Option<PathBuf>,
    pub artifact: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl DocumentOutcome {
    pub fn failed(source: &Path, warnings: Vec<String>, error: String) -> Self {
        Self {
            source: source.to_path_buf(),
            status: OutcomeStatus::Failed,
            label: None,
            destination: None,
            artifact: None,
            warnings,
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Archived or planned
    pub fn archived(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failure()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
