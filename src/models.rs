//! Per-document data model
//!
//! Everything here lives for the processing of one inbox file and is
//! dropped before the next one starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Label used when the backend answer matches no configured subject
pub const OTHER_LABEL: &str = "other";

/// A candidate file read from the inbox
#[derive(Debug, Clone)]
pub struct InputDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// Lowercased extension without the dot, empty when the file has none
    pub extension: String,
}

impl InputDocument {
    /// Read a file from disk
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            bytes,
            extension,
        }
    }

    /// File name without extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Original extension including the leading dot, case preserved
    pub fn dotted_extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Which extraction path produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceModality {
    Image,
    Pdf,
    PlainText,
}

impl SourceModality {
    /// Dispatch on a lowercased extension. Anything that is not a known
    /// raster format or a PDF is read as text.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "tiff" | "tif" => Self::Image,
            "pdf" => Self::Pdf,
            _ => Self::PlainText,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub raw_text: String,
    pub modality: SourceModality,
    pub warnings: Vec<String>,
}

impl ExtractedText {
    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Always a configured subject or [`OTHER_LABEL`]
    pub label: String,
    pub derived_title: Option<String>,
}

impl ClassificationResult {
    pub fn other() -> Self {
        Self {
            label: OTHER_LABEL.to_string(),
            derived_title: None,
        }
    }
}

/// Markup produced by the answer synthesizer, written verbatim
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub markup: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedFile {
    pub source_path: PathBuf,
    pub destination_directory: PathBuf,
    pub destination_filename: String,
    pub artifact_path: Option<PathBuf>,
}

impl ArchivedFile {
    pub fn destination(&self) -> PathBuf {
        self.destination_directory.join(&self.destination_filename)
    }
}
