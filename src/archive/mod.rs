//! Archive Organizer
//!
//! Files each document under `<archive_root>/<label>/` with a collision-safe
//! name derived from its title, and writes the optional answer key beside
//! it under the same base name. The original is moved last, so any earlier
//! failure leaves it in the inbox.

pub mod naming;

pub use naming::{sanitize_base, NameRegistry, MAX_BASE_CHARS};

use crate::error::{PipelineError, Result};
use crate::models::{ArchivedFile, ClassificationResult, GeneratedArtifact, InputDocument};
use std::fs;
use std::path::{Path, PathBuf};

pub struct ArchiveOrganizer {
    root: PathBuf,
    artifact_extension: String,
    registry: NameRegistry,
    dry_run: bool,
}

impl ArchiveOrganizer {
    pub fn new(root: impl Into<PathBuf>, artifact_extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            artifact_extension: artifact_extension.into(),
            registry: NameRegistry::new(),
            dry_run: false,
        }
    }

    /// Plan names without touching the filesystem
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive(
        &mut self,
        doc: &InputDocument,
        classification: &ClassificationResult,
        artifact: Option<&GeneratedArtifact>,
    ) -> Result<ArchivedFile> {
        let destination_directory = self.root.join(&classification.label);

        let base = match classification.derived_title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => doc.stem(),
        };
        let base = sanitize_base(&base);
        let ext = doc.dotted_extension();

        let companion = artifact.map(|_| self.companion_suffix(&ext));
        let final_base = self.registry.claim(
            &destination_directory,
            &base,
            &ext,
            companion.as_deref(),
        );

        let destination_filename = format!("{}{}", final_base, ext);
        let destination = destination_directory.join(&destination_filename);
        let artifact_path = companion
            .as_ref()
            .map(|suffix| destination_directory.join(format!("{}{}", final_base, suffix)));

        if self.dry_run {
            tracing::debug!(
                "[Archive] Dry run: {} -> {}",
                doc.path.display(),
                destination.display()
            );
        } else if let Err(e) = Self::commit(
            &doc.path,
            &destination,
            artifact.zip(artifact_path.as_deref()),
        ) {
            self.registry.release(
                &destination_directory,
                &final_base,
                &ext,
                companion.as_deref(),
            );
            return Err(e);
        } else {
            tracing::debug!(
                "[Archive] Moved {} to {}",
                doc.path.display(),
                destination.display()
            );
        }

        Ok(ArchivedFile {
            source_path: doc.path.clone(),
            destination_directory,
            destination_filename,
            artifact_path,
        })
    }

    /// `.<artifact ext>`, or `_answers.<artifact ext>` when the document
    /// itself carries that extension
    fn companion_suffix(&self, ext: &str) -> String {
        if ext
            .trim_start_matches('.')
            .eq_ignore_ascii_case(&self.artifact_extension)
        {
            format!("_answers.{}", self.artifact_extension)
        } else {
            format!(".{}", self.artifact_extension)
        }
    }

    /// Write the artifact, then move the original. Anything written is
    /// removed again when a later step fails.
    fn commit(
        source: &Path,
        destination: &Path,
        artifact: Option<(&GeneratedArtifact, &Path)>,
    ) -> Result<()> {
        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir).map_err(|e| PipelineError::archive(dir, e))?;
        }

        if let Some((artifact, path)) = artifact {
            if let Err(e) = fs::write(path, &artifact.markup) {
                let _ = fs::remove_file(path);
                return Err(PipelineError::archive(path, e));
            }
        }

        if let Err(e) = move_file(source, destination) {
            if let Some((_, path)) = artifact {
                let _ = fs::remove_file(path);
            }
            return Err(PipelineError::archive(source, e));
        }

        Ok(())
    }
}

/// Rename, falling back to copy + delete across filesystems
fn move_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    if fs::rename(source, destination).is_err() {
        fs::copy(source, destination)?;
        if let Err(e) = fs::remove_file(source) {
            let _ = fs::remove_file(destination);
            return Err(e);
        }
    }
    Ok(())
}
