//! Destination naming: sanitization and collision probing

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Maximum characters kept from the base name (extension not counted)
pub const MAX_BASE_CHARS: usize = 50;

const FALLBACK_BASE: &str = "document";

/// Spaces and path separators become underscores; truncated to
/// [`MAX_BASE_CHARS`] characters.
pub fn sanitize_base(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_BASE_CHARS)
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        FALLBACK_BASE.to_string()
    } else {
        sanitized
    }
}

/// Names handed out during the current run, per destination directory.
/// A name counts as taken if it exists on disk or was claimed earlier in
/// the batch (dry runs and failed moves never reach the disk).
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: HashMap<PathBuf, HashSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the first free `<base><ext>`, `<base>_1<ext>`, `<base>_2<ext>`, …
    /// in `dir` and return the chosen base. `ext` includes its dot or is
    /// empty. When `companion` is given, `<candidate><companion>` must be
    /// free as well; it must differ from `ext`.
    pub fn claim(
        &mut self,
        dir: &Path,
        base: &str,
        ext: &str,
        companion: Option<&str>,
    ) -> String {
        let mut counter = 0usize;
        loop {
            let candidate = if counter == 0 {
                base.to_string()
            } else {
                format!("{}_{}", base, counter)
            };

            let file_name = format!("{}{}", candidate, ext);
            let companion_name = companion.map(|suffix| format!("{}{}", candidate, suffix));

            let free = !self.is_taken(dir, &file_name)
                && companion_name
                    .as_deref()
                    .map(|name| !self.is_taken(dir, name))
                    .unwrap_or(true);

            if free {
                let claimed = self.claimed.entry(dir.to_path_buf()).or_default();
                claimed.insert(file_name);
                if let Some(name) = companion_name {
                    claimed.insert(name);
                }
                return candidate;
            }

            counter += 1;
        }
    }

    /// Give back a name claimed for a document that never reached the disk
    pub fn release(&mut self, dir: &Path, base: &str, ext: &str, companion: Option<&str>) {
        if let Some(claimed) = self.claimed.get_mut(dir) {
            claimed.remove(&format!("{}{}", base, ext));
            if let Some(suffix) = companion {
                claimed.remove(&format!("{}{}", base, suffix));
            }
        }
    }

    fn is_taken(&self, dir: &Path, file_name: &str) -> bool {
        dir.join(file_name).exists()
            || self
                .claimed
                .get(dir)
                .map(|names| names.contains(file_name))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_spaces_and_separators() {
        assert_eq!(sanitize_base("9.2 Linear Equations"), "9.2_Linear_Equations");
        assert_eq!(sanitize_base("Unit 3/Part 1"), "Unit_3_Part_1");
        assert_eq!(sanitize_base(r"a\b"), "a_b");
    }

    #[test]
    fn test_sanitize_truncates_by_chars() {
        let long = "ä".repeat(80);
        let out = sanitize_base(&long);
        assert_eq!(out.chars().count(), MAX_BASE_CHARS);
    }

    #[test]
    fn test_sanitize_never_empty() {
        assert_eq!(sanitize_base(""), "document");
        assert_eq!(sanitize_base(".."), "document");
    }

    #[test]
    fn test_claim_probes_existing_files() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("foo.txt")).unwrap();

        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim(dir.path(), "foo", ".txt", None), "foo_1");
        assert_eq!(registry.claim(dir.path(), "foo", ".txt", None), "foo_2");
    }

    #[test]
    fn test_claim_tracks_batch_without_disk() {
        let dir = TempDir::new().unwrap();
        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim(dir.path(), "quiz", ".pdf", None), "quiz");
        assert_eq!(registry.claim(dir.path(), "quiz", ".pdf", None), "quiz_1");
        // other extension, other name
        assert_eq!(registry.claim(dir.path(), "quiz", ".png", None), "quiz");
    }

    #[test]
    fn test_claim_is_per_directory() {
        let root = TempDir::new().unwrap();
        let math = root.path().join("math");
        let english = root.path().join("english");

        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim(&math, "unit", ".txt", None), "unit");
        assert_eq!(registry.claim(&english, "unit", ".txt", None), "unit");
    }

    #[test]
    fn test_claim_respects_companion() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("foo.html")).unwrap();

        let mut registry = NameRegistry::new();
        assert_eq!(registry.claim(dir.path(), "foo", ".jpg", Some(".html")), "foo_1");
        assert_eq!(registry.claim(dir.path(), "foo", ".jpg", None), "foo");
    }

    #[test]
    fn test_claim_with_suffixed_companion() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("lesson_answers.html")).unwrap();

        let mut registry = NameRegistry::new();
        assert_eq!(
            registry.claim(dir.path(), "lesson", ".html", Some("_answers.html")),
            "lesson_1"
        );
    }

    #[test]
    fn test_release_frees_name() {
        let dir = TempDir::new().unwrap();
        let mut registry = NameRegistry::new();
        let base = registry.claim(dir.path(), "quiz", ".pdf", Some(".html"));
        registry.release(dir.path(), &base, ".pdf", Some(".html"));
        assert_eq!(registry.claim(dir.path(), "quiz", ".pdf", Some(".html")), "quiz");
    }
}
