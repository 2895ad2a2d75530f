//! Content Classifier
//!
//! Asks the backend for a `label:` line and a `name:` line, then pins the
//! label to the configured subject set.
//!
//! Label validation is a case-folded substring match ("Mathematics" maps to
//! `math`). It is deliberately loose and will also accept a verbose label
//! that merely mentions a subject; the first configured subject found wins.

use super::prompts::build_classification_prompt;
use super::TextGenerator;
use crate::error::Result;
use crate::models::{ClassificationResult, OTHER_LABEL};
use std::sync::Arc;

const LABEL_PREFIX: &str = "label:";
const NAME_PREFIX: &str = "name:";

/// Raw fields scanned from a backend response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub label: Option<String>,
    pub name: Option<String>,
}

/// Scan lines for `label:` and `name:` prefixes, case-insensitively. The
/// first occurrence of each wins; the value is the trimmed remainder.
pub fn parse_response(response: &str) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();

    for line in response.lines() {
        let line = line.trim();

        if parsed.label.is_none() {
            if let Some(value) = strip_prefix_ignore_case(line, LABEL_PREFIX) {
                parsed.label = Some(value.trim().to_string());
                continue;
            }
        }
        if parsed.name.is_none() {
            if let Some(value) = strip_prefix_ignore_case(line, NAME_PREFIX) {
                parsed.name = Some(value.trim().to_string());
            }
        }

        if parsed.label.is_some() && parsed.name.is_some() {
            break;
        }
    }

    parsed
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

/// Map a raw label onto `subjects` (lowercase, in priority order), or `other`
pub fn validate_label(raw: &str, subjects: &[String]) -> String {
    let folded = raw.to_lowercase();
    subjects
        .iter()
        .find(|subject| folded.contains(subject.as_str()))
        .cloned()
        .unwrap_or_else(|| OTHER_LABEL.to_string())
}

pub struct ContentClassifier {
    backend: Arc<dyn TextGenerator>,
    subjects: Vec<String>,
    char_budget: usize,
}

impl ContentClassifier {
    pub fn new(backend: Arc<dyn TextGenerator>, subjects: Vec<String>, char_budget: usize) -> Self {
        Self {
            backend,
            subjects,
            char_budget,
        }
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Backend failures propagate; the caller decides the fallback
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let prompt = build_classification_prompt(&self.subjects, text, self.char_budget);
        let response = self.backend.generate(&prompt).await?;

        let preview: String = response.chars().take(200).collect();
        tracing::debug!("[Classifier] Response: {:?}", preview);

        Ok(self.interpret(&response))
    }

    pub fn interpret(&self, response: &str) -> ClassificationResult {
        let parsed = parse_response(response);

        let label = match parsed.label.as_deref() {
            Some(raw) => validate_label(raw, &self.subjects),
            None => OTHER_LABEL.to_string(),
        };
        let derived_title = parsed.name.filter(|n| !n.is_empty());

        ClassificationResult {
            label,
            derived_title,
        }
    }
}
