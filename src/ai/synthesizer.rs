//! Answer Synthesizer
//!
//! Sends the full extracted text and returns the backend's markup verbatim.

use super::prompts::build_answer_key_prompt;
use super::TextGenerator;
use crate::error::{PipelineError, Result};
use crate::models::GeneratedArtifact;
use std::sync::Arc;

pub struct AnswerSynthesizer {
    backend: Arc<dyn TextGenerator>,
}

impl AnswerSynthesizer {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub async fn synthesize(&self, text: &str) -> Result<GeneratedArtifact> {
        let prompt = build_answer_key_prompt(text);
        let markup = self
            .backend
            .generate(&prompt)
            .await
            .map_err(|e| PipelineError::SynthesisFailed(e.to_string()))?;

        tracing::debug!("[Synthesizer] Answer key: {} chars", markup.len());
        Ok(GeneratedArtifact { markup })
    }
}
