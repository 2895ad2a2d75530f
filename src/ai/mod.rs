//! Generative backend boundary and the two stages built on it
//!
//! The backend is an opaque `prompt -> text` function behind
//! [`TextGenerator`]. It is constructed once and injected, so tests swap
//! in canned responders without touching pipeline logic.

pub mod classifier;
pub mod gemini;
pub mod http_client;
pub mod prompts;
pub mod synthesizer;

pub use classifier::{parse_response, validate_label, ContentClassifier, ParsedResponse};
pub use gemini::GeminiClient;
pub use synthesizer::AnswerSynthesizer;

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
