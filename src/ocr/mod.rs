//! OCR engine boundary
//!
//! One in-memory raster in, recognized text out. Implementations must be
//! side-effect free so the normalizer can call them once per candidate
//! rotation.

mod tesseract;

pub use tesseract::TesseractEngine;

use crate::error::Result;
use image::DynamicImage;

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Number of whitespace-delimited tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  \n\t "), 0);
        assert_eq!(word_count("Solve for x:\n 2x + 3 = 7"), 7);
    }
}
