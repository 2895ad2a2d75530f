//! Tesseract OCR via the `tesseract` command-line tool
//!
//! The image is encoded to PNG in memory and piped through
//! `tesseract stdin stdout`, so no temp files are left behind.

use super::OcrEngine;
use crate::error::{PipelineError, Result};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

pub struct TesseractEngine {
    command: String,
    language: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| PipelineError::Ocr(format!("Failed to encode image: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let png = Self::encode_png(image)?;

        let output = duct::cmd(
            self.command.as_str(),
            ["stdin", "stdout", "-l", self.language.as_str()],
        )
        .stdin_bytes(png)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .map_err(|e| PipelineError::Ocr(format!("Failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(PipelineError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn test_missing_binary_is_ocr_error() {
        let engine = TesseractEngine::new("definitely-not-a-real-tesseract-binary", "eng");
        let image = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        let result = engine.recognize(&image);
        assert!(matches!(result, Err(PipelineError::Ocr(_))));
    }

    #[test]
    fn test_encode_png_magic() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let png = TesseractEngine::encode_png(&image).unwrap();
        assert!(png.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }
}
