//! Image Normalizer
//!
//! Makes OCR reliable on skewed phone scans:
//! 1. Try each quarter-turn rotation and keep the one where OCR reads the
//!    most words (0° wins ties)
//! 2. Grayscale, Otsu threshold and a small closing to drop speckle

pub mod enhance;

use crate::ocr::{word_count, OcrEngine};
use image::DynamicImage;
use std::sync::Arc;

/// Clockwise quarter turns tried during orientation search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Candidate order doubles as tie-break order
pub const ROTATION_CANDIDATES: [Rotation; 4] =
    [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

impl Rotation {
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Rotation::Deg0 => image.clone(),
            Rotation::Deg90 => image.rotate90(),
            Rotation::Deg180 => image.rotate180(),
            Rotation::Deg270 => image.rotate270(),
        }
    }
}

pub struct ImageNormalizer {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageNormalizer {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Rotation with the highest OCR word count. A candidate whose OCR call
    /// fails scores zero.
    pub fn best_rotation(&self, image: &DynamicImage) -> (Rotation, usize) {
        let mut best = (Rotation::Deg0, 0usize);

        for rotation in ROTATION_CANDIDATES {
            let candidate = rotation.apply(image);
            let score = match self.ocr.recognize(&candidate) {
                Ok(text) => word_count(&text),
                Err(e) => {
                    tracing::debug!(
                        "[Normalizer] OCR failed at {}°, scoring 0: {}",
                        rotation.degrees(),
                        e
                    );
                    0
                }
            };

            tracing::debug!("[Normalizer] {}° -> {} words", rotation.degrees(), score);

            if score > best.1 {
                best = (rotation, score);
            }
        }

        best
    }

    /// Rotated and binarized copy of `image`
    pub fn normalize(&self, image: &DynamicImage) -> DynamicImage {
        let (rotation, score) = self.best_rotation(image);
        if rotation != Rotation::Deg0 {
            tracing::info!(
                "[Normalizer] Correcting orientation by {}° ({} words)",
                rotation.degrees(),
                score
            );
        }

        let upright = rotation.apply(image);
        DynamicImage::ImageLuma8(enhance::binarize(&upright))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, Result};
    use image::{GrayImage, Luma};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reads well only when the dark marker sits in the top-left corner
    struct MarkerOcr {
        calls: AtomicUsize,
    }

    impl OcrEngine for MarkerOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gray = image.to_luma8();
            if gray.get_pixel(1, 1)[0] < 128 {
                Ok("Chapter 9 linear equations solve each problem".to_string())
            } else {
                Ok("l1 ;".to_string())
            }
        }
    }

    struct ConstantOcr(&'static str);

    impl OcrEngine for ConstantOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenOcr;

    impl OcrEngine for BrokenOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<String> {
            Err(PipelineError::Ocr("engine crashed".to_string()))
        }
    }

    /// White page with a dark block in the top-left corner
    fn upright_page() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(40, 24, |x, y| {
            if x < 8 && y < 8 {
                Luma([0])
            } else {
                Luma([255])
            }
        }))
    }

    #[test]
    fn test_selects_upright_copy() {
        let upright = upright_page();
        let copies = [
            (upright.clone(), Rotation::Deg0),
            (upright.rotate90(), Rotation::Deg270),
            (upright.rotate180(), Rotation::Deg180),
            (upright.rotate270(), Rotation::Deg90),
        ];

        for (input, expected) in copies {
            let normalizer = ImageNormalizer::new(Arc::new(MarkerOcr {
                calls: AtomicUsize::new(0),
            }));
            let (rotation, score) = normalizer.best_rotation(&input);
            assert_eq!(rotation, expected);
            assert_eq!(score, 7);

            let normalized = normalizer.normalize(&input).to_luma8();
            assert_eq!(normalized.dimensions(), (40, 24));
            assert_eq!(normalized.get_pixel(1, 1)[0], 0);
            assert_eq!(normalized.get_pixel(30, 20)[0], 255);
        }
    }

    #[test]
    fn test_every_candidate_is_scored() {
        let ocr = Arc::new(MarkerOcr {
            calls: AtomicUsize::new(0),
        });
        let normalizer = ImageNormalizer::new(ocr.clone());
        normalizer.best_rotation(&upright_page());
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_ties_prefer_zero_degrees() {
        let normalizer = ImageNormalizer::new(Arc::new(ConstantOcr("same words here")));
        let (rotation, score) = normalizer.best_rotation(&upright_page());
        assert_eq!(rotation, Rotation::Deg0);
        assert_eq!(score, 3);
    }

    #[test]
    fn test_ocr_failure_scores_zero() {
        let normalizer = ImageNormalizer::new(Arc::new(BrokenOcr));
        let (rotation, score) = normalizer.best_rotation(&upright_page());
        assert_eq!(rotation, Rotation::Deg0);
        assert_eq!(score, 0);
        // still produces an image
        let out = normalizer.normalize(&upright_page());
        assert_eq!(out.width(), 40);
    }
}
