//! Contrast and denoise pass: grayscale, Otsu threshold, binary closing.

use image::{DynamicImage, GrayImage, Luma};

const BLACK: u8 = 0;
const WHITE: u8 = 255;

/// Grayscale, binarize at the Otsu threshold, then close with a 3x3 cross
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let threshold = otsu_threshold(&gray);
    let binary = apply_threshold(&gray, threshold);
    close(&binary)
}

/// Threshold maximizing inter-class variance. Pixels `<= t` are one class.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_threshold = 0u8;
    let mut best_variance = 0f64;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let diff = background_mean - foreground_mean;
        let variance = background_weight as f64 * foreground_weight as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}

pub fn apply_threshold(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] > threshold {
            Luma([WHITE])
        } else {
            Luma([BLACK])
        }
    })
}

/// Morphological closing of the white background: fills dark specks smaller
/// than the structuring element while keeping strokes at least as wide.
pub fn close(image: &GrayImage) -> GrayImage {
    erode(&dilate(image))
}

const CROSS: [(i64, i64); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

fn dilate(image: &GrayImage) -> GrayImage {
    morph(image, std::cmp::max, BLACK)
}

fn erode(image: &GrayImage) -> GrayImage {
    morph(image, std::cmp::min, WHITE)
}

fn morph(image: &GrayImage, pick: fn(u8, u8) -> u8, identity: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let value = CROSS.iter().fold(identity, |acc, (dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                acc
            } else {
                pick(acc, image.get_pixel(nx as u32, ny as u32)[0])
            }
        });
        Luma([value])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_otsu_splits_bimodal() {
        let image = GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([40]) } else { Luma([200]) });
        let t = otsu_threshold(&image);
        assert!((40..200).contains(&t), "threshold {} not between modes", t);
    }

    #[test]
    fn test_binarize_output_is_binary() {
        let image = GrayImage::from_fn(16, 16, |x, y| Luma([((x * 16 + y) % 256) as u8]));
        let out = binarize(&DynamicImage::ImageLuma8(image));
        assert!(out.pixels().all(|p| p[0] == BLACK || p[0] == WHITE));
    }

    #[test]
    fn test_closing_removes_single_speck() {
        let mut image = GrayImage::from_pixel(9, 9, Luma([WHITE]));
        image.put_pixel(4, 4, Luma([BLACK]));
        let closed = close(&image);
        assert!(closed.pixels().all(|p| p[0] == WHITE));
    }

    #[test]
    fn test_closing_keeps_thick_stroke() {
        let mut image = GrayImage::from_pixel(12, 12, Luma([WHITE]));
        for y in 2..10 {
            for x in 4..8 {
                image.put_pixel(x, y, Luma([BLACK]));
            }
        }
        let closed = close(&image);
        assert_eq!(closed.get_pixel(5, 5)[0], BLACK);
        assert_eq!(closed.get_pixel(0, 0)[0], WHITE);
    }

    #[test]
    fn test_color_input_is_grayscaled() {
        let rgb = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                image::Rgb([10, 10, 10])
            } else {
                image::Rgb([250, 250, 250])
            }
        });
        let out = binarize(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(out.get_pixel(1, 4)[0], BLACK);
        assert_eq!(out.get_pixel(6, 4)[0], WHITE);
    }

    #[test]
    fn test_input_not_mutated() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([120])));
        let before = image.to_luma8();
        let _ = binarize(&image);
        assert_eq!(image.to_luma8(), before);
    }
}
