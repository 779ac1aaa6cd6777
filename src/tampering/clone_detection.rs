//! Copy-move (clone) detection via block hashing.
//!
//! Partitions the RGB image into non-overlapping blocks in row-major
//! order and hashes each block's raw bytes. A high ratio of duplicate
//! hashes indicates repeated content — a hallmark of copy-move tampering.
//! Hashing over all three channels (rather than luma alone) means two
//! blocks that differ only in color still hash differently.

use image::RgbImage;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::config::ForensicsConfig;
use crate::image_utils::extract_rgb_block;

pub struct CloneOutcome {
    pub fired: bool,
    pub duplicate_ratio: f64,
}

pub fn analyze(rgb: &RgbImage, config: &ForensicsConfig) -> CloneOutcome {
    let block_size = config.clone_region_size;
    let (width, height) = rgb.dimensions();

    if width < block_size || height < block_size {
        return CloneOutcome {
            fired: false,
            duplicate_ratio: 0.0,
        };
    }

    let mut hashes = Vec::new();
    let mut y = 0;
    while y + block_size <= height {
        let mut x = 0;
        while x + block_size <= width {
            let block = extract_rgb_block(rgb, x, y, block_size);
            hashes.push(hash_block(&block));
            x += block_size;
        }
        y += block_size;
    }

    if hashes.is_empty() {
        return CloneOutcome {
            fired: false,
            duplicate_ratio: 0.0,
        };
    }

    let unique: HashSet<_> = hashes.iter().collect();
    let duplicate_ratio = 1.0 - (unique.len() as f64 / hashes.len() as f64);
    let fired = duplicate_ratio > config.clone_duplicate_ratio_threshold;

    CloneOutcome {
        fired,
        duplicate_ratio: (duplicate_ratio * 1000.0).round() / 1000.0,
    }
}

fn hash_block(block: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(block);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_image_is_entirely_duplicate_blocks() {
        let rgb = RgbImage::from_pixel(128, 128, Rgb([50, 60, 70]));
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(outcome.fired);
        assert!(outcome.duplicate_ratio > 0.9);
    }

    #[test]
    fn random_noise_image_has_low_duplicate_ratio() {
        let mut rgb = RgbImage::new(128, 128);
        let mut seed: u32 = 12345;
        for pixel in rgb.pixels_mut() {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let base = (seed >> 16) as u8;
            pixel.0 = [base, base.wrapping_add(73), base.wrapping_add(151)];
        }
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(outcome.duplicate_ratio < 0.5);
    }
}
