//! Crops the image into non-overlapping square regions and compares their
//! noise levels. A splice from a differently-processed source shows up as
//! a region with an outlying noise level relative to the rest.

use image::RgbImage;

use crate::config::ForensicsConfig;
use crate::image_utils::{gaussian_blur_sigma, rgb_to_gray};

const SIGMA: f64 = 2.0;

pub struct NoiseRatioOutcome {
    pub fired: bool,
    pub ratio: f64,
}

pub fn analyze(rgb: &RgbImage, config: &ForensicsConfig) -> NoiseRatioOutcome {
    let (width, height) = rgb.dimensions();
    let region_size = [100, width / 4, height / 4]
        .into_iter()
        .min()
        .unwrap_or(1)
        .max(1);

    let gray = rgb_to_gray(rgb);
    let blurred = gaussian_blur_sigma(&gray, SIGMA);

    let mut region_noises = Vec::new();
    let mut y = 0;
    while y + region_size <= height {
        let mut x = 0;
        while x + region_size <= width {
            let mut diffs = Vec::with_capacity((region_size * region_size) as usize);
            for dy in 0..region_size {
                for dx in 0..region_size {
                    let gray_v = gray.get_pixel(x + dx, y + dy)[0] as f64;
                    let blur_v = blurred.get_pixel(x + dx, y + dy)[0] as f64;
                    diffs.push(gray_v - blur_v);
                }
            }
            region_noises.push(variance(&diffs));
            x += region_size;
        }
        y += region_size;
    }

    if region_noises.is_empty() {
        return NoiseRatioOutcome {
            fired: false,
            ratio: 0.0,
        };
    }

    let max_noise = region_noises.iter().cloned().fold(0.0f64, f64::max);
    let min_noise = region_noises.iter().cloned().fold(f64::INFINITY, f64::min);
    let ratio = max_noise / min_noise.max(1e-5);

    NoiseRatioOutcome {
        fired: ratio > config.noise_ratio_max,
        ratio: (ratio * 1000.0).round() / 1000.0,
    }
}

fn variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_image_has_ratio_of_zero() {
        let rgb = RgbImage::from_pixel(64, 64, Rgb([128, 128, 128]));
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(!outcome.fired);
    }
}
