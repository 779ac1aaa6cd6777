//! Heuristic AI-generation detector.
//!
//! Not a learned classifier — three cheap statistics (noise level, color
//! entropy, edge-detector agreement) combined by fixed thresholds. Good
//! enough to contribute a direction to the risk scorer, not a calibrated
//! probability.

use image::{DynamicImage, Rgb, RgbImage};

use crate::image_utils::{self, EDGE_ENHANCE_MORE_KERNEL, FIND_EDGES_KERNEL, gaussian_blur_3x3};
use crate::{AIDetectionResult, config::ForensicsConfig};

const NOISE_THRESHOLD: f64 = 2.0;
const ENTROPY_THRESHOLD: f64 = 6.5;
const EDGE_CONSISTENCY_THRESHOLD: f64 = 0.6;

pub struct AiDetector;

impl AiDetector {
    pub fn analyze(image: &DynamicImage, _config: &ForensicsConfig) -> AIDetectionResult {
        let rgb = image.to_rgb8();
        let gray = image_utils::rgb_to_gray(&rgb);

        let noise_level = Self::estimate_noise_level(&gray);
        let color_entropy = Self::average_channel_entropy(&rgb);
        let edge_consistency_score = Self::edge_consistency_score(&gray);

        let has_ai_artifacts = noise_level < NOISE_THRESHOLD && color_entropy < ENTROPY_THRESHOLD;
        let is_ai_generated = has_ai_artifacts && edge_consistency_score < EDGE_CONSISTENCY_THRESHOLD;

        let confidence = (0.5 * (1.0 - (noise_level / 5.0).min(1.0))
            + 0.3 * (1.0 - (color_entropy / 8.0).min(1.0))
            + 0.2 * (1.0 - edge_consistency_score))
            .clamp(0.0, 1.0);

        let mut detection_factors = Vec::new();
        if noise_level < NOISE_THRESHOLD {
            detection_factors.push("unnaturally low noise level".to_string());
        }
        if color_entropy < ENTROPY_THRESHOLD {
            detection_factors.push("low color entropy".to_string());
        }
        if edge_consistency_score < EDGE_CONSISTENCY_THRESHOLD {
            detection_factors.push("edge detector disagreement".to_string());
        }

        AIDetectionResult {
            is_ai_generated,
            confidence: round3(confidence),
            noise_level: round3(noise_level),
            color_entropy: round3(color_entropy),
            edge_consistency_score: round3(edge_consistency_score),
            has_ai_artifacts,
            detection_factors,
        }
    }

    fn estimate_noise_level(gray: &image::GrayImage) -> f64 {
        let blurred = gaussian_blur_3x3(gray);
        let residuals: Vec<f64> = gray
            .pixels()
            .zip(blurred.pixels())
            .map(|(a, b)| a[0] as f64 - b[0] as f64)
            .collect();
        image_utils::mad_noise_estimate(&residuals)
    }

    fn average_channel_entropy(rgb: &RgbImage) -> f64 {
        let red = image_utils::calculate_histogram(rgb.pixels().map(|p| p[0]));
        let green = image_utils::calculate_histogram(rgb.pixels().map(|p| p[1]));
        let blue = image_utils::calculate_histogram(rgb.pixels().map(|p| p[2]));

        [red, green, blue]
            .iter()
            .map(|h| image_utils::shannon_entropy(h))
            .sum::<f64>()
            / 3.0
    }

    fn edge_consistency_score(gray: &image::GrayImage) -> f64 {
        let find_edges = image_utils::convolve_gray(gray, &FIND_EDGES_KERNEL);
        let edge_enhance = image_utils::convolve_gray(gray, &EDGE_ENHANCE_MORE_KERNEL);

        let mean_a = image_utils::block_mean(find_edges.as_raw());
        let mean_b = image_utils::block_mean(edge_enhance.as_raw());
        let delta = (mean_a - mean_b).abs();

        1.0 - (delta / 255.0).min(1.0)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn uniform_image_has_zero_noise_and_entropy() {
        let gray = GrayImage::from_pixel(64, 64, Luma([128]));
        let noise = AiDetector::estimate_noise_level(&gray);
        assert_eq!(noise, 0.0);
    }

    #[test]
    fn analyze_produces_scores_in_range() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([100, 150, 200])));
        let result = AiDetector::analyze(&image, &ForensicsConfig::default());
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
        assert!(result.edge_consistency_score >= 0.0 && result.edge_consistency_score <= 1.0);
    }
}
