//! Detects prior median filtering by comparing the image against a freshly
//! applied 3x3 median filter — if they're already nearly identical, the
//! image likely went through this filter before.

use image::GrayImage;
use imageproc::filter::median_filter;

use crate::config::ForensicsConfig;

pub struct MedianFilterOutcome {
    pub fired: bool,
    pub mean_diff: f64,
}

pub fn analyze(gray: &GrayImage, config: &ForensicsConfig) -> MedianFilterOutcome {
    let filtered = median_filter(gray, 1, 1);

    let mean_diff = gray
        .pixels()
        .zip(filtered.pixels())
        .map(|(a, b)| (a[0] as f64 - b[0] as f64).abs())
        .sum::<f64>()
        / (gray.width() * gray.height()) as f64;

    MedianFilterOutcome {
        fired: mean_diff < config.median_filter_threshold,
        mean_diff: (mean_diff * 1000.0).round() / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn flat_image_is_already_median_filtered() {
        let gray = GrayImage::from_pixel(32, 32, Luma([77]));
        let outcome = analyze(&gray, &ForensicsConfig::default());
        assert!(outcome.fired);
    }
}
