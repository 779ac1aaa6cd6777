//! Splits the image into four quadrants and compares per-quadrant pixel
//! variance. Real photographs compress fairly uniformly; a spliced region
//! from a different source tends to stand out with a differing variance.
//! Variance is computed over all three RGB channels, flattened, matching
//! `np.var` over a multi-channel array quadrant.

use image::RgbImage;

use crate::config::ForensicsConfig;
use crate::image_utils::block_variance;

pub struct CompressionConsistencyOutcome {
    pub consistent: bool,
    pub std_of_variances: f64,
}

pub fn analyze(rgb: &RgbImage, config: &ForensicsConfig) -> CompressionConsistencyOutcome {
    let (width, height) = rgb.dimensions();
    let half_w = width / 2;
    let half_h = height / 2;

    let quadrants = [
        (0, 0, half_w, half_h),
        (half_w, 0, width - half_w, half_h),
        (0, half_h, half_w, height - half_h),
        (half_w, half_h, width - half_w, height - half_h),
    ];

    let variances: Vec<f64> = quadrants
        .iter()
        .map(|&(x0, y0, w, h)| {
            let mut bytes = Vec::with_capacity((w * h * 3) as usize);
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    bytes.extend_from_slice(&rgb.get_pixel(x, y).0);
                }
            }
            block_variance(&bytes)
        })
        .collect();

    let mean = variances.iter().sum::<f64>() / variances.len() as f64;
    let std_of_variances = (variances.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / variances.len() as f64)
        .sqrt();

    CompressionConsistencyOutcome {
        consistent: std_of_variances < config.compression_variance_threshold,
        std_of_variances: (std_of_variances * 1000.0).round() / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_image_is_compression_consistent() {
        let rgb = RgbImage::from_pixel(64, 64, Rgb([100, 100, 100]));
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(outcome.consistent);
    }
}
