//! Error Level Analysis: re-encode at a fixed JPEG quality and diff against
//! the original. Regions with an inconsistent compression history stand out
//! as high-difference outliers.

use std::io::Cursor;

use image::RgbImage;

use crate::config::ForensicsConfig;
use crate::{ValidationIssue, ValidationSeverity};

pub struct ElaOutcome {
    pub performed: bool,
    pub fired: bool,
    pub anomaly_ratio: Option<f64>,
    pub variance: Option<f64>,
    pub confidence: f64,
    pub issue: Option<ValidationIssue>,
}

pub fn analyze(rgb: &RgbImage, config: &ForensicsConfig) -> ElaOutcome {
    match recompress_and_diff(rgb, config.ela_quality) {
        Ok((max_diff, mean, std, variance, anomaly_ratio)) => {
            if max_diff == 0.0 {
                return ElaOutcome {
                    performed: true,
                    fired: false,
                    anomaly_ratio: None,
                    variance: None,
                    confidence: 0.0,
                    issue: None,
                };
            }

            let fired = anomaly_ratio > config.ela_anomaly_threshold;
            let confidence = (anomaly_ratio * 3.0).min(1.0);

            let issue = fired.then(|| {
                ValidationIssue::new(
                    "tampering",
                    ValidationSeverity::High,
                    format!(
                        "Error Level Analysis anomaly ratio {:.3} exceeds threshold (mean={:.2}, std={:.2})",
                        anomaly_ratio, mean, std
                    ),
                )
            });

            ElaOutcome {
                performed: true,
                fired,
                anomaly_ratio: Some(round3(anomaly_ratio)),
                variance: Some(round3(variance)),
                confidence: round3(confidence),
                issue,
            }
        }
        Err(_) => ElaOutcome {
            performed: false,
            fired: false,
            anomaly_ratio: None,
            variance: None,
            confidence: 0.0,
            issue: Some(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Low,
                "Error Level Analysis could not be performed",
            )),
        },
    }
}

fn recompress_and_diff(
    rgb: &RgbImage,
    quality: u8,
) -> crate::error::Result<(f64, f64, f64, f64, f64)> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    image::DynamicImage::ImageRgb8(rgb.clone()).write_with_encoder(encoder)?;

    buffer.set_position(0);
    let recompressed = image::load_from_memory(&buffer.into_inner())?.to_rgb8();

    let mut differences = Vec::with_capacity((rgb.width() * rgb.height() * 3) as usize);
    let mut max_diff = 0.0f64;

    for (orig, recomp) in rgb.pixels().zip(recompressed.pixels()) {
        for c in 0..3 {
            let diff = (orig[c] as f64 - recomp[c] as f64).abs();
            max_diff = max_diff.max(diff);
            differences.push(diff);
        }
    }

    if max_diff == 0.0 {
        return Ok((0.0, 0.0, 0.0, 0.0, 0.0));
    }

    let scale = 255.0 / max_diff;
    let scaled: Vec<f64> = differences.iter().map(|d| d * scale).collect();

    let mean = scaled.iter().sum::<f64>() / scaled.len() as f64;
    let variance = scaled.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
    let std = variance.sqrt();
    let threshold = mean + 2.0 * std;

    let anomaly_count = scaled.iter().filter(|&&d| d > threshold).count();
    let anomaly_ratio = anomaly_count as f64 / scaled.len() as f64;

    Ok((max_diff, mean, std, variance, anomaly_ratio))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_recompression_of_solid_color_has_no_anomaly() {
        let rgb = RgbImage::from_pixel(64, 64, image::Rgb([128, 128, 128]));
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(outcome.performed);
        assert!(!outcome.fired);
    }
}
