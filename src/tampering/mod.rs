//! Runs nine independent forensic sub-analyses over a decoded image and
//! aggregates them into a single tampering verdict.

mod clone_detection;
mod color_correlation;
mod compression_consistency;
mod edge_consistency;
mod ela;
mod median_filter;
mod noise_ratio;
mod quantization;
mod resampling;

use image::DynamicImage;
use parking_lot::Mutex;

use crate::cancellation::CancellationToken;
use crate::config::ForensicsConfig;
use crate::error::Result;
use crate::image_utils::rgb_to_gray;
use crate::{TamperingDetectionResult, ValidationIssue, ValidationSeverity};

#[derive(Default)]
struct Accumulator {
    ela: Option<ela::ElaOutcome>,
    clone: Option<clone_detection::CloneOutcome>,
    compression: Option<compression_consistency::CompressionConsistencyOutcome>,
    quantization: Option<quantization::QuantizationOutcome>,
    resampling: Option<resampling::ResamplingOutcome>,
    median: Option<median_filter::MedianFilterOutcome>,
    color: Option<color_correlation::ColorCorrelationOutcome>,
    noise: Option<noise_ratio::NoiseRatioOutcome>,
    edge: Option<edge_consistency::EdgeConsistencyOutcome>,
}

pub struct TamperingDetector;

impl TamperingDetector {
    /// `raw_bytes` is the original encoded file, needed only for the
    /// quantization-table inspection; every other sub-analysis works off
    /// the already-decoded `image`.
    pub fn analyze(
        image: &DynamicImage,
        raw_bytes: &[u8],
        config: &ForensicsConfig,
        token: &CancellationToken,
    ) -> Result<TamperingDetectionResult> {
        token.check()?;

        let rgb = image.to_rgb8();
        let gray = rgb_to_gray(&rgb);

        let accumulator = Mutex::new(Accumulator::default());

        rayon::scope(|scope| {
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = ela::analyze(&rgb, config);
                accumulator.lock().ela = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = clone_detection::analyze(&rgb, config);
                accumulator.lock().clone = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = compression_consistency::analyze(&rgb, config);
                accumulator.lock().compression = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = quantization::analyze(raw_bytes);
                accumulator.lock().quantization = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = resampling::analyze(image, config);
                accumulator.lock().resampling = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = median_filter::analyze(&gray, config);
                accumulator.lock().median = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = color_correlation::analyze(&rgb, config);
                accumulator.lock().color = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = noise_ratio::analyze(&rgb, config);
                accumulator.lock().noise = Some(outcome);
            });
            scope.spawn(|_| {
                if token.is_cancelled() {
                    return;
                }
                let outcome = edge_consistency::analyze(&gray, config);
                accumulator.lock().edge = Some(outcome);
            });
        });

        token.check()?;

        let acc = accumulator.into_inner();
        Ok(Self::aggregate(acc))
    }

    fn aggregate(acc: Accumulator) -> TamperingDetectionResult {
        let mut issues = Vec::new();

        let ela = acc.ela.expect("ela sub-analysis always runs");
        if let Some(issue) = &ela.issue {
            issues.push(issue.clone());
        }

        let clone = acc.clone.expect("clone sub-analysis always runs");
        if clone.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!(
                    "Duplicate cloned blocks detected (duplicate_ratio={:.3})",
                    clone.duplicate_ratio
                ),
            ));
        }

        let compression = acc
            .compression
            .expect("compression-consistency sub-analysis always runs");
        if !compression.consistent {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!(
                    "Inconsistent compression across image quadrants (std={:.3})",
                    compression.std_of_variances
                ),
            ));
        }

        let quantization = acc
            .quantization
            .expect("quantization sub-analysis always runs");
        if quantization.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                "Anomalous JPEG quantization table values",
            ));
        }

        let resampling = acc
            .resampling
            .expect("resampling sub-analysis always runs");
        if resampling.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!(
                    "Resampling artifacts detected in frequency spectrum (peak_ratio={:.3})",
                    resampling.peak_ratio
                ),
            ));
        }

        let median = acc.median.expect("median-filter sub-analysis always runs");
        if median.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                "Median filter smoothing detected",
            ));
        }

        let color = acc
            .color
            .expect("color-correlation sub-analysis always runs");
        if color.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!(
                    "Abnormal color correlation between channels (mean_correlation={:.3})",
                    color.mean_correlation
                ),
            ));
        }

        let noise = acc.noise.expect("noise-ratio sub-analysis always runs");
        if noise.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!("Noise ratio anomaly between image regions (ratio={:.3})", noise.ratio),
            ));
        }

        let edge = acc.edge.expect("edge-consistency sub-analysis always runs");
        if edge.fired {
            issues.push(ValidationIssue::new(
                "tampering",
                ValidationSeverity::Medium,
                format!(
                    "Edge inconsistency detected between filter outputs (delta={:.3})",
                    edge.delta
                ),
            ));
        }

        let non_ela_fired_count = [
            clone.fired,
            !compression.consistent,
            quantization.fired,
            resampling.fired,
            median.fired,
            color.fired,
            noise.fired,
            edge.fired,
        ]
        .iter()
        .filter(|&&fired| fired)
        .count();

        let (is_tampered, confidence) = if ela.fired {
            (true, ela.confidence)
        } else {
            let confidence = match non_ela_fired_count {
                0 => 0.0,
                1 => 0.50,
                2 => 0.70,
                _ => 0.85,
            };
            (non_ela_fired_count > 0, confidence)
        };

        TamperingDetectionResult {
            is_tampered,
            confidence,
            ela_performed: ela.performed,
            ela_anomaly_ratio: ela.anomaly_ratio,
            ela_variance: ela.variance,
            has_cloned_regions: clone.fired,
            compression_consistent: compression.consistent,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn flat_image_is_not_tampered() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(128, 128, image::Rgb([120; 3])));
        let mut buffer = std::io::Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 90);
        image.write_with_encoder(encoder).unwrap();
        let raw_bytes = buffer.into_inner();

        let result = TamperingDetector::analyze(
            &image,
            &raw_bytes,
            &ForensicsConfig::default(),
            &CancellationToken::new(),
        )
        .unwrap();

        assert!(!result.is_tampered);
        assert!(result.compression_consistent);
    }

    #[test]
    fn cancelled_token_aborts_before_running() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, image::Rgb([1; 3])));
        let token = CancellationToken::new();
        token.cancel();

        let result = TamperingDetector::analyze(&image, &[], &ForensicsConfig::default(), &token);
        assert!(result.is_err());
    }
}
