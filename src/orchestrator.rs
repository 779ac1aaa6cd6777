//! Owns the decoded image for a request and runs the full forensic
//! pipeline: metadata, AI-generation heuristics, and tampering detection in
//! parallel, then compression profiling (which depends on the tampering
//! pass's ELA variance), then aggregation.

use std::path::Path;

use image::GenericImageView;
use log::{debug, info};

use crate::ai_detection::AiDetector;
use crate::cancellation::CancellationToken;
use crate::compression::CompressionProfiler;
use crate::config::ForensicsConfig;
use crate::error::Result;
use crate::metadata::MetadataAnalyzer;
use crate::tampering::TamperingDetector;
use crate::ForensicAnalysisResult;

pub struct ForensicOrchestrator {
    config: ForensicsConfig,
}

impl ForensicOrchestrator {
    pub fn new(config: ForensicsConfig) -> Self {
        Self { config }
    }

    pub fn analyze<P: AsRef<Path>>(
        &self,
        path: P,
        token: &CancellationToken,
    ) -> Result<ForensicAnalysisResult> {
        let path = path.as_ref();
        info!("starting forensic analysis of {}", path.display());

        let raw_bytes = std::fs::read(path)?;
        let image = image::load_from_memory(&raw_bytes)?;

        token.check()?;

        let (metadata_result, (ai_result, tampering_result)) = rayon::join(
            || MetadataAnalyzer::analyze(path),
            || {
                rayon::join(
                    || AiDetector::analyze(&image, &self.config),
                    || TamperingDetector::analyze(&image, &raw_bytes, &self.config, token),
                )
            },
        );

        let metadata = metadata_result?;
        let ai_detection = ai_result;
        let tampering = tampering_result?;

        token.check()?;

        let compression_profiles = match tampering.ela_variance {
            Some(variance) => CompressionProfiler::detect(variance, image.dimensions()),
            None => Vec::new(),
        };

        debug!(
            "tampering verdict: is_tampered={} confidence={:.3}",
            tampering.is_tampered, tampering.confidence
        );

        let authenticity_score = (1.0
            - (tampering.confidence * tampering.is_tampered as u8 as f64)
                .max(ai_detection.confidence * ai_detection.is_ai_generated as u8 as f64))
        .clamp(0.0, 1.0);

        let mut all_issues = metadata.issues.clone();
        all_issues.extend(tampering.issues.clone());

        info!(
            "finished forensic analysis of {}: authenticity_score={:.3}",
            path.display(),
            authenticity_score
        );

        Ok(ForensicAnalysisResult {
            metadata,
            ai_detection,
            tampering,
            compression_profiles,
            authenticity_score,
            all_issues,
        })
    }
}

impl Default for ForensicOrchestrator {
    fn default() -> Self {
        Self::new(ForensicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Write;

    fn write_test_jpeg(path: &std::path::Path) {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, image::Rgb([110, 120, 130])));
        let mut file = std::fs::File::create(path).unwrap();
        let mut buffer = std::io::Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, 90);
        image.write_with_encoder(encoder).unwrap();
        file.write_all(&buffer.into_inner()).unwrap();
    }

    #[test]
    fn analyzing_a_clean_synthetic_jpeg_does_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.jpg");
        write_test_jpeg(&path);

        let orchestrator = ForensicOrchestrator::default();
        let token = CancellationToken::new();
        let result = orchestrator.analyze(&path, &token).unwrap();

        assert!(result.authenticity_score >= 0.0 && result.authenticity_score <= 1.0);
    }

    #[test]
    fn analysis_is_idempotent_on_repeated_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.jpg");
        write_test_jpeg(&path);

        let orchestrator = ForensicOrchestrator::default();
        let token = CancellationToken::new();
        let first = orchestrator.analyze(&path, &token).unwrap();
        let second = orchestrator.analyze(&path, &token).unwrap();

        assert_eq!(first.tampering.ela_variance, second.tampering.ela_variance);
        assert_eq!(first.tampering.is_tampered, second.tampering.is_tampered);
    }
}
