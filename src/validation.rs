//! Boundary records produced by the three external text validators and by
//! this crate's own forensic orchestrator, as consumed by the risk scorer.
//!
//! None of these types carry behavior of their own — they are the typed
//! stand-in for the duck-typed records the Python service passed across
//! its service boundary. Fields mirror every attribute access the risk
//! scorer makes on each record.

use serde::{Deserialize, Serialize};

use crate::{CompressionProfile, ForensicAnalysisResult, ValidationIssue};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatValidationResult {
    pub has_spelling_errors: bool,
    pub spelling_error_count: u32,
    pub has_indentation_issues: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureValidationResult {
    pub template_match_score: f64,
    pub missing_sections: Vec<String>,
    pub is_complete: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentValidationResult {
    pub quality_score: f64,
    pub has_sensitive_data: bool,
    pub readability_score: f64,
    pub word_count: u32,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysisResult {
    pub is_ai_generated: bool,
    pub ai_detection_confidence: f64,
    pub is_tampered: bool,
    pub tampering_confidence: f64,
    pub reverse_image_matches: u32,
    pub metadata_issues: Vec<ValidationIssue>,
    pub forensic_findings: Vec<ValidationIssue>,
    pub is_authentic: bool,
    pub compression_profiles: Vec<CompressionProfile>,
    pub ela_variance: Option<f64>,
}

impl ImageAnalysisResult {
    /// Attach a reverse-image-search match count obtained externally — this
    /// crate never performs that search itself.
    pub fn with_reverse_image_matches(mut self, matches: u32) -> Self {
        self.reverse_image_matches = matches;
        self
    }
}

impl From<&ForensicAnalysisResult> for ImageAnalysisResult {
    fn from(result: &ForensicAnalysisResult) -> Self {
        Self {
            is_ai_generated: result.ai_detection.is_ai_generated,
            ai_detection_confidence: result.ai_detection.confidence,
            is_tampered: result.tampering.is_tampered,
            tampering_confidence: result.tampering.confidence,
            reverse_image_matches: 0,
            metadata_issues: result.metadata.issues.clone(),
            forensic_findings: result.tampering.issues.clone(),
            is_authentic: result.authenticity_score >= 0.5,
            compression_profiles: result.compression_profiles.clone(),
            ela_variance: result.tampering.ela_variance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_image_matches_builder_overrides_default() {
        let result = ImageAnalysisResult::default().with_reverse_image_matches(7);
        assert_eq!(result.reverse_image_matches, 7);
    }
}
