//! Weighted aggregation of up to four validation records into a single
//! risk score, with compression-normalization suppression of false
//! positives introduced by benign social-media recompression.

use log::{debug, info};

use crate::compression::CompressionProfiler;
use crate::config::ForensicsConfig;
use crate::validation::{ContentValidationResult, FormatValidationResult, ImageAnalysisResult, StructureValidationResult};
use crate::{Factor, RiskScore, ValidationSeverity};

const WEIGHT_FORMAT: f64 = 0.15;
const WEIGHT_STRUCTURE: f64 = 0.25;
const WEIGHT_CONTENT: f64 = 0.20;
const WEIGHT_IMAGE: f64 = 0.40;

const REAL_TAMPERING_KEYWORDS: [&str; 13] = [
    "CLONE",
    "CLONING",
    "DUPLICATE",
    "DUPLICATED",
    "RESAMPLING",
    "RESAMPLE",
    "MEDIAN_FILTER",
    "MEDIAN FILTER",
    "SMOOTHING",
    "COLOR_CORRELATION",
    "COLOR CORRELATION",
    "EDGE_CONSISTENCY",
    "EDGE INCONSISTENCY",
];

struct ComponentScore {
    score: f64,
    confidence: f64,
    factors: Vec<Factor>,
}

pub struct RiskScorer<'a> {
    config: &'a ForensicsConfig,
}

impl<'a> RiskScorer<'a> {
    pub fn new(config: &'a ForensicsConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        format: Option<&FormatValidationResult>,
        structure: Option<&StructureValidationResult>,
        content: Option<&ContentValidationResult>,
        image: Option<&ImageAnalysisResult>,
    ) -> RiskScore {
        let mut weighted_total = 0.0;
        let mut confidences = Vec::new();
        let mut factors = Vec::new();
        let mut recommendation_context = RecommendationContext::default();

        if let Some(format) = format {
            let component = Self::score_format(format);
            weighted_total += component.score * WEIGHT_FORMAT;
            confidences.push(component.confidence);
            factors.extend(component.factors);
            recommendation_context.spelling_error_count = Some(format.spelling_error_count);
        }

        if let Some(structure) = structure {
            let component = Self::score_structure(structure);
            weighted_total += component.score * WEIGHT_STRUCTURE;
            confidences.push(component.confidence);
            factors.extend(component.factors);
        }

        if let Some(content) = content {
            let component = Self::score_content(content);
            weighted_total += component.score * WEIGHT_CONTENT;
            confidences.push(component.confidence);
            factors.extend(component.factors);
        }

        if let Some(image) = image {
            let component = self.score_image(image);
            let mut image_contribution = component.score;

            if let Some((normalized, factor)) = self.apply_compression_normalization(image, component.score) {
                info!(
                    "compression normalization applied: {:.3} -> {:.3}",
                    component.score, normalized
                );
                image_contribution = normalized;
                factors.push(factor);
            }

            weighted_total += image_contribution * WEIGHT_IMAGE;
            confidences.push(component.confidence);
            factors.extend(component.factors);

            recommendation_context.is_ai_generated = image.is_ai_generated;
            recommendation_context.is_tampered = image.is_tampered;
            recommendation_context.reverse_image_matches = image.reverse_image_matches;
        }

        let overall_score = weighted_total.min(100.0);
        let overall_confidence = if confidences.is_empty() {
            0.5
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };

        let risk_level = self.categorize(overall_score);
        recommendation_context.normalization_applied =
            factors.iter().any(|f| f.factor == "risk_normalization");
        let recommendations = self.generate_recommendations(
            overall_score,
            &recommendation_context,
            structure,
            content,
        );

        debug!(
            "risk score computed: overall_score={:.3} risk_level={:?} confidence={:.3}",
            overall_score, risk_level, overall_confidence
        );

        RiskScore {
            overall_score,
            risk_level,
            confidence: overall_confidence,
            contributing_factors: factors,
            recommendations,
        }
    }

    fn score_format(format: &FormatValidationResult) -> ComponentScore {
        let mut score = 0.0;
        let mut factors = Vec::new();

        for issue in &format.issues {
            let impact = issue.severity.score_value() * 0.1;
            score += impact;
            factors.push(Factor {
                component: "format".into(),
                factor: issue.category.clone(),
                severity: issue.severity,
                impact,
                details: Some(issue.description.clone()),
            });
        }

        if format.has_spelling_errors && format.spelling_error_count > 10 {
            score += 20.0;
            factors.push(Factor {
                component: "format".into(),
                factor: "excessive_spelling_errors".into(),
                severity: ValidationSeverity::Medium,
                impact: 20.0,
                details: Some(format!("{} spelling errors", format.spelling_error_count)),
            });
        }
        if format.has_indentation_issues {
            score += 10.0;
            factors.push(Factor {
                component: "format".into(),
                factor: "indentation_issues".into(),
                severity: ValidationSeverity::Low,
                impact: 10.0,
                details: None,
            });
        }

        let confidence = if format.issues.is_empty() { 0.7 } else { 0.9 };

        ComponentScore {
            score: score.min(100.0),
            confidence,
            factors,
        }
    }

    fn score_structure(structure: &StructureValidationResult) -> ComponentScore {
        let mut score = (1.0 - structure.template_match_score) * 50.0;
        let mut factors = Vec::new();

        if structure.template_match_score < 0.7 {
            factors.push(Factor {
                component: "structure".into(),
                factor: "low_template_match".into(),
                severity: ValidationSeverity::High,
                impact: (1.0 - structure.template_match_score) * 50.0,
                details: None,
            });
        }

        score += structure.missing_sections.len() as f64 * 15.0;

        if !structure.is_complete {
            score += 40.0;
            factors.push(Factor {
                component: "structure".into(),
                factor: "incomplete_document".into(),
                severity: ValidationSeverity::Critical,
                impact: 40.0,
                details: None,
            });
        }

        score += structure
            .issues
            .iter()
            .map(|issue| issue.severity.score_value() * 0.15)
            .sum::<f64>();

        ComponentScore {
            score: score.min(100.0),
            confidence: 0.85,
            factors,
        }
    }

    fn score_content(content: &ContentValidationResult) -> ComponentScore {
        let mut score = (1.0 - content.quality_score) * 30.0;
        let mut factors = Vec::new();

        if content.quality_score < 0.5 {
            factors.push(Factor {
                component: "content".into(),
                factor: "low_quality_score".into(),
                severity: ValidationSeverity::Medium,
                impact: (1.0 - content.quality_score) * 30.0,
                details: None,
            });
        }

        if content.has_sensitive_data {
            score += 25.0;
            factors.push(Factor {
                component: "content".into(),
                factor: "sensitive_data".into(),
                severity: ValidationSeverity::High,
                impact: 25.0,
                details: None,
            });
        }
        if content.readability_score < 30.0 {
            score += 15.0;
            factors.push(Factor {
                component: "content".into(),
                factor: "low_readability".into(),
                severity: ValidationSeverity::Medium,
                impact: 15.0,
                details: Some(format!("readability_score={:.1}", content.readability_score)),
            });
        }
        if content.word_count < 50 {
            score += 20.0;
            factors.push(Factor {
                component: "content".into(),
                factor: "low_word_count".into(),
                severity: ValidationSeverity::Medium,
                impact: 20.0,
                details: Some(format!("word_count={}", content.word_count)),
            });
        }

        for issue in &content.issues {
            let impact = issue.severity.score_value() * 0.12;
            score += impact;
            factors.push(Factor {
                component: "content".into(),
                factor: issue.category.clone(),
                severity: issue.severity,
                impact,
                details: Some(issue.description.clone()),
            });
        }

        ComponentScore {
            score: score.min(100.0),
            confidence: 0.80,
            factors,
        }
    }

    fn score_image(&self, image: &ImageAnalysisResult) -> ComponentScore {
        let mut score = 0.0;
        let mut factors = Vec::new();

        if image.is_ai_generated {
            let impact = image.ai_detection_confidence * 80.0;
            score += impact;
            factors.push(Factor {
                component: "image".into(),
                factor: "ai_generated".into(),
                severity: ValidationSeverity::Critical,
                impact,
                details: None,
            });
        }

        if image.is_tampered {
            let impact = image.tampering_confidence * 90.0;
            score += impact;
            factors.push(Factor {
                component: "image".into(),
                factor: "tampered".into(),
                severity: ValidationSeverity::Critical,
                impact,
                details: None,
            });
        }

        if image.reverse_image_matches > 5 {
            let impact = (image.reverse_image_matches as f64 * 5.0).min(50.0);
            score += impact;
            factors.push(Factor {
                component: "image".into(),
                factor: "reverse_image_matches".into(),
                severity: ValidationSeverity::Medium,
                impact,
                details: Some(format!("{} matches", image.reverse_image_matches)),
            });
        }

        for issue in &image.metadata_issues {
            let impact = issue.severity.score_value() * 0.20;
            score += impact;
            factors.push(Factor {
                component: "image".into(),
                factor: issue.category.clone(),
                severity: issue.severity,
                impact,
                details: Some(issue.description.clone()),
            });
        }

        for issue in &image.forensic_findings {
            let impact = issue.severity.score_value() * 0.25;
            score += impact;
            factors.push(Factor {
                component: "image".into(),
                factor: issue.category.clone(),
                severity: issue.severity,
                impact,
                details: Some(issue.description.clone()),
            });
        }

        if !image.is_authentic {
            score += 30.0;
            factors.push(Factor {
                component: "image".into(),
                factor: "not_authentic".into(),
                severity: ValidationSeverity::High,
                impact: 30.0,
                details: None,
            });
        }

        let confidence = if image.ai_detection_confidence > 0.0 || image.tampering_confidence > 0.0 {
            0.9
        } else {
            0.7
        };

        ComponentScore {
            score: score.min(100.0),
            confidence,
            factors,
        }
    }

    fn apply_compression_normalization(
        &self,
        image: &ImageAnalysisResult,
        original_score: f64,
    ) -> Option<(f64, Factor)> {
        if image.compression_profiles.is_empty() {
            return None;
        }

        let social = CompressionProfiler::is_social_media_compressed(&image.compression_profiles);
        if !social {
            return None;
        }

        let real_tampering = image.forensic_findings.iter().any(|finding| {
            let upper = finding.description.to_uppercase();
            REAL_TAMPERING_KEYWORDS
                .iter()
                .any(|keyword| upper.contains(keyword))
        });
        if real_tampering {
            return None;
        }

        let (factor_value, explanation) = match image.ela_variance {
            None => (self.config.risk_normalization_reduction_medium, "medium compression (no ELA variance available)"),
            Some(variance) if variance < 100.0 => {
                (self.config.risk_normalization_reduction_low, "heavy social media compression")
            }
            Some(variance) if variance < 200.0 => {
                (self.config.risk_normalization_reduction_medium, "moderate social media compression")
            }
            Some(_) => (self.config.risk_normalization_reduction_high, "light social media compression"),
        };

        let normalized = original_score * factor_value;
        let impact = original_score - normalized;

        Some((
            normalized,
            Factor {
                component: "image".into(),
                factor: "risk_normalization".into(),
                severity: ValidationSeverity::Low,
                impact,
                details: Some(explanation.to_string()),
            },
        ))
    }

    fn categorize(&self, score: f64) -> ValidationSeverity {
        if score < self.config.risk_threshold_low {
            ValidationSeverity::Low
        } else if score < self.config.risk_threshold_medium {
            ValidationSeverity::Medium
        } else if score < self.config.risk_threshold_high {
            ValidationSeverity::High
        } else {
            ValidationSeverity::Critical
        }
    }

    fn generate_recommendations(
        &self,
        score: f64,
        context: &RecommendationContext,
        structure: Option<&StructureValidationResult>,
        content: Option<&ContentValidationResult>,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if context.normalization_applied {
            recommendations.push(
                "Score reduced: forensic signal is consistent with known social-media recompression.".to_string(),
            );
        }

        if score > self.config.risk_threshold_high {
            recommendations.push("REJECT: document requires mandatory manual review.".to_string());
        } else if score > self.config.risk_threshold_medium {
            recommendations.push("HOLD: request supporting documentation before proceeding.".to_string());
        } else if score > self.config.risk_threshold_low {
            recommendations.push("REVIEW: document flagged for additional scrutiny.".to_string());
        } else {
            recommendations.push("ACCEPT: document passes automated checks.".to_string());
        }

        if context.is_ai_generated {
            recommendations.push(
                "Request the original, high-resolution document and verify via an alternative channel.".to_string(),
            );
        }

        if context.is_tampered {
            recommendations
                .push("Flag for fraud investigation and compare against the issuing authority's records.".to_string());
        }

        if context.reverse_image_matches > 5 {
            recommendations.push("Image may be stock photography or previously published elsewhere.".to_string());
        }

        if let Some(structure) = structure {
            if !structure.is_complete {
                recommendations.push("Request a complete version of the document.".to_string());
            }
            if !structure.missing_sections.is_empty() {
                let listed = structure
                    .missing_sections
                    .iter()
                    .take(3)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                recommendations.push(format!("Missing sections: {}", listed));
            }
        }

        if let Some(content) = content {
            if content.has_sensitive_data {
                recommendations.push("Route to PII compliance review.".to_string());
            }
        }

        if let Some(format_error_count) = context.spelling_error_count {
            if format_error_count > 20 {
                recommendations.push("High spelling error count; flag as potentially fake.".to_string());
            }
        }

        recommendations.truncate(10);
        recommendations
    }
}

#[derive(Default)]
struct RecommendationContext {
    is_ai_generated: bool,
    is_tampered: bool,
    reverse_image_matches: u32,
    normalization_applied: bool,
    spelling_error_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompressionProfile, ProfileConfidence, ValidationIssue};

    fn clean_structure() -> StructureValidationResult {
        StructureValidationResult {
            template_match_score: 0.95,
            missing_sections: vec![],
            is_complete: true,
            issues: vec![],
        }
    }

    fn clean_content() -> ContentValidationResult {
        ContentValidationResult {
            quality_score: 0.85,
            has_sensitive_data: false,
            readability_score: 65.0,
            word_count: 500,
            issues: vec![],
        }
    }

    fn clean_image() -> ImageAnalysisResult {
        ImageAnalysisResult {
            is_authentic: true,
            ..Default::default()
        }
    }

    #[test]
    fn no_inputs_yields_zero_score_and_low_risk() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);
        let result = scorer.score(None, None, None, None);

        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.risk_level, ValidationSeverity::Low);
        assert_eq!(result.confidence, 0.5);
        assert!(result.contributing_factors.is_empty());
    }

    #[test]
    fn all_clean_inputs_produce_low_risk_accept_recommendation() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);
        let format = FormatValidationResult::default();
        let structure = clean_structure();
        let content = clean_content();
        let image = clean_image();

        let result = scorer.score(Some(&format), Some(&structure), Some(&content), Some(&image));

        assert!(result.overall_score < 25.0);
        assert_eq!(result.risk_level, ValidationSeverity::Low);
        assert!(result.recommendations[0].starts_with("ACCEPT"));
    }

    #[test]
    fn tampered_image_raises_score_and_recommends_fraud_investigation() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);
        let image = ImageAnalysisResult {
            is_tampered: true,
            tampering_confidence: 0.92,
            is_authentic: false,
            ..Default::default()
        };

        let result = scorer.score(None, Some(&clean_structure()), Some(&clean_content()), Some(&image));

        assert!(result.overall_score > 35.0);
        assert!(matches!(
            result.risk_level,
            ValidationSeverity::Medium | ValidationSeverity::High | ValidationSeverity::Critical
        ));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("fraud investigation")));
    }

    #[test]
    fn ai_generated_image_recommends_original_document() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);
        let image = ImageAnalysisResult {
            is_ai_generated: true,
            ai_detection_confidence: 0.95,
            is_authentic: true,
            ..Default::default()
        };

        let result = scorer.score(None, Some(&clean_structure()), Some(&clean_content()), Some(&image));

        assert!(result.overall_score > 35.0);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.to_lowercase().contains("original document")));
    }

    #[test]
    fn all_problematic_inputs_produce_critical_reject() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);

        let format = FormatValidationResult {
            has_spelling_errors: true,
            spelling_error_count: 25,
            has_indentation_issues: true,
            issues: vec![ValidationIssue::new("format", ValidationSeverity::Medium, "spelling")],
        };
        let structure = StructureValidationResult {
            template_match_score: 0.45,
            missing_sections: vec!["footer".into(), "signature".into()],
            is_complete: false,
            issues: vec![],
        };
        let content = ContentValidationResult {
            quality_score: 0.35,
            has_sensitive_data: true,
            readability_score: 20.0,
            word_count: 30,
            issues: vec![],
        };
        let image = ImageAnalysisResult {
            is_tampered: true,
            tampering_confidence: 0.9,
            reverse_image_matches: 10,
            is_authentic: false,
            ..Default::default()
        };

        let result = scorer.score(Some(&format), Some(&structure), Some(&content), Some(&image));

        assert!(result.overall_score > 75.0);
        assert_eq!(result.risk_level, ValidationSeverity::Critical);
        assert!(result.recommendations[0].starts_with("REJECT"));
        assert!(result.contributing_factors.len() >= 5);
    }

    #[test]
    fn compression_profiler_scenarios_match_spec() {
        let whatsapp_exact = CompressionProfiler::detect(30.0, (1280, 1280));
        assert!(whatsapp_exact
            .iter()
            .any(|p| p.profile == "whatsapp_low" && p.confidence == ProfileConfidence::High));

        let whatsapp_loose = CompressionProfiler::detect(30.0, (2000, 2000));
        assert!(whatsapp_loose
            .iter()
            .any(|p| p.profile == "whatsapp_low" && p.confidence == ProfileConfidence::Medium));

        assert!(CompressionProfiler::detect(5.0, (1, 1)).is_empty());
    }

    #[test]
    fn normalization_is_suppressed_by_real_tampering_keyword() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);

        let tampering_finding =
            ValidationIssue::new("tampering", ValidationSeverity::Medium, "Duplicate CLONE blocks detected");

        let profile = CompressionProfile {
            profile: "whatsapp_low".to_string(),
            message: "test".to_string(),
            confidence: ProfileConfidence::High,
            size_match: true,
            ela_range: (10.0, 50.0),
            typical_size: (1280, 1280),
        };

        let image = ImageAnalysisResult {
            is_tampered: true,
            tampering_confidence: 0.9,
            forensic_findings: vec![tampering_finding],
            compression_profiles: vec![profile],
            ela_variance: Some(30.0),
            is_authentic: false,
            ..Default::default()
        };

        let normalized = scorer.apply_compression_normalization(&image, 90.0);
        assert!(normalized.is_none());
    }

    #[test]
    fn normalization_never_increases_score() {
        let config = ForensicsConfig::default();
        let scorer = RiskScorer::new(&config);

        let profile = CompressionProfile {
            profile: "whatsapp_low".to_string(),
            message: "test".to_string(),
            confidence: ProfileConfidence::High,
            size_match: true,
            ela_range: (10.0, 50.0),
            typical_size: (1280, 1280),
        };

        let image = ImageAnalysisResult {
            compression_profiles: vec![profile],
            ela_variance: Some(30.0),
            is_authentic: true,
            ..Default::default()
        };

        let (normalized, _) = scorer.apply_compression_normalization(&image, 50.0).unwrap();
        assert!(normalized <= 50.0);
    }
}
