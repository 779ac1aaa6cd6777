//! Image forensic analysis and compression-normalizing risk scoring.
//!
//! The pipeline runs a metadata analyzer, a heuristic AI-generation
//! detector, a nine-way tampering detector, and a compression profiler over
//! a decoded raster image, then aggregates the result. A separate risk
//! scorer blends that aggregation with up to three externally-produced text
//! validation records into a single weighted score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod ai_detection;
pub mod cancellation;
pub mod compression;
pub mod config;
pub mod error;
pub mod image_utils;
pub mod metadata;
pub mod orchestrator;
pub mod risk;
pub mod tampering;
pub mod validation;

pub use ai_detection::AiDetector;
pub use cancellation::CancellationToken;
pub use compression::CompressionProfiler;
pub use config::ForensicsConfig;
pub use metadata::MetadataAnalyzer;
pub use orchestrator::ForensicOrchestrator;
pub use risk::RiskScorer;
pub use tampering::TamperingDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ValidationSeverity {
    pub fn score_value(self) -> f64 {
        match self {
            ValidationSeverity::Low => 10.0,
            ValidationSeverity::Medium => 30.0,
            ValidationSeverity::High => 60.0,
            ValidationSeverity::Critical => 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub category: String,
    pub severity: ValidationSeverity,
    pub description: String,
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl ValidationIssue {
    pub fn new(
        category: impl Into<String>,
        severity: ValidationSeverity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            severity,
            description: description.into(),
            details: serde_json::Map::new(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Map<String, serde_json::Value>) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataAnalysisResult {
    pub has_exif: bool,
    pub has_editing_software_signs: bool,
    pub has_timestamp_inconsistencies: bool,
    pub has_camera_info: bool,
    pub exif_data: Option<BTreeMap<String, String>>,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIDetectionResult {
    pub is_ai_generated: bool,
    pub confidence: f64,
    pub noise_level: f64,
    pub color_entropy: f64,
    pub edge_consistency_score: f64,
    pub has_ai_artifacts: bool,
    pub detection_factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TamperingDetectionResult {
    pub is_tampered: bool,
    pub confidence: f64,
    pub ela_performed: bool,
    pub ela_anomaly_ratio: Option<f64>,
    pub ela_variance: Option<f64>,
    pub has_cloned_regions: bool,
    pub compression_consistent: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProfileConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionProfile {
    pub profile: String,
    pub message: String,
    pub confidence: ProfileConfidence,
    pub size_match: bool,
    pub ela_range: (f64, f64),
    pub typical_size: (u32, u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForensicAnalysisResult {
    pub metadata: MetadataAnalysisResult,
    pub ai_detection: AIDetectionResult,
    pub tampering: TamperingDetectionResult,
    pub compression_profiles: Vec<CompressionProfile>,
    pub authenticity_score: f64,
    pub all_issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factor {
    pub component: String,
    pub factor: String,
    pub severity: ValidationSeverity,
    pub impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScore {
    pub overall_score: f64,
    pub risk_level: ValidationSeverity,
    pub confidence: f64,
    pub contributing_factors: Vec<Factor>,
    pub recommendations: Vec<String>,
}
