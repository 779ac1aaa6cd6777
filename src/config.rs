//! Immutable configuration snapshot for the forensic pipeline.
//!
//! Read once (by convention, at process startup) and shared read-only
//! across requests via `Arc<ForensicsConfig>`. Tests construct overridden
//! instances directly rather than going through any external loader.

#[derive(Debug, Clone, PartialEq)]
pub struct ForensicsConfig {
    pub ela_quality: u8,
    pub ela_anomaly_threshold: f64,
    pub ela_very_low: f64,
    pub ela_low: f64,
    pub ela_high: f64,
    pub ela_very_high: f64,

    pub clone_region_size: u32,
    pub clone_duplicate_ratio_threshold: f64,
    /// Configured but intentionally unused: clone detection does not check
    /// spatial distance between duplicate blocks, only `duplicate_ratio`.
    pub clone_distance_min_blocks: u32,

    pub compression_variance_threshold: f64,

    pub noise_ratio_max: f64,
    pub edge_consistency_diff: f64,
    pub resampling_fft_peak_ratio: f64,
    pub color_corr_low: f64,
    pub median_filter_threshold: f64,

    pub risk_threshold_low: f64,
    pub risk_threshold_medium: f64,
    pub risk_threshold_high: f64,

    pub risk_normalization_reduction_low: f64,
    pub risk_normalization_reduction_medium: f64,
    pub risk_normalization_reduction_high: f64,
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            ela_quality: 90,
            ela_anomaly_threshold: 0.15,
            ela_very_low: 15.0,
            ela_low: 40.0,
            ela_high: 600.0,
            ela_very_high: 1000.0,

            clone_region_size: 32,
            clone_duplicate_ratio_threshold: 0.05,
            clone_distance_min_blocks: 2,

            compression_variance_threshold: 1000.0,

            noise_ratio_max: 3.0,
            edge_consistency_diff: 20.0,
            resampling_fft_peak_ratio: 8.0,
            color_corr_low: 0.85,
            median_filter_threshold: 1.0,

            risk_threshold_low: 25.0,
            risk_threshold_medium: 50.0,
            risk_threshold_high: 75.0,

            risk_normalization_reduction_low: 0.4,
            risk_normalization_reduction_medium: 0.5,
            risk_normalization_reduction_high: 0.65,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = ForensicsConfig::default();
        assert_eq!(cfg.ela_anomaly_threshold, 0.15);
        assert_eq!(cfg.clone_duplicate_ratio_threshold, 0.05);
        assert_eq!(cfg.risk_threshold_low, 25.0);
        assert_eq!(cfg.risk_normalization_reduction_high, 0.65);
    }
}
