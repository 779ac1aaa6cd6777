//! Compares a generic edge-finding filter against an edge-enhance filter.
//! A large mean-intensity disagreement between the two suggests
//! inconsistent sharpening/blurring across the image, as happens at splice
//! boundaries.

use image::GrayImage;

use crate::config::ForensicsConfig;
use crate::image_utils::{EDGE_ENHANCE_MORE_KERNEL, FIND_EDGES_KERNEL, block_mean, convolve_gray};

pub struct EdgeConsistencyOutcome {
    pub fired: bool,
    pub delta: f64,
}

pub fn analyze(gray: &GrayImage, config: &ForensicsConfig) -> EdgeConsistencyOutcome {
    let find_edges = convolve_gray(gray, &FIND_EDGES_KERNEL);
    let edge_enhance = convolve_gray(gray, &EDGE_ENHANCE_MORE_KERNEL);

    let mean_a = block_mean(find_edges.as_raw());
    let mean_b = block_mean(edge_enhance.as_raw());
    let delta = (mean_a - mean_b).abs();

    EdgeConsistencyOutcome {
        fired: delta > config.edge_consistency_diff,
        delta: (delta * 1000.0).round() / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn flat_image_has_small_delta() {
        let gray = GrayImage::from_pixel(32, 32, Luma([90]));
        let outcome = analyze(&gray, &ForensicsConfig::default());
        assert!(!outcome.fired);
    }
}
