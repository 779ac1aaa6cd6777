//! Inter-channel correlation. Natural photographs have strongly correlated
//! R/G/B channels; spliced or synthetic regions often break that
//! correlation.

use image::RgbImage;
use statrs::statistics::Statistics;

use crate::config::ForensicsConfig;

pub struct ColorCorrelationOutcome {
    pub fired: bool,
    pub mean_correlation: f64,
}

pub fn analyze(rgb: &RgbImage, config: &ForensicsConfig) -> ColorCorrelationOutcome {
    let mut r = Vec::with_capacity((rgb.width() * rgb.height()) as usize);
    let mut g = Vec::with_capacity(r.capacity());
    let mut b = Vec::with_capacity(r.capacity());

    for pixel in rgb.pixels() {
        r.push(pixel[0] as f64);
        g.push(pixel[1] as f64);
        b.push(pixel[2] as f64);
    }

    let correlations = [
        pearson(&r, &g),
        pearson(&r, &b),
        pearson(&g, &b),
    ];
    let mean_correlation = correlations.iter().sum::<f64>() / correlations.len() as f64;

    ColorCorrelationOutcome {
        fired: mean_correlation < config.color_corr_low,
        mean_correlation: (mean_correlation * 1000.0).round() / 1000.0,
    }
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let std_a = a.std_dev();
    let std_b = b.std_dev();

    if std_a < 1e-5 || std_b < 1e-5 {
        return 1.0;
    }

    let mean_a = a.mean();
    let mean_b = b.mean();

    let covariance = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / a.len() as f64;

    covariance / (std_a * std_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn constant_channels_are_treated_as_perfectly_correlated() {
        let rgb = RgbImage::from_pixel(16, 16, Rgb([10, 20, 30]));
        let outcome = analyze(&rgb, &ForensicsConfig::default());
        assert!(!outcome.fired);
        assert_eq!(outcome.mean_correlation, 1.0);
    }
}
