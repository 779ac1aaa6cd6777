//! Frequency-domain resampling detection.
//!
//! A genuine 2D FFT (row pass, transpose, row pass, transpose back — the
//! standard separable construction) over the grayscale image. Resizing or
//! other interpolation leaves periodic peaks in the magnitude spectrum once
//! the DC component is suppressed.

use image::{DynamicImage, GrayImage};
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::config::ForensicsConfig;
use crate::image_utils::{downscale_max_dim, median, rgb_to_gray};

const MAX_DIM: u32 = 512;
const DC_SUPPRESSION_RADIUS: i64 = 5;
const TOP_N: usize = 50;

pub struct ResamplingOutcome {
    pub fired: bool,
    pub peak_ratio: f64,
}

pub fn analyze(image: &DynamicImage, config: &ForensicsConfig) -> ResamplingOutcome {
    let downscaled = downscale_max_dim(image, MAX_DIM);
    let gray = rgb_to_gray(&downscaled.to_rgb8());

    let magnitude = fft2d_magnitude(&gray);
    let (height, width) = (magnitude.len(), magnitude[0].len());
    let center_y = height as i64 / 2;
    let center_x = width as i64 / 2;

    let mut remaining = Vec::with_capacity(height * width);
    for (y, row) in magnitude.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let dy = y as i64 - center_y;
            let dx = x as i64 - center_x;
            if dy.abs() <= DC_SUPPRESSION_RADIUS && dx.abs() <= DC_SUPPRESSION_RADIUS {
                continue;
            }
            remaining.push(value);
        }
    }

    if remaining.is_empty() {
        return ResamplingOutcome {
            fired: false,
            peak_ratio: 0.0,
        };
    }

    remaining.sort_by(|a, b| b.partial_cmp(a).unwrap());
    let top_n = remaining.len().min(TOP_N);
    let top_mean = remaining[..top_n].iter().sum::<f64>() / top_n as f64;
    let median_mag = median(&remaining);

    let peak_ratio = top_mean / (median_mag + 1e-8);
    let fired = peak_ratio > config.resampling_fft_peak_ratio;

    ResamplingOutcome {
        fired,
        peak_ratio: (peak_ratio * 1000.0).round() / 1000.0,
    }
}

/// Separable 2D FFT magnitude, zero-frequency shifted to the center.
fn fft2d_magnitude(gray: &GrayImage) -> Vec<Vec<f64>> {
    let (width, height) = gray.dimensions();
    let (width, height) = (width as usize, height as usize);

    let mut rows: Vec<Vec<Complex<f64>>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| Complex::new(gray.get_pixel(x as u32, y as u32)[0] as f64, 0.0))
                .collect()
        })
        .collect();

    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(width);
    for row in rows.iter_mut() {
        fft_row.process(row);
    }

    let mut transposed = transpose(&rows);
    let fft_col = planner.plan_fft_forward(height);
    for col in transposed.iter_mut() {
        fft_col.process(col);
    }

    let result = transpose(&transposed);

    let shifted_rows = shift(height);
    let shifted_cols = shift(width);

    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| result[shifted_rows[y]][shifted_cols[x]].norm())
                .collect()
        })
        .collect()
}

fn transpose(matrix: &[Vec<Complex<f64>>]) -> Vec<Vec<Complex<f64>>> {
    let rows = matrix.len();
    let cols = matrix[0].len();
    let mut out = vec![vec![Complex::new(0.0, 0.0); rows]; cols];
    for (y, row) in matrix.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            out[x][y] = value;
        }
    }
    out
}

/// Index permutation implementing an `fftshift` of length `n`.
fn shift(n: usize) -> Vec<usize> {
    let half = n / 2;
    (0..n).map(|i| (i + half) % n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage};

    #[test]
    fn uniform_image_has_no_resampling_peak() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([100; 3])));
        let outcome = analyze(&image, &ForensicsConfig::default());
        assert!(!outcome.fired);
    }

    #[test]
    fn shift_is_involutive_for_even_length() {
        let s = shift(8);
        let mut back = vec![0; 8];
        for (i, &v) in s.iter().enumerate() {
            back[v] = i;
        }
        assert_eq!(s, back);
    }

    #[test]
    fn fft2d_magnitude_preserves_dimensions() {
        let gray = GrayImage::from_pixel(32, 16, Luma([10]));
        let magnitude = fft2d_magnitude(&gray);
        assert_eq!(magnitude.len(), 16);
        assert_eq!(magnitude[0].len(), 32);
    }
}
