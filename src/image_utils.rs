use std::f64;

use image::{DynamicImage, GrayImage, Luma, RgbImage, imageops::FilterType};

/// PIL's `ImageFilter.FIND_EDGES` kernel.
pub const FIND_EDGES_KERNEL: [[f64; 3]; 3] =
    [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]];
/// PIL's `ImageFilter.EDGE_ENHANCE_MORE` kernel.
pub const EDGE_ENHANCE_MORE_KERNEL: [[f64; 3]; 3] =
    [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]];

pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut gray = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let lum =
            (0.299 * pixel[0] as f64 + 0.587 * pixel[1] as f64 + 0.114 * pixel[2] as f64) as u8;
        gray.put_pixel(x, y, Luma([lum]));
    }

    gray
}

pub fn gaussian_blur_3x3(image: &GrayImage) -> GrayImage {
    let kernel = [
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    ];

    convolve_gray(image, &kernel)
}

pub fn convolve_gray(image: &GrayImage, kernel: &[[f64; 3]; 3]) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = 0.0;

            for ky in 0..3 {
                for kx in 0..3 {
                    let px = image.get_pixel(x + kx - 1, y + ky - 1)[0] as f64;
                    sum += px * kernel[ky as usize][kx as usize];
                }
            }

            result.put_pixel(x, y, Luma([sum.clamp(0.0, 255.0) as u8]));
        }
    }

    result
}

/// Histogram of single-byte channel values, e.g. `image.pixels().map(|p| p[0])`
/// for a grayscale image or one RGB channel at a time for a color image.
pub fn calculate_histogram(values: impl IntoIterator<Item = u8>) -> [u32; 256] {
    let mut histogram = [0u32; 256];

    for value in values {
        histogram[value as usize] += 1;
    }

    histogram
}

/// Extracts a block's raw bytes across all three RGB channels — each pixel
/// contributes three consecutive bytes, so a block differing only in
/// chroma (not luma) hashes or compares differently from a luma-only block.
pub fn extract_rgb_block(image: &RgbImage, x: u32, y: u32, size: u32) -> Vec<u8> {
    let mut block = Vec::with_capacity((size * size * 3) as usize);

    for dy in 0..size {
        for dx in 0..size {
            if x + dx < image.width() && y + dy < image.height() {
                let pixel = image.get_pixel(x + dx, y + dy);
                block.extend_from_slice(&pixel.0);
            }
        }
    }

    block
}

pub fn block_mean(block: &[u8]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }
    block.iter().map(|&v| v as f64).sum::<f64>() / block.len() as f64
}

pub fn block_variance(block: &[u8]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }
    let mean = block_mean(block);
    let variance = block
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / block.len() as f64;

    variance
}

/// 1D Gaussian kernel, radius = ceil(3*sigma), normalized to sum to 1.
fn gaussian_kernel_1d(sigma: f64) -> Vec<f64> {
    let radius = (3.0 * sigma).ceil().max(1.0) as i64;
    let mut kernel = Vec::with_capacity((2 * radius + 1) as usize);
    let two_sigma_sq = 2.0 * sigma * sigma;

    for i in -radius..=radius {
        let v = (-(i as f64 * i as f64) / two_sigma_sq).exp();
        kernel.push(v);
    }

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Separable Gaussian blur for an arbitrary sigma (the fixed 3x3 kernel in
/// `gaussian_blur_3x3` only approximates sigma ~ 0.85).
pub fn gaussian_blur_sigma(image: &GrayImage, sigma: f64) -> GrayImage {
    let (width, height) = image.dimensions();
    let kernel = gaussian_kernel_1d(sigma);
    let radius = (kernel.len() / 2) as i64;

    let mut horizontal = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let dx = k as i64 - radius;
                let sx = (x as i64 + dx).clamp(0, width as i64 - 1) as u32;
                sum += image.get_pixel(sx, y)[0] as f64 * w;
            }
            horizontal.put_pixel(x, y, Luma([sum.clamp(0.0, 255.0) as u8]));
        }
    }

    let mut result = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let dy = k as i64 - radius;
                let sy = (y as i64 + dy).clamp(0, height as i64 - 1) as u32;
                sum += horizontal.get_pixel(x, sy)[0] as f64 * w;
            }
            result.put_pixel(x, y, Luma([sum.clamp(0.0, 255.0) as u8]));
        }
    }

    result
}

/// Downscale so the longer dimension is exactly `max_dim`, Lanczos resampled.
/// No-op if the image already fits.
pub fn downscale_max_dim(image: &DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let longest = width.max(height);

    if longest <= max_dim {
        return image.clone();
    }

    let scale = max_dim as f64 / longest as f64;
    let new_width = ((width as f64) * scale).round().max(1.0) as u32;
    let new_height = ((height as f64) * scale).round().max(1.0) as u32;

    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Shannon entropy in bits of a 256-bin histogram.
pub fn shannon_entropy(histogram: &[u32; 256]) -> f64 {
    let total: u32 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Median of a slice of f64 values. Returns 0.0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Robust noise-level estimate: median absolute deviation scaled to be a
/// consistent estimator of the standard deviation under a normal model.
pub fn mad_noise_estimate(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|&v| (v - med).abs()).collect();
    median(&deviations) * 1.4826
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shannon_entropy_of_uniform_histogram_is_eight_bits() {
        let histogram = [1u32; 256];
        let entropy = shannon_entropy(&histogram);
        assert!((entropy - 8.0).abs() < 1e-9);
    }

    #[test]
    fn shannon_entropy_of_single_bin_is_zero() {
        let mut histogram = [0u32; 256];
        histogram[42] = 100;
        assert_eq!(shannon_entropy(&histogram), 0.0);
    }

    #[test]
    fn median_of_odd_length() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn median_of_even_length() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn gaussian_blur_sigma_preserves_dimensions() {
        let img = GrayImage::from_pixel(20, 20, Luma([128]));
        let blurred = gaussian_blur_sigma(&img, 2.0);
        assert_eq!(blurred.dimensions(), (20, 20));
    }
}
