//! Gaussian smoothing with an explicit kernel size.
//!
//! Both passes run on `f32` samples and the result is rounded to `u8` once,
//! so a flat region keeps its value. Borders are padded by replicating the
//! edge pixel (imageproc's continuity padding), not by reflection.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

type GrayImage32f = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Normalized 1-D Gaussian kernel of `size` taps centred on the middle tap.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let center = (size / 2) as f32;
    let denominator = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let offset = i as f32 - center;
            (-(offset * offset) / denominator).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Convolves rows then columns with `kernel`.
pub fn smooth(gray: &GrayImage, kernel: &[f32]) -> GrayImage {
    if kernel.len() <= 1 {
        return gray.clone();
    }

    let samples: GrayImage32f = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([f32::from(gray.get_pixel(x, y).0[0])])
    });
    let blurred = separable_filter_equal(&samples, kernel);

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([blurred.get_pixel(x, y).0[0].round().clamp(0.0, 255.0) as u8])
    })
}
