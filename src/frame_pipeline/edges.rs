//! Smoothing and edge detection module

mod canny_detector;
mod detector;
mod smoothing;

pub use canny_detector::CannyDetector;
pub use detector::EdgeDetector;
pub use smoothing::{gaussian_kernel, smooth};
