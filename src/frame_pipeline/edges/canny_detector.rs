//! Canny-style edge detection on a pre-smoothed grayscale image.
//!
//! 1. Sobel gradients (`imageproc::gradients`, borders replicated).
//! 2. Gradient magnitude with the configured norm.
//! 3. Non-maximum suppression along the gradient direction quantized to
//!    0°, 45°, 90° or 135°. Pixels outside the image count as zero magnitude.
//!    On horizontal and vertical sectors a plateau keeps its first pixel;
//!    diagonal ties are suppressed.
//! 4. Hysteresis: magnitudes above the high threshold seed edges, which grow
//!    through 8-connected pixels above the low threshold.
//!
//! The input is not smoothed again here; the caller owns the blur step.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::trace;

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::config::{GradientNorm, ProcessorConfig};
use crate::frame_pipeline::edges::detector::EdgeDetector;

const TAN_22_5_DEG: f32 = 0.414_213_56;
const TAN_67_5_DEG: f32 = 2.414_213_6;

const EDGE: u8 = u8::MAX;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Candidate {
    None,
    Weak,
    Strong,
}

#[derive(Debug, Clone, Copy)]
pub struct CannyDetector {
    low_threshold: f32,
    high_threshold: f32,
    norm: GradientNorm,
}

impl CannyDetector {
    pub fn new(low_threshold: f32, high_threshold: f32, norm: GradientNorm) -> Self {
        Self {
            low_threshold,
            high_threshold,
            norm,
        }
    }

    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(config.low_threshold, config.high_threshold, config.gradient_norm)
    }
}

impl Default for CannyDetector {
    fn default() -> Self {
        Self::from_config(&ProcessorConfig::default())
    }
}

impl EdgeDetector for CannyDetector {
    fn detect(&self, smoothed: &GrayImage) -> Result<GrayImage> {
        let (width, height) = smoothed.dimensions();
        let gx = horizontal_sobel(smoothed);
        let gy = vertical_sobel(smoothed);

        let gradients = Gradients {
            gx: gx.as_raw(),
            gy: gy.as_raw(),
            magnitude: gx
                .as_raw()
                .iter()
                .zip(gy.as_raw())
                .map(|(&x, &y)| magnitude(x, y, self.norm))
                .collect(),
            width: width as usize,
            height: height as usize,
        };

        let candidates = gradients.suppress_non_maxima(self.low_threshold, self.high_threshold);
        let edges = hysteresis(&candidates, gradients.width, gradients.height);
        trace!(
            width,
            height,
            edge_pixels = edges.iter().filter(|&&v| v == EDGE).count(),
            "Edge detection complete"
        );

        GrayImage::from_raw(width, height, edges).ok_or_else(|| {
            FrameError::ConversionFailure(format!(
                "edge map does not match a {width}x{height} image"
            ))
        })
    }
}

#[inline]
fn magnitude(gx: i16, gy: i16, norm: GradientNorm) -> f32 {
    let (gx, gy) = (f32::from(gx), f32::from(gy));
    match norm {
        GradientNorm::L1 => gx.abs() + gy.abs(),
        GradientNorm::L2 => (gx * gx + gy * gy).sqrt(),
    }
}

struct Gradients<'a> {
    gx: &'a [i16],
    gy: &'a [i16],
    magnitude: Vec<f32>,
    width: usize,
    height: usize,
}

impl Gradients<'_> {
    #[inline]
    fn magnitude_at(&self, x: isize, y: isize) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0.0;
        }
        self.magnitude[y as usize * self.width + x as usize]
    }

    fn suppress_non_maxima(&self, low: f32, high: f32) -> Vec<Candidate> {
        let mut candidates = vec![Candidate::None; self.width * self.height];

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let mag = self.magnitude[idx];
                if mag <= low {
                    continue;
                }

                let gx = f32::from(self.gx[idx]);
                let gy = f32::from(self.gy[idx]);
                let (abs_gx, abs_gy) = (gx.abs(), gy.abs());

                // Offsets of the two neighbours along the gradient direction.
                let ((dx1, dy1), (dx2, dy2), diagonal) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                    ((-1, 0), (1, 0), false)
                } else if abs_gy >= abs_gx * TAN_67_5_DEG {
                    ((0, -1), (0, 1), false)
                } else if (gx >= 0.0) == (gy >= 0.0) {
                    ((-1, -1), (1, 1), true)
                } else {
                    ((1, -1), (-1, 1), true)
                };

                let (xi, yi) = (x as isize, y as isize);
                let before = self.magnitude_at(xi + dx1, yi + dy1);
                let after = self.magnitude_at(xi + dx2, yi + dy2);

                if is_local_maximum(mag, before, after, diagonal) {
                    candidates[idx] = if mag > high {
                        Candidate::Strong
                    } else {
                        Candidate::Weak
                    };
                }
            }
        }

        candidates
    }
}

/// Axis-aligned sectors keep the first pixel of a plateau (strict before,
/// non-strict after); diagonal sectors need a strict maximum on both sides.
#[inline]
fn is_local_maximum(mag: f32, before: f32, after: f32, diagonal: bool) -> bool {
    if diagonal {
        mag > before && mag > after
    } else {
        mag > before && mag >= after
    }
}

fn hysteresis(candidates: &[Candidate], width: usize, height: usize) -> Vec<u8> {
    let mut edges = vec![0u8; width * height];
    let mut stack: Vec<usize> = Vec::new();

    for (idx, candidate) in candidates.iter().enumerate() {
        if *candidate == Candidate::Strong {
            edges[idx] = EDGE;
            stack.push(idx);
        }
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % width, idx / width);
        let x_range = x.saturating_sub(1)..=(x + 1).min(width - 1);
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x_range.clone() {
                let neighbor = ny * width + nx;
                if edges[neighbor] == 0 && candidates[neighbor] == Candidate::Weak {
                    edges[neighbor] = EDGE;
                    stack.push(neighbor);
                }
            }
        }
    }

    edges
}
