//! Frame processor configuration types

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::frame::ChromaOrder;

/// Largest accepted Gaussian kernel side length
pub const MAX_BLUR_KERNEL_SIZE: u32 = 31;

/// How the Sobel responses are combined into a gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientNorm {
    /// `|gx| + |gy|` (cheap, the usual camera-preview default)
    #[default]
    L1,
    /// `sqrt(gx^2 + gy^2)`
    L2,
}

/// Configuration for the NV21 edge-detection pipeline
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Chroma sample order the camera source delivers
    pub chroma_order: ChromaOrder,
    /// Side length of the square Gaussian kernel (odd, at most 31, 1 disables smoothing)
    pub blur_kernel_size: u32,
    /// Standard deviation of the Gaussian kernel
    pub blur_sigma: f32,
    /// Gradients at or below this value are never edges
    pub low_threshold: f32,
    /// Gradients above this value are always edges
    pub high_threshold: f32,
    /// Gradient magnitude norm used for thresholding
    pub gradient_norm: GradientNorm,
    /// Largest accepted width or height, unlimited when `None`
    pub max_dimension: Option<u32>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chroma_order: ChromaOrder::Vu,
            blur_kernel_size: 5,
            blur_sigma: 1.5,
            low_threshold: 50.0,
            high_threshold: 150.0,
            gradient_norm: GradientNorm::L1,
            max_dimension: None,
        }
    }
}

impl ProcessorConfig {
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::default()
    }

    /// Rejects kernel and threshold combinations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(FrameError::InvalidConfig(format!(
                "blur kernel size must be a positive odd number, got {}",
                self.blur_kernel_size
            )));
        }

        if self.blur_kernel_size > MAX_BLUR_KERNEL_SIZE {
            return Err(FrameError::InvalidConfig(format!(
                "blur kernel size must be at most {MAX_BLUR_KERNEL_SIZE}, got {}",
                self.blur_kernel_size
            )));
        }

        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(FrameError::InvalidConfig(format!(
                "blur sigma must be finite and positive, got {}",
                self.blur_sigma
            )));
        }

        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(FrameError::InvalidConfig(
                "edge thresholds must be finite".to_string(),
            ));
        }

        if self.low_threshold < 0.0 || self.low_threshold > self.high_threshold {
            return Err(FrameError::InvalidConfig(format!(
                "edge thresholds must satisfy 0 <= low <= high, got low={} high={}",
                self.low_threshold, self.high_threshold
            )));
        }

        if self.max_dimension == Some(0) {
            return Err(FrameError::InvalidConfig(
                "max dimension must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ProcessorConfig
#[derive(Default)]
pub struct ProcessorConfigBuilder {
    chroma_order: Option<ChromaOrder>,
    blur_kernel_size: Option<u32>,
    blur_sigma: Option<f32>,
    low_threshold: Option<f32>,
    high_threshold: Option<f32>,
    gradient_norm: Option<GradientNorm>,
    max_dimension: Option<Option<u32>>,
}

impl ProcessorConfigBuilder {
    pub fn chroma_order(mut self, order: ChromaOrder) -> Self {
        self.chroma_order = Some(order);
        self
    }

    pub fn blur_kernel_size(mut self, size: u32) -> Self {
        self.blur_kernel_size = Some(size);
        self
    }

    pub fn blur_sigma(mut self, sigma: f32) -> Self {
        self.blur_sigma = Some(sigma);
        self
    }

    pub fn thresholds(mut self, low: f32, high: f32) -> Self {
        self.low_threshold = Some(low);
        self.high_threshold = Some(high);
        self
    }

    pub fn gradient_norm(mut self, norm: GradientNorm) -> Self {
        self.gradient_norm = Some(norm);
        self
    }

    pub fn max_dimension(mut self, max: Option<u32>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> ProcessorConfig {
        let default = ProcessorConfig::default();
        ProcessorConfig {
            chroma_order: self.chroma_order.unwrap_or(default.chroma_order),
            blur_kernel_size: self.blur_kernel_size.unwrap_or(default.blur_kernel_size),
            blur_sigma: self.blur_sigma.unwrap_or(default.blur_sigma),
            low_threshold: self.low_threshold.unwrap_or(default.low_threshold),
            high_threshold: self.high_threshold.unwrap_or(default.high_threshold),
            gradient_norm: self.gradient_norm.unwrap_or(default.gradient_norm),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
