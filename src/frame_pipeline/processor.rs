use image::GrayImage;
use tracing::{debug, debug_span, error, instrument, warn};

use crate::frame_pipeline::{
    color::{ColorConverter, SemiPlanarConverter, to_grayscale},
    common::error::{FailureKind, FrameError, Result},
    config::ProcessorConfig,
    edges::{CannyDetector, EdgeDetector, gaussian_kernel, smooth},
    frame::{FrameDimensions, OutputFrame, SemiPlanarFrame},
    timing::{PipelineTimings, Timer},
};

/// Turns semi-planar camera frames into 3-channel edge maps.
///
/// The processor holds only immutable configuration, so one instance can be
/// shared across threads and called concurrently. Every call allocates its
/// own intermediate and output buffers.
pub struct FrameProcessor<C: ColorConverter = SemiPlanarConverter, D: EdgeDetector = CannyDetector>
{
    converter: C,
    detector: D,
    config: ProcessorConfig,
    blur_kernel: Vec<f32>,
}

impl FrameProcessor<SemiPlanarConverter, CannyDetector> {
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let detector = CannyDetector::from_config(&config);
        Self::with_custom(SemiPlanarConverter, detector, config)
    }
}

impl Default for FrameProcessor<SemiPlanarConverter, CannyDetector> {
    fn default() -> Self {
        let config = ProcessorConfig::default();
        Self {
            converter: SemiPlanarConverter,
            detector: CannyDetector::from_config(&config),
            blur_kernel: gaussian_kernel(config.blur_kernel_size, config.blur_sigma),
            config,
        }
    }
}

impl<C: ColorConverter, D: EdgeDetector> FrameProcessor<C, D> {
    pub fn with_custom(converter: C, detector: D, config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let blur_kernel = gaussian_kernel(config.blur_kernel_size, config.blur_sigma);
        Ok(Self {
            converter,
            detector,
            config,
            blur_kernel,
        })
    }

    /// Validates one raw frame and runs it through the edge pipeline.
    ///
    /// Checks run in order: absent buffer, non-positive dimensions, then
    /// buffer length against `width * height * 3 / 2`. The first failing
    /// check or pipeline step ends the call without output.
    pub fn process(
        &self,
        raw_frame: Option<&[u8]>,
        width: i32,
        height: i32,
    ) -> Result<OutputFrame> {
        let mut timings = PipelineTimings::new();
        self.process_logged(raw_frame, width, height, &mut timings)
    }

    pub fn process_with_timings(
        &self,
        raw_frame: Option<&[u8]>,
        width: i32,
        height: i32,
    ) -> Result<(OutputFrame, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let frame = self.process_logged(raw_frame, width, height, &mut timings)?;
        Ok((frame, timings))
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    #[instrument(
        level = "debug",
        name = "process_frame",
        skip(self, raw_frame, timings),
        fields(input_size = raw_frame.map_or(0, |raw| raw.len()))
    )]
    fn process_logged(
        &self,
        raw_frame: Option<&[u8]>,
        width: i32,
        height: i32,
        timings: &mut PipelineTimings,
    ) -> Result<OutputFrame> {
        let result = self.run(raw_frame, width, height, timings);

        match &result {
            Ok(_) => debug!(
                width,
                height,
                ms = timings.total_duration().as_secs_f64() * 1000.0,
                "Processed frame successfully"
            ),
            Err(e) => match e.kind() {
                FailureKind::BadInput | FailureKind::SizeMismatch => {
                    warn!(width, height, error = %e, "Rejected input frame")
                }
                FailureKind::Internal => {
                    error!(width, height, error = %e, "Frame conversion failed")
                }
            },
        }

        result
    }

    fn run(
        &self,
        raw_frame: Option<&[u8]>,
        width: i32,
        height: i32,
        timings: &mut PipelineTimings,
    ) -> Result<OutputFrame> {
        let (raw, dimensions) = stage(timings, "validate", || {
            self.validate(raw_frame, width, height)
        })?;

        let rgb = stage(timings, "convert_color", || {
            let frame = SemiPlanarFrame::new(raw, dimensions, self.config.chroma_order)?;
            self.converter.to_rgb(&frame)
        })?;

        let gray = stage(timings, "grayscale", || Ok(to_grayscale(&rgb)))?;
        let smoothed = stage(timings, "smooth", || Ok(smooth(&gray, &self.blur_kernel)))?;
        let edges = stage(timings, "detect_edges", || self.detector.detect(&smoothed))?;

        stage(timings, "pack_output", || pack_output(edges, dimensions))
    }

    fn validate<'a>(
        &self,
        raw_frame: Option<&'a [u8]>,
        width: i32,
        height: i32,
    ) -> Result<(&'a [u8], FrameDimensions)> {
        let raw = raw_frame
            .ok_or_else(|| FrameError::InvalidInput("input frame buffer is absent".to_string()))?;

        let dimensions = FrameDimensions::new(width, height)?;

        if let Some(max) = self.config.max_dimension {
            if dimensions.width > max || dimensions.height > max {
                return Err(FrameError::InvalidInput(format!(
                    "frame dimensions {dimensions} exceed maximum {max}"
                )));
            }
        }

        let expected = dimensions.semi_planar_len()?;
        if raw.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: raw.len(),
            });
        }

        Ok((raw, dimensions))
    }
}

fn stage<T>(
    timings: &mut PipelineTimings,
    name: &'static str,
    step: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let _span = debug_span!("stage", step = name).entered();
    let timer = Timer::start(name);
    let result = step();
    timings.record(timer);
    result
}

fn pack_output(edges: GrayImage, dimensions: FrameDimensions) -> Result<OutputFrame> {
    if edges.dimensions() != (dimensions.width, dimensions.height) {
        return Err(FrameError::ConversionFailure(format!(
            "edge map is {}x{}, expected {dimensions}",
            edges.width(),
            edges.height()
        )));
    }

    let output = OutputFrame::from_edge_map(edges);
    let expected = dimensions.rgb_len()?;
    if output.as_bytes().len() != expected {
        return Err(FrameError::ConversionFailure(format!(
            "output frame holds {} bytes, expected {expected}",
            output.as_bytes().len()
        )));
    }
    Ok(output)
}
