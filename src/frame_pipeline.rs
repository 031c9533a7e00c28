//! Camera frame edge-detection pipeline
//!
//! Takes a raw 4:2:0 semi-planar frame (NV21 by default), validates its size
//! against the declared dimensions, converts it to RGB, then grayscale,
//! smooths it, runs Canny-style edge detection and hands back the edge map
//! replicated across three channels.
//!
//! [`FrameProcessor::process`] reports failures as [`FrameError`];
//! [`process_frame`] collapses them to `None` for callers that only need a
//! dropped-frame signal.

pub mod boundary;
pub mod color;
pub mod common;
pub mod config;
pub mod edges;
pub mod export;
pub mod frame;
pub mod input;
pub mod processor;
pub mod timing;

#[cfg(test)]
mod tests;

pub use common::{FailureKind, FrameError, Result};

pub use config::{GradientNorm, MAX_BLUR_KERNEL_SIZE, ProcessorConfig, ProcessorConfigBuilder};

pub use frame::{
    ChromaOrder, FrameDimensions, OutputFrame, Plane, SemiPlanarFrame, pack_semi_planar,
};

pub use color::{ColorConverter, SemiPlanarConverter};

pub use edges::{CannyDetector, EdgeDetector};

pub use export::{FrameWriter, TiffCompression, TiffFrameWriter, export_file};

pub use input::FrameDump;

pub use processor::FrameProcessor;

pub use boundary::process_frame;

pub use timing::{FrameRateMeter, PipelineTimings, StepTiming, Timer};
