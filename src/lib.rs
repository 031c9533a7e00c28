//! Edge detection for camera frames delivered as YUV 4:2:0 semi-planar
//! buffers.

pub mod frame_pipeline;
pub mod logger;
