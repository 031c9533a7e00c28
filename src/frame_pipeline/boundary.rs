//! Null-on-failure entry point for callers that cannot carry a structured
//! error across their boundary (JNI glue, C callers).

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::frame_pipeline::frame::OutputFrame;
use crate::frame_pipeline::processor::FrameProcessor;

/// Processes one NV21 frame with the default pipeline.
///
/// Returns the `width * height * 3` output bytes, or `None` when the input is
/// absent, the dimensions are not positive, the length is not
/// `width * height * 3 / 2`, or a pipeline step fails. Failures are logged
/// before returning; no panic escapes this function.
pub fn process_frame(raw_frame: Option<&[u8]>, width: i32, height: i32) -> Option<Vec<u8>> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        FrameProcessor::default().process(raw_frame, width, height)
    }));

    match outcome {
        Ok(result) => result.ok().map(OutputFrame::into_bytes),
        Err(_) => {
            error!(width, height, "Frame pipeline panicked, dropping frame");
            None
        }
    }
}
