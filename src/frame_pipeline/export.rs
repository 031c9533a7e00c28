//! Frame export module
//!
//! Writes processed frames to disk so they can be inspected outside the
//! camera preview.

mod tiff_frame_writer;
mod writer;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{info, instrument};

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::frame::OutputFrame;

pub use tiff_frame_writer::{TiffCompression, TiffFrameWriter};
pub use writer::FrameWriter;

/// Writes `frame` to `output_path` with `writer`, creating or truncating the file.
#[instrument(skip(writer, frame, output_path))]
pub fn export_file<W: FrameWriter, P: AsRef<Path>>(
    writer: &W,
    frame: &OutputFrame,
    output_path: P,
) -> Result<()> {
    let output_path = output_path.as_ref();

    let file = File::create(output_path).map_err(|e| {
        FrameError::OutputWriteError(format!("{}: {}", output_path.display(), e))
    })?;
    let mut output = BufWriter::new(file);

    writer.write_frame(frame, &mut output)?;
    output.into_inner().map_err(|e| {
        FrameError::OutputWriteError(format!("{}: {}", output_path.display(), e.error()))
    })?;

    info!(
        output = %output_path.display(),
        width = frame.width(),
        height = frame.height(),
        "Exported frame"
    );
    Ok(())
}
