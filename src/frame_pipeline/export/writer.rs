use std::io::Write;

use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::frame::OutputFrame;

pub trait FrameWriter {
    fn write_frame(&self, frame: &OutputFrame, output: &mut dyn Write) -> Result<()>;
}
