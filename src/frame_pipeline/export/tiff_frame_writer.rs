use std::io::{Cursor, Write};

use tiff::encoder::{Compression, TiffEncoder, colortype, compression::DeflateLevel};
use tracing::debug;

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::export::writer::FrameWriter;
use crate::frame_pipeline::frame::OutputFrame;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, balanced level (edge maps compress very well)
    #[default]
    Deflate,
}

/// Writes output frames as 8-bit RGB TIFF images.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffFrameWriter {
    compression: TiffCompression,
}

impl TiffFrameWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }
}

impl FrameWriter for TiffFrameWriter {
    fn write_frame(&self, frame: &OutputFrame, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", frame.width(), frame.height());

        let mut buffer = Vec::new();

        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| FrameError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<colortype::RGB8>(frame.width(), frame.height(), frame.as_bytes())
            .map_err(|e| FrameError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
