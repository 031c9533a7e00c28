//! Reading recorded frame dumps

use std::path::Path;

use tracing::{info, warn};

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::frame::FrameDimensions;

/// A file of back-to-back semi-planar frames of one size.
#[derive(Debug)]
pub struct FrameDump {
    data: Vec<u8>,
    frame_len: usize,
}

impl FrameDump {
    /// Reads the whole dump at `input_path` into memory.
    pub fn read<P: AsRef<Path>>(input_path: P, dimensions: FrameDimensions) -> Result<Self> {
        let input_path = input_path.as_ref();
        let frame_len = dimensions.semi_planar_len()?;

        let data = {
            let _span = tracing::info_span!("read_frame_dump").entered();
            std::fs::read(input_path).map_err(|e| {
                FrameError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        info!(
            input = %input_path.display(),
            bytes = data.len(),
            frames = data.len() / frame_len,
            "Loaded frame dump"
        );
        Ok(Self::from_bytes(data, frame_len))
    }

    pub fn from_bytes(data: Vec<u8>, frame_len: usize) -> Self {
        Self { data, frame_len }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Complete frames in file order. A trailing partial frame is skipped.
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        let chunks = self.data.chunks_exact(self.frame_len.max(1));
        let trailing = chunks.remainder().len();
        if trailing > 0 {
            warn!(
                trailing_bytes = trailing,
                frame_len = self.frame_len,
                "Input ends with a partial frame, skipping it"
            );
        }
        chunks
    }
}
