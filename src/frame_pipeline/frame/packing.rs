//! Packing of strided YUV 4:2:0 planes into a contiguous semi-planar buffer.
//!
//! Camera APIs hand out three planes with their own row and pixel strides;
//! the chroma planes are often views into one interleaved buffer with a pixel
//! stride of 2. The pipeline expects one tightly packed NV21/NV12 buffer.

use tracing::debug;

use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::frame::types::{ChromaOrder, FrameDimensions};

/// One plane of a strided YUV image
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    pub data: &'a [u8],
    /// Bytes between the starts of consecutive rows
    pub row_stride: usize,
    /// Bytes between consecutive samples within a row
    pub pixel_stride: usize,
}

impl<'a> Plane<'a> {
    /// Plane with no padding between samples or rows.
    pub fn packed(data: &'a [u8], width: usize) -> Self {
        Self {
            data,
            row_stride: width,
            pixel_stride: 1,
        }
    }

    fn check(&self, name: &str, rows: usize, cols: usize) -> Result<()> {
        if self.pixel_stride == 0 || self.row_stride < (cols - 1) * self.pixel_stride + 1 {
            return Err(FrameError::InvalidInput(format!(
                "{name} plane strides (row {}, pixel {}) cannot hold {cols} samples per row",
                self.row_stride, self.pixel_stride
            )));
        }

        let required = (rows - 1) * self.row_stride + (cols - 1) * self.pixel_stride + 1;
        if self.data.len() < required {
            return Err(FrameError::InvalidInput(format!(
                "{name} plane holds {} bytes, {required} required",
                self.data.len()
            )));
        }
        Ok(())
    }

    #[inline]
    fn sample(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.row_stride + col * self.pixel_stride]
    }
}

/// Builds a contiguous semi-planar frame from three strided planes.
///
/// The luma plane is copied row by row, then chroma pairs are interleaved in
/// `order`. Both dimensions must be even so every chroma sample covers a full
/// 2x2 block.
pub fn pack_semi_planar(
    y: Plane<'_>,
    u: Plane<'_>,
    v: Plane<'_>,
    dimensions: FrameDimensions,
    order: ChromaOrder,
) -> Result<Vec<u8>> {
    let width = dimensions.width as usize;
    let height = dimensions.height as usize;

    if width % 2 != 0 || height % 2 != 0 {
        return Err(FrameError::InvalidInput(format!(
            "4:2:0 planes require even dimensions, got {dimensions}"
        )));
    }

    let (chroma_width, chroma_height) = (width / 2, height / 2);
    y.check("Y", height, width)?;
    u.check("U", chroma_height, chroma_width)?;
    v.check("V", chroma_height, chroma_width)?;

    let mut packed = Vec::with_capacity(dimensions.semi_planar_len()?);

    for row in 0..height {
        if y.pixel_stride == 1 {
            let start = row * y.row_stride;
            packed.extend_from_slice(&y.data[start..start + width]);
        } else {
            packed.extend((0..width).map(|col| y.sample(row, col)));
        }
    }

    let (first, second) = match order {
        ChromaOrder::Vu => (&v, &u),
        ChromaOrder::Uv => (&u, &v),
    };
    for row in 0..chroma_height {
        for col in 0..chroma_width {
            packed.push(first.sample(row, col));
            packed.push(second.sample(row, col));
        }
    }

    debug!(
        width,
        height,
        order = %order,
        bytes = packed.len(),
        "Packed YUV planes into semi-planar frame"
    );
    Ok(packed)
}
