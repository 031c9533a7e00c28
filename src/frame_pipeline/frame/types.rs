//! Frame layout types

use std::fmt;
use std::str::FromStr;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};

use crate::frame_pipeline::common::error::{FrameError, Result};

/// Order of the two samples in each interleaved chroma pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaOrder {
    /// V before U (NV21, the Android camera preview layout)
    #[default]
    Vu,
    /// U before V (NV12)
    Uv,
}

impl ChromaOrder {
    /// Byte offsets of U and V inside a chroma pair.
    pub fn offsets(self) -> (usize, usize) {
        match self {
            ChromaOrder::Vu => (1, 0),
            ChromaOrder::Uv => (0, 1),
        }
    }

    pub fn fourcc(self) -> &'static str {
        match self {
            ChromaOrder::Vu => "NV21",
            ChromaOrder::Uv => "NV12",
        }
    }
}

impl fmt::Display for ChromaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fourcc())
    }
}

impl FromStr for ChromaOrder {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nv21" | "vu" => Ok(ChromaOrder::Vu),
            "nv12" | "uv" => Ok(ChromaOrder::Uv),
            other => Err(FrameError::InvalidConfig(format!(
                "unknown chroma order '{other}', expected nv21 or nv12"
            ))),
        }
    }
}

/// Width and height of a frame, both strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(FrameError::InvalidInput(format!(
                "frame dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
        })
    }

    pub fn pixel_count(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| self.too_large())
    }

    /// Byte length of a 4:2:0 semi-planar frame: `width * height * 3 / 2`.
    pub fn semi_planar_len(&self) -> Result<usize> {
        self.pixel_count()?
            .checked_mul(3)
            .map(|len| len / 2)
            .ok_or_else(|| self.too_large())
    }

    /// Byte length of a 3-channel frame: `width * height * 3`.
    pub fn rgb_len(&self) -> Result<usize> {
        self.pixel_count()?
            .checked_mul(3)
            .ok_or_else(|| self.too_large())
    }

    fn too_large(&self) -> FrameError {
        FrameError::InvalidInput(format!(
            "frame dimensions {}x{} overflow the addressable size",
            self.width, self.height
        ))
    }
}

impl fmt::Display for FrameDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Borrowed view of a 4:2:0 semi-planar frame.
///
/// The buffer is read as one single-channel image `height + height / 2` rows
/// tall: the luma plane followed by the interleaved chroma plane. No bytes are
/// copied and the view cannot outlive the caller's buffer.
pub struct SemiPlanarFrame<'a> {
    planes: ImageBuffer<Luma<u8>, &'a [u8]>,
    dimensions: FrameDimensions,
    order: ChromaOrder,
}

impl<'a> SemiPlanarFrame<'a> {
    pub fn new(data: &'a [u8], dimensions: FrameDimensions, order: ChromaOrder) -> Result<Self> {
        let rows = dimensions
            .height
            .checked_add(dimensions.height / 2)
            .ok_or_else(|| {
                FrameError::ConversionFailure(format!(
                    "frame height {} overflows",
                    dimensions.height
                ))
            })?;

        let planes = ImageBuffer::from_raw(dimensions.width, rows, data).ok_or_else(|| {
            FrameError::ConversionFailure(format!(
                "{} bytes cannot back a {}x{} plane view",
                data.len(),
                dimensions.width,
                rows
            ))
        })?;

        Ok(Self {
            planes,
            dimensions,
            order,
        })
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    pub fn order(&self) -> ChromaOrder {
        self.order
    }

    /// Full-resolution brightness samples, `width * height` bytes.
    pub fn luma(&self) -> &'a [u8] {
        let raw: &'a [u8] = *self.planes.as_raw();
        &raw[..self.luma_len()]
    }

    /// Interleaved chroma pairs, one row of `width` bytes per two luma rows.
    pub fn chroma(&self) -> &'a [u8] {
        let raw: &'a [u8] = *self.planes.as_raw();
        &raw[self.luma_len()..]
    }

    fn luma_len(&self) -> usize {
        self.dimensions.width as usize * self.dimensions.height as usize
    }
}

/// Edge-detected frame in a 3-channel layout.
///
/// Every pixel holds the same value in all three channels, either 0 or 255.
/// The frame is allocated per call and owned by whoever receives it.
#[derive(Debug, Clone)]
pub struct OutputFrame {
    image: RgbImage,
}

impl OutputFrame {
    /// Replicates a single-channel edge map across three channels.
    pub fn from_edge_map(edges: GrayImage) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(edges).into_rgb8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Row-major interleaved channel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.image.into_raw()
    }

    pub fn edge_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] != 0).count()
    }
}
