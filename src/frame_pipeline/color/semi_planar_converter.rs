//! Semi-planar YUV 4:2:0 to RGB conversion.
//!
//! Uses the ITU-R BT.601 limited-range transform in 20-bit fixed point:
//!
//! ```text
//! R = 1.164 (Y - 16) + 1.596 (V - 128)
//! G = 1.164 (Y - 16) - 0.813 (V - 128) - 0.391 (U - 128)
//! B = 1.164 (Y - 16) + 2.018 (U - 128)
//! ```
//!
//! Each chroma pair covers a 2x2 block of luma samples (nearest-neighbour
//! upsampling).

use image::RgbImage;
use tracing::trace;

use crate::frame_pipeline::color::converter::ColorConverter;
use crate::frame_pipeline::common::error::{FrameError, Result};
use crate::frame_pipeline::frame::SemiPlanarFrame;

const SHIFT: u32 = 20;
const ROUND: i32 = 1 << (SHIFT - 1);
const COEFF_Y: i32 = 1_220_542;
const COEFF_U_TO_B: i32 = 2_116_026;
const COEFF_U_TO_G: i32 = -409_993;
const COEFF_V_TO_G: i32 = -852_492;
const COEFF_V_TO_R: i32 = 1_673_527;

/// Converts NV21/NV12 frames to 8-bit RGB on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemiPlanarConverter;

impl ColorConverter for SemiPlanarConverter {
    fn to_rgb(&self, frame: &SemiPlanarFrame<'_>) -> Result<RgbImage> {
        let (width, height) = (frame.width(), frame.height());

        // 4:2:0 chroma cannot cover a trailing odd row or column.
        if width % 2 != 0 || height % 2 != 0 {
            return Err(FrameError::ConversionFailure(format!(
                "{} conversion requires even dimensions, got {}x{}",
                frame.order(),
                width,
                height
            )));
        }

        let row_len = width as usize;
        let luma = frame.luma();
        let chroma = frame.chroma();
        let (u_offset, v_offset) = frame.order().offsets();
        trace!(width, height, order = %frame.order(), "Converting semi-planar frame to RGB");

        let mut rgb = vec![0u8; frame.dimensions().rgb_len()?];
        for (row, out_row) in rgb.chunks_exact_mut(row_len * 3).enumerate() {
            let luma_row = &luma[row * row_len..(row + 1) * row_len];
            let chroma_row = &chroma[(row / 2) * row_len..(row / 2 + 1) * row_len];

            for (col, pixel) in out_row.chunks_exact_mut(3).enumerate() {
                let pair = col & !1;
                pixel.copy_from_slice(&yuv_to_rgb(
                    luma_row[col],
                    chroma_row[pair + u_offset],
                    chroma_row[pair + v_offset],
                ));
            }
        }

        RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
            FrameError::ConversionFailure(format!(
                "color buffer does not match a {width}x{height} frame"
            ))
        })
    }
}

#[inline]
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = (i32::from(y) - 16).max(0) * COEFF_Y;
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;

    [
        saturate((y + COEFF_V_TO_R * v + ROUND) >> SHIFT),
        saturate((y + COEFF_V_TO_G * v + COEFF_U_TO_G * u + ROUND) >> SHIFT),
        saturate((y + COEFF_U_TO_B * u + ROUND) >> SHIFT),
    ]
}

#[inline]
fn saturate(value: i32) -> u8 {
    value.clamp(0, u8::MAX as i32) as u8
}
