use image::{GrayImage, Luma, Rgb, RgbImage};

// BT.601 luma weights scaled by 2^14: 0.299, 0.587, 0.114.
const WEIGHT_R: u32 = 4_899;
const WEIGHT_G: u32 = 9_617;
const WEIGHT_B: u32 = 1_868;
const WEIGHT_SHIFT: u32 = 14;

/// Luma-weighted single-channel copy of an RGB image.
pub fn to_grayscale(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
        Luma([weighted_luma(r, g, b)])
    })
}

#[inline]
fn weighted_luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = u32::from(r) * WEIGHT_R + u32::from(g) * WEIGHT_G + u32::from(b) * WEIGHT_B;
    ((sum + (1 << (WEIGHT_SHIFT - 1))) >> WEIGHT_SHIFT) as u8
}
