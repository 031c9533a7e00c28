use image::GrayImage;

use crate::frame_pipeline::common::error::Result;

pub trait EdgeDetector {
    /// Produces a binary edge map (0 or 255 per pixel) from a smoothed image.
    fn detect(&self, smoothed: &GrayImage) -> Result<GrayImage>;
}
