use image::RgbImage;

use crate::frame_pipeline::common::error::Result;
use crate::frame_pipeline::frame::SemiPlanarFrame;

pub trait ColorConverter {
    fn to_rgb(&self, frame: &SemiPlanarFrame<'_>) -> Result<RgbImage>;
}
