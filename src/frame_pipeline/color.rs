//! Color-space conversion module
//!
//! Turns a borrowed semi-planar frame into RGB and RGB into grayscale.

mod converter;
mod grayscale;
mod semi_planar_converter;

pub use converter::ColorConverter;
pub use grayscale::to_grayscale;
pub use semi_planar_converter::SemiPlanarConverter;
