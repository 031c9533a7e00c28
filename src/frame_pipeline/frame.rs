//! Frame buffers and layouts
//!
//! Borrowed semi-planar input views, the owned output frame, and packing of
//! strided camera planes into the semi-planar layout.

pub mod packing;
pub mod types;

pub use packing::{Plane, pack_semi_planar};
pub use types::{ChromaOrder, FrameDimensions, OutputFrame, SemiPlanarFrame};
