//! Error type shared by every pipeline stage

pub mod error;

pub use error::{FailureKind, FrameError, Result};
