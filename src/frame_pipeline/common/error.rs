use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid input frame: {0}")]
    InvalidInput(String),

    #[error("Mismatched input size: expected {expected} bytes but got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Frame conversion failed: {0}")]
    ConversionFailure(String),

    #[error("Invalid processor configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse failure category a caller can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Absent buffer, bad dimensions or a bad configuration.
    BadInput,
    /// Buffer length disagrees with the declared dimensions.
    SizeMismatch,
    /// A conversion, filter or I/O step failed.
    Internal,
}

impl FrameError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FrameError::InvalidInput(_) | FrameError::InvalidConfig(_) => FailureKind::BadInput,
            FrameError::SizeMismatch { .. } => FailureKind::SizeMismatch,
            FrameError::ConversionFailure(_)
            | FrameError::InputReadError(_)
            | FrameError::OutputWriteError(_)
            | FrameError::EncodeError(_)
            | FrameError::IoError(_) => FailureKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
