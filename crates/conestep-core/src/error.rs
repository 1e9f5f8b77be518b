//! Error types for conestep-core.

use thiserror::Error;

/// The main error type for cone-map precomputation.
#[derive(Error, Debug)]
pub enum ConeStepError {
    /// A height field or cone map was given a zero dimension.
    #[error("invalid dimensions: {width}x{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Sample buffer length does not match the declared dimensions.
    #[error("sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// Decoded image has a channel count this engine cannot interpret.
    #[error("unsupported channel layout: {0} channels (expected 1, 3 or 4)")]
    UnsupportedChannelLayout(u8),

    /// Decoded image has zero width or height.
    #[error("empty image: width and height must be > 0")]
    EmptyImage,
}

/// A specialized Result type for cone-map operations.
pub type Result<T> = std::result::Result<T, ConeStepError>;
