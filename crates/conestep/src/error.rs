//! Error types for the conestep asset pipeline.

use conestep_core::ConeStepError;
use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upstream image decoder rejected the asset.
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// Filesystem error while reading an asset.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The core engine rejected the data.
    #[error(transparent)]
    Core(#[from] ConeStepError),
}

/// A specialized Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
