//! conestep: asset pipeline for cone-step/parallax height-field rendering.
//!
//! This crate wraps [`conestep_core`] with the pieces an application shell
//! needs: image ingestion, the one-shot build pipeline, and the per-frame
//! configuration handed to an external renderer.
//!
//! # Quick Start
//!
//! ```no_run
//! use conestep::{load_height_field, ConeMapPipeline};
//!
//! fn main() -> conestep::Result<()> {
//!     let field = load_height_field("heightmap.png")?;
//!     let pipeline = ConeMapPipeline::new();
//!     let textures = pipeline.build(&field)?.textures();
//!     // Hand textures.cone / textures.relaxed to the renderer for upload.
//!     Ok(())
//! }
//! ```

#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod frame;
pub mod ingest;
pub mod pipeline;

/// Installs the default `env_logger` backend for application shells that
/// carry no logger of their own. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

pub use error::{PipelineError, Result};
pub use frame::{ConeStepMode, FrameConfig};
pub use ingest::{height_field_from_image, load_height_field};
pub use pipeline::{ConeMapBuild, ConeMapPipeline, ConeMapTextures};

// Re-export the core types callers hold on to.
pub use conestep_core::{
    build_cone_map, decode_ratio, relax, ConeMap, ConeMapParams, ConeMapSampler, ConeStepError,
    HeightField, RelaxParams, RelaxedConeMap,
};
