//! One-shot build pipeline: height field in, texture-ready cone maps out.
//!
//! The flow is strictly one-directional with no feedback: the field is never
//! mutated, and a changed surface means rebuilding everything. The pipeline
//! object is constructed once at startup and passed by reference wherever a
//! build is needed; there is no global instance.

use std::time::Instant;

use conestep_core::{
    build_cone_map, relax, ConeMap, ConeMapParams, HeightField, RelaxParams, RelaxedConeMap,
};

use crate::error::Result;

/// Configuration for the precompute pipeline.
///
/// With no explicit params, each build derives the 8-bit height-map
/// coupling from the field it is given
/// ([`ConeMapParams::for_height_field`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConeMapPipeline {
    params: Option<ConeMapParams>,
    max_iterations: Option<u32>,
}

impl ConeMapPipeline {
    /// Creates a pipeline with per-field derived constants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the builder constants for every subsequent build.
    #[must_use]
    pub fn with_params(mut self, params: ConeMapParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Overrides the relaxation iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Runs the full precompute for one height field: brute-force cone map,
    /// then the relaxation pass.
    ///
    /// # Errors
    ///
    /// Propagates core errors; see [`conestep_core::build_cone_map`] and
    /// [`conestep_core::relax`].
    pub fn build(&self, field: &HeightField) -> Result<ConeMapBuild> {
        let params = self
            .params
            .unwrap_or_else(|| ConeMapParams::for_height_field(field));
        let relax_params = RelaxParams {
            scale: params.scale,
            max_iterations: self
                .max_iterations
                .unwrap_or(RelaxParams::DEFAULT_MAX_ITERATIONS),
        };

        let start = Instant::now();
        let cone = build_cone_map(field, &params)?;
        log::info!(
            "cone map built: {}x{} in {:.1?}",
            cone.width(),
            cone.height(),
            start.elapsed()
        );

        let start = Instant::now();
        let outcome = relax(&cone, field, &relax_params)?;
        log::info!(
            "relaxation finished: {} iterations, converged: {}, in {:.1?}",
            outcome.iterations,
            outcome.converged,
            start.elapsed()
        );

        Ok(ConeMapBuild {
            cone,
            relaxed: outcome.map,
            relax_iterations: outcome.iterations,
            relax_converged: outcome.converged,
        })
    }
}

/// Everything one precompute run produces.
#[derive(Debug, Clone)]
pub struct ConeMapBuild {
    /// The brute-force cone map.
    pub cone: ConeMap,
    /// The relaxed refinement, pointwise `<=` the plain map.
    pub relaxed: RelaxedConeMap,
    /// Relaxation iterations performed.
    pub relax_iterations: u32,
    /// Whether relaxation reached its fixed point within budget.
    pub relax_converged: bool,
}

impl ConeMapBuild {
    /// Quantizes both maps into the grids the renderer uploads as textures.
    #[must_use]
    pub fn textures(&self) -> ConeMapTextures {
        ConeMapTextures {
            width: self.cone.width(),
            height: self.cone.height(),
            cone: self.cone.to_bytes(),
            relaxed: self.relaxed.to_bytes(),
        }
    }
}

/// Texture-ready 8-bit grids for the external upload collaborator.
///
/// Opaque to this crate beyond the sampler contract: upload, binding and
/// filter configuration happen in the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConeMapTextures {
    /// Grid width in texels.
    pub width: u32,
    /// Grid height in texels.
    pub height: u32,
    /// Quantized plain cone map, row-major.
    pub cone: Vec<u8>,
    /// Quantized relaxed cone map, row-major.
    pub relaxed: Vec<u8>,
}
