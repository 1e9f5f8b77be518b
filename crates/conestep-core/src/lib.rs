//! Core cone-step-map precomputation for height-field ray marching.
//!
//! Given a height field, this crate derives for every texel the largest safe
//! "cone" a fragment-shader ray marcher can step by without overshooting the
//! surface, which is what makes relief/parallax rendering tractable at
//! interactive rates. The flow is one-shot and one-directional:
//!
//! 1. [`HeightField`] — the immutable input grid
//! 2. [`build_cone_map`] — brute-force occlusion-cone search
//! 3. [`relax()`] — optional fixed-point tightening into a [`RelaxedConeMap`]
//! 4. [`sampler`] — the numeric contract the consuming renderer reads by
//!
//! The maps are handed off as quantized 8-bit grids ([`ConeMap::to_bytes`]);
//! texture upload, filtering and the marching shader itself live outside
//! this crate.

// Grid math casts texel indices and byte values freely; the dimensions
// involved are far below any truncation boundary.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod builder;
pub mod cone_map;
pub mod error;
pub mod height_field;
pub mod relax;
pub mod sampler;

pub use builder::{build_cone_map, ConeMapParams, DEFAULT_EPSILON};
pub use cone_map::{quantize, ConeMap, RelaxedConeMap};
pub use error::{ConeStepError, Result};
pub use height_field::HeightField;
pub use relax::{relax, RelaxOutcome, RelaxParams};
pub use sampler::{decode_ratio, safe_step, ConeMapSampler};
