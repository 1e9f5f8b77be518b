//! Brute-force cone-map construction.
//!
//! For every source texel this scans every other texel that rises above it
//! and keeps the tightest horizontal-distance-to-vertical-rise ratio. The
//! result bounds the step a ray marcher may take from that texel without
//! passing through the surface. Quadratic in texel count, which is why the
//! map is built once per asset load and never per frame.

use glam::Vec2;
use rayon::prelude::*;

use crate::cone_map::ConeMap;
use crate::error::{ConeStepError, Result};
use crate::height_field::HeightField;

/// Default occluder threshold, one tenth of an 8-bit height unit: texels
/// rising less than this above the source do not constrain its cone.
pub const DEFAULT_EPSILON: f32 = 0.1 / 255.0;

/// Constants of the cone-ratio formula.
///
/// `scale` converts a normalized vertical rise into horizontal texel units;
/// `epsilon` is the minimum rise (in normalized height units) for a texel to
/// count as an occluder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeMapParams {
    /// Vertical-to-horizontal unit conversion, in texels per unit height.
    pub scale: f32,
    /// Minimum occluder rise in normalized height units.
    pub epsilon: f32,
}

impl ConeMapParams {
    /// The conventional coupling for 8-bit height maps: the vertical unit
    /// spans `height_dim / 256` horizontal texels, rescaling per vertical
    /// texel count, with the default occluder threshold.
    #[must_use]
    pub fn for_height_field(field: &HeightField) -> Self {
        Self {
            scale: field.height() as f32 / 256.0,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Computes the cone map for a height field.
///
/// For each source texel `s`, the ratio is
/// `min over occluders t of dist(s, t) / ((h(t) - h(s)) * scale)`, starting
/// from the loosest bound `1.0` and clamped to `[0, 1]`. A texel `t` is an
/// occluder when `h(t) - h(s) > epsilon`. The output is a pure function of
/// the field and the params: only a minimum is accumulated, so the result is
/// identical for any iteration order, and the per-row parallel sweep below
/// is bit-identical to a sequential one.
///
/// # Errors
///
/// Returns [`ConeStepError::InvalidDimensions`] if the field has a zero
/// dimension.
///
/// # Panics
///
/// Panics if `params.scale` is not finite and positive.
pub fn build_cone_map(field: &HeightField, params: &ConeMapParams) -> Result<ConeMap> {
    if field.width() == 0 || field.height() == 0 {
        return Err(ConeStepError::InvalidDimensions {
            width: field.width(),
            height: field.height(),
        });
    }
    assert!(
        params.scale.is_finite() && params.scale > 0.0,
        "scale must be finite and positive, got {}",
        params.scale
    );

    log::debug!(
        "building cone map: {}x{} texels, scale {}, epsilon {}",
        field.width(),
        field.height(),
        params.scale,
        params.epsilon
    );

    let w = field.width() as usize;
    let mut ratios = vec![1.0_f32; w * field.height() as usize];

    // Each worker owns a disjoint output row and reads only the immutable
    // field, so the parallel sweep cannot reorder any min-accumulation.
    ratios
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(sy, row)| {
            for (sx, out) in row.iter_mut().enumerate() {
                *out = cone_at(field, sx as u32, sy as u32, params);
            }
        });

    ConeMap::new(field.width(), field.height(), ratios)
}

/// Tightest cone ratio at one source texel, clamped to `[0, 1]`.
fn cone_at(field: &HeightField, sx: u32, sy: u32, params: &ConeMapParams) -> f32 {
    let sz = field.sample(sx, sy);
    let mut cone = 1.0_f32;

    for ty in 0..field.height() {
        for tx in 0..field.width() {
            let dz = field.sample(tx, ty) - sz;
            if dz <= params.epsilon {
                continue;
            }
            let d = Vec2::new(tx as f32 - sx as f32, ty as f32 - sy as f32).length();
            cone = cone.min(d / (dz * params.scale));
        }
    }

    cone.clamp(0.0, 1.0)
}
