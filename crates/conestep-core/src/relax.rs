//! Relaxed-cone refinement: fixed-point tightening of a built cone map.
//!
//! A plain cone map bounds each texel independently. Adjacent texels can
//! still disagree sharply: a texel nothing rises above keeps the loosest
//! bound even when every neighbor is tightly constrained, and a marcher
//! stepping out of that cone lands in a neighbor whose bound it must
//! immediately honor. This pass propagates the constraint: a texel's ratio
//! may exceed a neighbor's only by the slack the separation buys over the
//! clearance that neighbor's cone vouches for. Enforcing it never loosens a
//! bound, so the refined map is safe for the same marcher wherever the plain
//! map was.

use rayon::prelude::*;

use crate::cone_map::{ConeMap, RelaxedConeMap};
use crate::error::{ConeStepError, Result};
use crate::height_field::HeightField;

/// Smallest headroom credited to any texel, one 8-bit height unit. Texels at
/// the very top of the range would otherwise divide by zero.
const MIN_HEADROOM: f32 = 1.0 / 255.0;

/// Per-texel change below which an iteration counts as converged.
const CONVERGENCE_THRESHOLD: f32 = 1e-6;

/// Constants of the relaxation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxParams {
    /// Vertical-to-horizontal unit conversion; use the same value the cone
    /// map was built with.
    pub scale: f32,
    /// Iteration budget for the fixed-point loop.
    pub max_iterations: u32,
}

impl RelaxParams {
    /// Default iteration budget.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 8;

    /// Parameters matching [`ConeMapParams::for_height_field`].
    ///
    /// [`ConeMapParams::for_height_field`]: crate::builder::ConeMapParams::for_height_field
    #[must_use]
    pub fn for_height_field(field: &HeightField) -> Self {
        Self {
            scale: field.height() as f32 / 256.0,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of a relaxation run.
///
/// The map is valid whether or not the fixed point was reached: iterates
/// only ever tighten, so stopping early leaves a conservative but correct
/// refinement.
#[derive(Debug, Clone)]
pub struct RelaxOutcome {
    /// The refined map, pointwise `<=` the input cone map.
    pub map: RelaxedConeMap,
    /// Iterations actually performed.
    pub iterations: u32,
    /// Whether a fixed point was reached within the budget.
    pub converged: bool,
}

/// Tightens a cone map by propagating bounds between neighboring texels.
///
/// Each iteration reads the previous iterate and writes a fresh buffer, so
/// the parallel per-row sweep sees a stable snapshot and the result is
/// independent of worker scheduling. The loop stops at the first iteration
/// that changes no texel by more than the convergence threshold, or after
/// `params.max_iterations`. Exhausting the budget is not an error; the
/// outcome reports `converged: false` and the last iterate is returned.
///
/// # Errors
///
/// Returns [`ConeStepError::SampleCountMismatch`] if the cone map and the
/// height field disagree in shape.
///
/// # Panics
///
/// Panics if `params.scale` is not finite and positive.
pub fn relax(cone: &ConeMap, field: &HeightField, params: &RelaxParams) -> Result<RelaxOutcome> {
    if cone.width() != field.width() || cone.height() != field.height() {
        return Err(ConeStepError::SampleCountMismatch {
            expected: field.len(),
            actual: cone.ratios().len(),
        });
    }
    assert!(
        params.scale.is_finite() && params.scale > 0.0,
        "scale must be finite and positive, got {}",
        params.scale
    );

    let w = cone.width() as usize;
    let mut current = cone.ratios().to_vec();
    let mut next = vec![0.0_f32; current.len()];

    let mut iterations = 0;
    let mut converged = false;
    while iterations < params.max_iterations {
        let changed = tighten_once(&current, &mut next, field, params.scale, w);
        std::mem::swap(&mut current, &mut next);
        iterations += 1;
        if !changed {
            converged = true;
            break;
        }
    }

    if converged {
        log::debug!("relaxation reached fixed point after {iterations} iterations");
    } else {
        log::warn!(
            "relaxation stopped at iteration budget {} without reaching a fixed point; \
             returning the last (still valid) iterate",
            params.max_iterations
        );
    }

    let map = ConeMap::new(cone.width(), cone.height(), current)?;
    Ok(RelaxOutcome {
        map: RelaxedConeMap::from_map(map),
        iterations,
        converged,
    })
}

/// One relaxation sweep: reads `current`, writes `next`. Returns whether any
/// texel tightened by more than the convergence threshold.
fn tighten_once(
    current: &[f32],
    next: &mut [f32],
    field: &HeightField,
    scale: f32,
    w: usize,
) -> bool {
    let h = current.len() / w;

    next.par_chunks_mut(w)
        .enumerate()
        .map(|(sy, row)| {
            let mut row_changed = false;
            for (sx, out) in row.iter_mut().enumerate() {
                let prev = current[sy * w + sx];
                let mut tightest = prev;

                for (nx, ny, d) in neighbors(sx, sy, w, h) {
                    // A neighbor's cone vouches for the clearance above the
                    // neighbor; the separation buys slack over that span.
                    let headroom =
                        (1.0 - field.sample(nx as u32, ny as u32)).max(MIN_HEADROOM);
                    let candidate = current[ny * w + nx] + d / (headroom * scale);
                    tightest = tightest.min(candidate);
                }

                *out = tightest;
                row_changed |= prev - tightest > CONVERGENCE_THRESHOLD;
            }
            row_changed
        })
        .reduce(|| false, |a, b| a | b)
}

/// In-bounds 8-neighborhood of `(sx, sy)` with horizontal distances.
fn neighbors(sx: usize, sy: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize, f32)> {
    const OFFSETS: [(i64, i64); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    OFFSETS.into_iter().filter_map(move |(dx, dy)| {
        let nx = sx as i64 + dx;
        let ny = sy as i64 + dy;
        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
            return None;
        }
        let d = if dx != 0 && dy != 0 {
            std::f32::consts::SQRT_2
        } else {
            1.0
        };
        Some((nx as usize, ny as usize, d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_cone_map, ConeMapParams};
    use proptest::prelude::*;

    fn spike_field(dim: u32, spike_x: u32, spike_y: u32) -> HeightField {
        let mut samples = vec![0.0; (dim * dim) as usize];
        samples[(spike_y * dim + spike_x) as usize] = 1.0;
        HeightField::new(dim, dim, samples).unwrap()
    }

    fn build_both(field: &HeightField, scale: f32, max_iterations: u32) -> (ConeMap, RelaxOutcome) {
        let cone = build_cone_map(
            field,
            &ConeMapParams {
                scale,
                epsilon: 0.01,
            },
        )
        .unwrap();
        let outcome = relax(
            &cone,
            field,
            &RelaxParams {
                scale,
                max_iterations,
            },
        )
        .unwrap();
        (cone, outcome)
    }

    #[test]
    fn test_relaxed_never_exceeds_cone() {
        let field = spike_field(8, 3, 5);
        let (cone, outcome) = build_both(&field, 8.0, 8);
        for y in 0..8 {
            for x in 0..8 {
                assert!(
                    outcome.map.ratio(x, y) <= cone.ratio(x, y),
                    "({x},{y}): relaxed {} > cone {}",
                    outcome.map.ratio(x, y),
                    cone.ratio(x, y)
                );
            }
        }
    }

    #[test]
    fn test_tightens_next_to_constrained_texel() {
        // The spike texel itself keeps ratio 1.0 in the plain map while its
        // neighbors are tightly bound; relaxation must pull it toward them.
        let field = spike_field(5, 2, 2);
        let (cone, outcome) = build_both(&field, 16.0, 8);
        assert_eq!(cone.ratio(2, 2), 1.0);
        assert!(outcome.map.ratio(2, 2) < 1.0);
    }

    #[test]
    fn test_iterates_are_monotone() {
        let field = spike_field(6, 1, 4);
        let cone = build_cone_map(
            &field,
            &ConeMapParams {
                scale: 12.0,
                epsilon: 0.01,
            },
        )
        .unwrap();

        let mut previous: Option<Vec<f32>> = None;
        for budget in 1..=6 {
            let outcome = relax(
                &cone,
                &field,
                &RelaxParams {
                    scale: 12.0,
                    max_iterations: budget,
                },
            )
            .unwrap();
            let ratios = outcome.map.as_cone_map().ratios().to_vec();
            if let Some(prev) = &previous {
                for (a, b) in prev.iter().zip(&ratios) {
                    assert!(b <= a, "iterate increased a ratio: {b} > {a}");
                }
            }
            previous = Some(ratios);
        }
    }

    #[test]
    fn test_flat_map_is_already_fixed_point() {
        let field = HeightField::new(4, 4, vec![0.25; 16]).unwrap();
        let (cone, outcome) = build_both(&field, 1.0, 8);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.map.as_cone_map().ratios(), cone.ratios());
    }

    #[test]
    fn test_budget_exhaustion_is_not_an_error() {
        let field = spike_field(12, 6, 6);
        let (_, outcome) = build_both(&field, 64.0, 1);
        // One sweep over a field this constrained cannot settle.
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 1);
        // The single iterate is still a valid map.
        assert!(outcome
            .map
            .as_cone_map()
            .ratios()
            .iter()
            .all(|&r| (0.0..=1.0).contains(&r)));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let field = spike_field(4, 0, 0);
        let cone = ConeMap::new(3, 3, vec![1.0; 9]).unwrap();
        let err = relax(&cone, &field, &RelaxParams::for_height_field(&field)).unwrap_err();
        assert!(matches!(err, ConeStepError::SampleCountMismatch { .. }));
    }

    #[test]
    fn test_deterministic_across_runs() {
        let field = spike_field(9, 2, 7);
        let (_, a) = build_both(&field, 24.0, 8);
        let (_, b) = build_both(&field, 24.0, 8);
        assert_eq!(
            a.map.as_cone_map().ratios(),
            b.map.as_cone_map().ratios()
        );
    }

    proptest! {
        #[test]
        fn prop_relaxed_bounded_by_cone(
            spike_x in 0u32..6,
            spike_y in 0u32..6,
            scale in 1.0f32..32.0,
        ) {
            let field = spike_field(6, spike_x, spike_y);
            let (cone, outcome) = build_both(&field, scale, 8);
            for (r, c) in outcome
                .map
                .as_cone_map()
                .ratios()
                .iter()
                .zip(cone.ratios())
            {
                prop_assert!(r <= c);
                prop_assert!((0.0..=1.0).contains(r));
            }
        }
    }
}
