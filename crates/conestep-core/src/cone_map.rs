//! Cone-map storage: per-texel safe-step ratios and their 8-bit quantization.

use crate::error::{ConeStepError, Result};

/// A per-texel grid of cone-aspect ratios in `[0, 1]`.
///
/// Each ratio bounds how far a ray marcher may step horizontally per unit of
/// vertical clearance (in the builder's scale units) without passing through
/// the surface. Storage matches the source [`HeightField`]: row-major,
/// `ratios[y * width + x]`.
///
/// [`HeightField`]: crate::HeightField
#[derive(Debug, Clone, PartialEq)]
pub struct ConeMap {
    width: u32,
    height: u32,
    ratios: Vec<f32>,
}

impl ConeMap {
    /// Creates a cone map from already-computed ratios. Ratios are clamped
    /// to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConeStepError::InvalidDimensions`] or
    /// [`ConeStepError::SampleCountMismatch`] on shape violations.
    pub fn new(width: u32, height: u32, mut ratios: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConeStepError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if ratios.len() != expected {
            return Err(ConeStepError::SampleCountMismatch {
                expected,
                actual: ratios.len(),
            });
        }
        for r in &mut ratios {
            *r = r.clamp(0.0, 1.0);
        }
        Ok(Self {
            width,
            height,
            ratios,
        })
    }

    /// Returns the map width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the map height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the ratio at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[must_use]
    pub fn ratio(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height);
        self.ratios[(y * self.width + x) as usize]
    }

    /// Returns the full ratio buffer, row-major.
    #[must_use]
    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }

    /// Quantizes the map for texture upload: one byte per texel,
    /// `round(ratio * 255.99)` clamped to `[0, 255]`.
    ///
    /// The consumer reconstructs `ratio = byte / 255.0`; see
    /// [`crate::sampler`].
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.ratios.iter().map(|&r| quantize(r)).collect()
    }
}

/// A cone map refined by the relaxation pass.
///
/// Holds the same shape and units as [`ConeMap`]; every ratio is pointwise
/// less than or equal to the plain map it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxedConeMap {
    map: ConeMap,
}

impl RelaxedConeMap {
    pub(crate) fn from_map(map: ConeMap) -> Self {
        Self { map }
    }

    /// Returns the underlying ratio grid.
    #[must_use]
    pub fn as_cone_map(&self) -> &ConeMap {
        &self.map
    }

    /// Returns the ratio at `(x, y)`.
    #[must_use]
    pub fn ratio(&self, x: u32, y: u32) -> f32 {
        self.map.ratio(x, y)
    }

    /// Quantizes the map for texture upload; same contract as
    /// [`ConeMap::to_bytes`].
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.map.to_bytes()
    }
}

/// Quantizes a ratio in `[0, 1]` to the 8-bit storage format.
#[inline]
#[must_use]
pub fn quantize(ratio: f32) -> u8 {
    (ratio * 255.99).round().clamp(0.0, 255.0) as u8
}
