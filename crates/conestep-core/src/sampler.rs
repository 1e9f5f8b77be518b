//! Read-side contract for consumers of a quantized cone map.
//!
//! The renderer uploads the bytes from [`ConeMap::to_bytes`] as a texture
//! and marches rays against it in a shader; this module fixes the numeric
//! interpretation of those bytes so the two sides agree. Texture filtering
//! and wrap/clamp-at-edge policy belong to the renderer, not here.
//!
//! [`ConeMap::to_bytes`]: crate::ConeMap::to_bytes

use crate::error::{ConeStepError, Result};

/// Reconstructs a cone ratio from its stored byte.
#[inline]
#[must_use]
pub fn decode_ratio(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}

/// Largest safe advance along a marching ray leaving the surface point with
/// the given cone ratio.
///
/// `ray_slope` is the ray's vertical drop per horizontal unit, in the same
/// scale units the map was built with. The cone of ratio `r` admits any
/// step whose horizontal extent stays within `r` times the vertical
/// clearance gained, which solves to `r / (1 + r * ray_slope)` horizontal
/// units for a descending ray.
#[inline]
#[must_use]
pub fn safe_step(ratio: f32, ray_slope: f32) -> f32 {
    ratio / (1.0 + ratio * ray_slope)
}

/// A borrowed view over a quantized cone-map grid.
///
/// This is the CPU-side mirror of what the shader samples: useful for
/// software marchers and for validating uploaded data. Coordinates must be
/// in range; edge policy is the caller's.
#[derive(Debug, Clone, Copy)]
pub struct ConeMapSampler<'a> {
    width: u32,
    height: u32,
    bytes: &'a [u8],
}

impl<'a> ConeMapSampler<'a> {
    /// Wraps a quantized byte grid.
    ///
    /// # Errors
    ///
    /// Returns [`ConeStepError::InvalidDimensions`] or
    /// [`ConeStepError::SampleCountMismatch`] on shape violations.
    pub fn new(width: u32, height: u32, bytes: &'a [u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConeStepError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if bytes.len() != expected {
            return Err(ConeStepError::SampleCountMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Returns the grid width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the grid height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the reconstructed ratio at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[must_use]
    pub fn ratio_at(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height);
        decode_ratio(self.bytes[(y * self.width + x) as usize])
    }
}
