//! Height-field ingestion: the immutable input grid for cone-map builds.

use crate::error::{ConeStepError, Result};

/// An immutable 2D grid of normalized height samples.
///
/// Samples are stored row-major: the value for texel `(x, y)` lives at index
/// `y * width + x`. Every sample is in `[0, 1]`. The field is read-only after
/// construction; rebuilding the cone maps for a changed surface means
/// constructing a new field and running the pipeline again.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl HeightField {
    /// Creates a height field from pre-normalized samples.
    ///
    /// Samples outside `[0, 1]` are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ConeStepError::InvalidDimensions`] if either dimension is
    /// zero, or [`ConeStepError::SampleCountMismatch`] if the buffer length
    /// is not `width * height`.
    pub fn new(width: u32, height: u32, mut samples: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConeStepError::InvalidDimensions { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if samples.len() != expected {
            return Err(ConeStepError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        for s in &mut samples {
            *s = s.clamp(0.0, 1.0);
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Builds a height field from raw decoded image samples.
    ///
    /// This is the ingestion boundary with the external image decoder: it
    /// accepts the decoder's `(width, height, channels, bytes)` and selects
    /// one scalar per texel. A single-channel image uses the byte directly;
    /// 3- and 4-channel images take the Rec. 601 luminance of RGB (alpha is
    /// ignored). Each scalar normalizes to `[0, 1]` by `/ 255`.
    ///
    /// # Errors
    ///
    /// Returns [`ConeStepError::EmptyImage`] for a zero dimension,
    /// [`ConeStepError::UnsupportedChannelLayout`] for a channel count
    /// outside {1, 3, 4}, or [`ConeStepError::SampleCountMismatch`] if the
    /// byte buffer length is not `width * height * channels`.
    pub fn from_decoded(width: u32, height: u32, channels: u8, bytes: &[u8]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConeStepError::EmptyImage);
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(ConeStepError::UnsupportedChannelLayout(channels));
        }
        let texels = (width as usize) * (height as usize);
        let expected = texels * channels as usize;
        if bytes.len() != expected {
            return Err(ConeStepError::SampleCountMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let stride = channels as usize;
        let samples = (0..texels)
            .map(|i| {
                let px = &bytes[i * stride..i * stride + stride];
                let value = if stride == 1 {
                    f32::from(px[0])
                } else {
                    // Rec. 601 luma weights
                    0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2])
                };
                value / 255.0
            })
            .collect();

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Returns the field width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the field height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of texels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the field has no texels. Unreachable for a
    /// constructed field (dimensions are validated), kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height);
        self.samples[(y * self.width + x) as usize]
    }

    /// Returns the full sample buffer, row-major.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns the (min, max) sample range.
    #[must_use]
    pub fn min_max(&self) -> (f32, f32) {
        let min = self.samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = self
            .samples
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_dimensions() {
        assert!(matches!(
            HeightField::new(0, 4, vec![]),
            Err(ConeStepError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            HeightField::new(4, 0, vec![]),
            Err(ConeStepError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_new_validates_sample_count() {
        let err = HeightField::new(2, 2, vec![0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            ConeStepError::SampleCountMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_new_clamps_samples() {
        let field = HeightField::new(2, 1, vec![-0.5, 1.5]).unwrap();
        assert_eq!(field.sample(0, 0), 0.0);
        assert_eq!(field.sample(1, 0), 1.0);
    }

    #[test]
    fn test_row_major_indexing() {
        // 2x2 grid: [0, 1, 2, 3] row-major
        let field = HeightField::new(2, 2, vec![0.0, 0.25, 0.5, 0.75]).unwrap();
        assert_eq!(field.sample(0, 0), 0.0);
        assert_eq!(field.sample(1, 0), 0.25);
        assert_eq!(field.sample(0, 1), 0.5);
        assert_eq!(field.sample(1, 1), 0.75);
    }

    #[test]
    fn test_from_decoded_single_channel() {
        let field = HeightField::from_decoded(2, 2, 1, &[0, 255, 128, 64]).unwrap();
        assert_eq!(field.sample(0, 0), 0.0);
        assert_eq!(field.sample(1, 0), 1.0);
        assert!((field.sample(0, 1) - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_decoded_rgb_luminance() {
        // Pure white and pure black should hit the range ends exactly.
        let field = HeightField::from_decoded(2, 1, 3, &[255, 255, 255, 0, 0, 0]).unwrap();
        assert!((field.sample(0, 0) - 1.0).abs() < 1e-5);
        assert_eq!(field.sample(1, 0), 0.0);

        // Pure green weighs in at 0.587.
        let field = HeightField::from_decoded(1, 1, 3, &[0, 255, 0]).unwrap();
        assert!((field.sample(0, 0) - 0.587).abs() < 1e-5);
    }

    #[test]
    fn test_from_decoded_rgba_ignores_alpha() {
        let opaque = HeightField::from_decoded(1, 1, 4, &[100, 100, 100, 255]).unwrap();
        let clear = HeightField::from_decoded(1, 1, 4, &[100, 100, 100, 0]).unwrap();
        assert_eq!(opaque.sample(0, 0), clear.sample(0, 0));
    }

    #[test]
    fn test_from_decoded_rejects_two_channels() {
        let err = HeightField::from_decoded(1, 1, 2, &[0, 0]).unwrap_err();
        assert!(matches!(err, ConeStepError::UnsupportedChannelLayout(2)));
    }

    #[test]
    fn test_from_decoded_rejects_empty() {
        let err = HeightField::from_decoded(0, 8, 1, &[]).unwrap_err();
        assert!(matches!(err, ConeStepError::EmptyImage));
    }

    #[test]
    fn test_min_max() {
        let field = HeightField::new(2, 2, vec![0.1, 0.9, 0.4, 0.5]).unwrap();
        let (min, max) = field.min_max();
        assert_eq!(min, 0.1);
        assert_eq!(max, 0.9);
    }
}
