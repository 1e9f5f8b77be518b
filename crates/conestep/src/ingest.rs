//! Height-field ingestion from decoded images.
//!
//! The `image` crate plays the external-decoder collaborator: it owns file
//! formats and decode failures, and this module routes its output through
//! [`HeightField::from_decoded`], which owns channel selection and
//! normalization.

use std::path::Path;

use conestep_core::{ConeStepError, HeightField};
use image::DynamicImage;

use crate::error::Result;

/// Loads a height field from an image file.
///
/// # Errors
///
/// Returns [`PipelineError::Decode`] if the file cannot be opened or
/// decoded, or a core error for unusable decoded data (zero dimensions,
/// unsupported channel layout).
///
/// [`PipelineError::Decode`]: crate::PipelineError::Decode
pub fn load_height_field<P: AsRef<Path>>(path: P) -> Result<HeightField> {
    let path = path.as_ref();
    let img = image::open(path)?;
    log::info!(
        "loaded height map {:?}: {}x{}, {:?}",
        path,
        img.width(),
        img.height(),
        img.color()
    );
    height_field_from_image(&img)
}

/// Converts an already-decoded image into a height field.
///
/// Grayscale images feed their single channel straight through; RGB and
/// RGBA images reduce to luminance (alpha ignored). Other layouts are
/// rejected.
///
/// # Errors
///
/// Returns [`ConeStepError::UnsupportedChannelLayout`] for channel counts
/// outside {1, 3, 4}, or [`ConeStepError::EmptyImage`] for a zero dimension.
pub fn height_field_from_image(img: &DynamicImage) -> Result<HeightField> {
    let (w, h) = (img.width(), img.height());
    let field = match img.color().channel_count() {
        1 => HeightField::from_decoded(w, h, 1, img.to_luma8().as_raw())?,
        3 => HeightField::from_decoded(w, h, 3, img.to_rgb8().as_raw())?,
        4 => HeightField::from_decoded(w, h, 4, img.to_rgba8().as_raw())?,
        channels => return Err(ConeStepError::UnsupportedChannelLayout(channels).into()),
    };
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn test_gray_image_passes_through() {
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, image::Luma([0]));
        img.put_pixel(1, 0, image::Luma([255]));
        img.put_pixel(0, 1, image::Luma([128]));
        img.put_pixel(1, 1, image::Luma([64]));

        let field = height_field_from_image(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(field.sample(0, 0), 0.0);
        assert_eq!(field.sample(1, 0), 1.0);
        assert!((field.sample(0, 1) - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_image_reduces_to_luminance() {
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgb([0, 255, 0]));
        let field = height_field_from_image(&DynamicImage::ImageRgb8(img)).unwrap();
        assert!((field.sample(0, 0) - 0.587).abs() < 1e-5);
    }

    #[test]
    fn test_luma_alpha_rejected() {
        let img = DynamicImage::ImageLumaA8(image::GrayAlphaImage::new(2, 2));
        let err = height_field_from_image(&img).unwrap_err();
        assert!(matches!(
            err,
            crate::PipelineError::Core(ConeStepError::UnsupportedChannelLayout(2))
        ));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_height_field("definitely/not/a/real/heightmap.png").unwrap_err();
        assert!(matches!(err, crate::PipelineError::Decode(_)));
    }
}
