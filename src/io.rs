//! Loading and saving images at the edges of the pipeline.
//!
//! Buffers inside the pipeline hold unclamped floats. Values are only
//! clamped to `[0, 1]` here, when they are encoded.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, Rgb32FImage, RgbImage};
use log::info;

use crate::error::{Error, Result};
use crate::pixels::{Color, ImageGray, ImageRgb, PixelBuffer};
use crate::utils::{primitive_to_unit, unit_to_primitive};

impl ImageRgb {
    /// Copies an `image` float buffer without rescaling.
    #[must_use]
    pub fn from_rgb32f(image: &Rgb32FImage) -> Self {
        let data = image.pixels().map(|&Rgb(values)| Color { values }).collect();
        PixelBuffer::from_raw_parts(image.width(), image.height(), data)
    }

    #[must_use]
    pub fn to_rgb32f(&self) -> Rgb32FImage {
        Rgb32FImage::from_fn(self.width(), self.height(), |x, y| {
            Rgb(self.get_unchecked((x as i32, y as i32).into()).values)
        })
    }

    /// Quantises to 8 bits per channel, clamping every channel to `[0, 1]`.
    #[must_use]
    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let color = self.get_unchecked((x as i32, y as i32).into());
            Rgb(color.values.map(unit_to_primitive::<u8>))
        })
    }
}

impl ImageGray {
    #[must_use]
    pub fn from_luma8(image: &GrayImage) -> Self {
        let data = image.pixels().map(|&Luma([v])| primitive_to_unit(v)).collect();
        PixelBuffer::from_raw_parts(image.width(), image.height(), data)
    }

    /// Quantises to 8 bits, clamping to `[0, 1]`.
    #[must_use]
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([unit_to_primitive(*self.get_unchecked((x as i32, y as i32).into()))])
        })
    }
}

/// Reads a colour image, converting it to floats in `[0, 1]`.
///
/// # Errors
///
/// * `Error::Load` - the file is missing or cannot be decoded
pub fn load_rgb_image(path: impl AsRef<Path>) -> Result<ImageRgb> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let image = ImageRgb::from_rgb32f(&image.into_rgb32f());

    info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Reads an image as a single luminance channel in `[0, 1]`.
///
/// # Errors
///
/// * `Error::Load` - the file is missing or cannot be decoded
pub fn load_gray_image(path: impl AsRef<Path>) -> Result<ImageGray> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let image = ImageGray::from_luma8(&image.into_luma8());

    info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Writes a colour image; the format follows the file extension.
///
/// # Errors
///
/// * `Error::Save` - encoding or writing failed
pub fn save_rgb_image(image: &ImageRgb, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image.to_rgb8().save(path).map_err(|e| Error::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("saved {}", path.display());
    Ok(())
}

/// Writes a grayscale image; the format follows the file extension.
///
/// # Errors
///
/// * `Error::Save` - encoding or writing failed
pub fn save_gray_image(image: &ImageGray, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image.to_luma8().save(path).map_err(|e| Error::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("saved {}", path.display());
    Ok(())
}
