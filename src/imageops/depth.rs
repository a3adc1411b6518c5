use log::debug;

use crate::error::{Error, Result};
use crate::pixels::{Color, Coord, ImageGray, ImageRgb, PixelBuffer};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Colour attenuation prior coefficients `(theta0, theta1, theta2)`
///
/// Scene depth is modelled as `theta0 + theta1 * luminance + theta2 * saturation`.
pub const THETA: [f32; 3] = [0.121_779, 0.959_710, -0.780_245];

/// Haze depth estimation from a single hazy image
pub trait EstimateDepth {
    /// Estimates a normalised depth map in `[0, 1]`.
    ///
    /// `kernel_size` is the side length of the square minimum filter
    /// applied to the raw prior.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `kernel_size` is zero
    /// * `Error::DegenerateInput` - the filtered depth is constant, so it cannot be normalised
    fn estimate_depth(&self, kernel_size: u32) -> Result<ImageGray>;
}

impl EstimateDepth for ImageRgb {
    fn estimate_depth(&self, kernel_size: u32) -> Result<ImageGray> {
        estimate_depth(self, kernel_size)
    }
}

/// See [`EstimateDepth::estimate_depth`].
///
/// # Errors
///
/// See [`EstimateDepth::estimate_depth`].
pub fn estimate_depth(image: &ImageRgb, kernel_size: u32) -> Result<ImageGray> {
    if kernel_size == 0 {
        return Err(Error::InvalidParameter(
            "depth kernel size must be positive".to_string(),
        ));
    }

    let raw = estimate_raw_depth(image);
    let mut depth = min_filter(&raw, kernel_size);
    normalise(&mut depth)?;

    debug!(
        "estimated depth for {}x{} image, kernel size {kernel_size}",
        image.width(),
        image.height()
    );
    Ok(depth)
}

/// Per-pixel depth prior, clamped to `[0, 1]`.
#[must_use]
pub fn estimate_raw_depth(image: &ImageRgb) -> ImageGray {
    image.map(pixel_depth)
}

fn pixel_depth(pixel: Color) -> f32 {
    let [theta0, theta1, theta2] = THETA;
    let depth = theta2.mul_add(pixel.saturation(), theta1.mul_add(pixel.luminance(), theta0));
    depth.clamp(0.0, 1.0)
}

/// Minimum over a `kernel_size` square window centred on each pixel.
///
/// Windows are clipped at the borders. A zero kernel is treated as 1.
#[must_use]
pub fn min_filter(image: &ImageGray, kernel_size: u32) -> ImageGray {
    let (width, height) = image.dimensions();
    let kernel = kernel_size.max(1) as i32;
    let view = image.view();

    let window_min = |x: u32, y: u32| {
        view.centred_sub_view(Coord::new(x as i32, y as i32), kernel, kernel)
            .coords()
            .map(|c| *image.get_unchecked(c))
            .fold(f32::INFINITY, f32::min)
    };

    #[cfg(feature = "rayon")]
    let data: Vec<f32> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| (0..width).map(move |x| window_min(x, y)))
        .collect();

    #[cfg(not(feature = "rayon"))]
    let data: Vec<f32> = (0..height)
        .flat_map(|y| (0..width).map(move |x| window_min(x, y)))
        .collect();

    PixelBuffer::from_raw_parts(width, height, data)
}

/// Rescales values so that the minimum becomes 0.0 and the maximum 1.0.
///
/// # Errors
///
/// * `Error::DegenerateInput` - the image is empty or all values are equal
pub fn normalise(image: &mut ImageGray) -> Result<()> {
    let (min, max) = image
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !(max > min) {
        return Err(Error::DegenerateInput(format!(
            "cannot normalise a flat depth map (min {min}, max {max})"
        )));
    }

    let range = max - min;
    for v in image.as_mut_slice() {
        *v = (*v - min) / range;
    }
    Ok(())
}
