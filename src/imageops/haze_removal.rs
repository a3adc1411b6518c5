use std::cmp::Ordering;

use log::debug;

use crate::error::{Error, Result};
use crate::pixels::{Color, ImageGray, ImageRgb};

/// Lower bound of the transmission map; keeps `1 / t` from exploding in dense haze.
pub const MIN_TRANSMISSION: f32 = 0.1;
/// Upper bound of the transmission map.
pub const MAX_TRANSMISSION: f32 = 0.9;

/// Share of pixels, by depth, considered when looking for the atmospheric light.
const ATMOSPHERIC_LIGHT_FRACTION: usize = 1000;

/// Scene radiance recovery for hazy images
pub trait RemoveHaze: Sized {
    /// Inverts `I = J * t + A * (1 - t)` using the given depth map.
    ///
    /// The result is not clamped; values outside `[0, 1]` are expected and
    /// must be handled when the image is written.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `beta` is negative or not finite
    /// * `Error::DimensionMismatch` - image and depth differ in size
    /// * `Error::DegenerateInput` - the image is empty
    fn remove_haze(&self, depth: &ImageGray, beta: f32) -> Result<Self>;
}

impl RemoveHaze for ImageRgb {
    fn remove_haze(&self, depth: &ImageGray, beta: f32) -> Result<Self> {
        remove_haze(self, depth, beta)
    }
}

/// See [`RemoveHaze::remove_haze`].
///
/// # Errors
///
/// See [`RemoveHaze::remove_haze`].
pub fn remove_haze(image: &ImageRgb, depth: &ImageGray, beta: f32) -> Result<ImageRgb> {
    if !(beta.is_finite() && beta >= 0.0) {
        return Err(Error::InvalidParameter(format!(
            "scattering coefficient must be a non-negative number, got {beta}"
        )));
    }
    image.check_dimensions(depth)?;

    let light = estimate_atmospheric_light(image, depth)?;
    debug!("atmospheric light {light}");

    image.zip_map(depth, |pixel, d| {
        light + (pixel - light) / transmission(d, beta)
    })
}

/// `exp(-beta * depth)` clamped to `[MIN_TRANSMISSION, MAX_TRANSMISSION]`.
#[must_use]
pub fn transmission(depth: f32, beta: f32) -> f32 {
    (-beta * depth)
        .exp()
        .clamp(MIN_TRANSMISSION, MAX_TRANSMISSION)
}

/// Most luminous colour among the deepest 0.1% of pixels (at least one).
///
/// Only the candidate set is selected; it is never sorted.
///
/// # Errors
///
/// * `Error::DimensionMismatch` - image and depth differ in size
/// * `Error::DegenerateInput` - the image is empty
pub fn estimate_atmospheric_light(image: &ImageRgb, depth: &ImageGray) -> Result<Color> {
    image.check_dimensions(depth)?;
    if image.is_empty() {
        return Err(Error::DegenerateInput(
            "cannot estimate atmospheric light of an empty image".to_string(),
        ));
    }

    let depths = depth.as_slice();
    let pixels = image.as_slice();
    let candidates = (pixels.len() / ATMOSPHERIC_LIGHT_FRACTION).max(1);

    let mut indices: Vec<usize> = (0..pixels.len()).collect();
    // Deepest first
    indices.select_nth_unstable_by(candidates - 1, |&a, &b| depths[b].total_cmp(&depths[a]));

    indices[..candidates]
        .iter()
        .map(|&i| pixels[i])
        .max_by(|a, b| compare_luminance(a, b))
        .ok_or_else(|| Error::DegenerateInput("no atmospheric light candidates".to_string()))
}

fn compare_luminance(a: &Color, b: &Color) -> Ordering {
    a.luminance().total_cmp(&b.luminance())
}
