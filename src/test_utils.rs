//! Test utilities for haze-removal
//!
//! This module provides common functionality for testing image operations.
//! It is only compiled when running tests.

#[cfg(test)]
use crate::pixels::{Color, ImageGray, ImageRgb};

/// Creates a 2x2 test colour image with predefined pixel values.
///
/// - (0,0): [0.8, 0.6, 0.4]
/// - (1,0): [0.4, 0.8, 0.6]
/// - (0,1): [0.6, 0.4, 0.8]
/// - (1,1): [0.2, 0.3, 0.1]
#[cfg(test)]
pub fn create_test_rgb_image() -> ImageRgb {
    let pixels = [
        Color::new(0.8, 0.6, 0.4),
        Color::new(0.4, 0.8, 0.6),
        Color::new(0.6, 0.4, 0.8),
        Color::new(0.2, 0.3, 0.1),
    ];
    ImageRgb::from_fn(2, 2, |x, y| pixels[(y * 2 + x) as usize])
}

/// Creates a grayscale ramp with value `x + 10 * y` at each pixel.
#[cfg(test)]
pub fn create_gradient_gray_image(width: u32, height: u32) -> ImageGray {
    ImageGray::from_fn(width, height, |x, y| (x + 10 * y) as f32)
}

/// Creates a colour image whose left half is a bright hazy grey and whose
/// right half is a dark saturated red.
///
/// The two halves give the depth prior clearly distinct values.
#[cfg(test)]
pub fn create_hazy_test_image(width: u32, height: u32) -> ImageRgb {
    ImageRgb::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Color::new(0.85, 0.87, 0.9)
        } else {
            Color::new(0.6, 0.1, 0.05)
        }
    })
}

/// Compares two colours channel by channel with a tolerance.
#[cfg(test)]
pub fn colors_approx_equal(expected: Color, actual: Color, tolerance: f32) -> bool {
    expected
        .values
        .iter()
        .zip(actual.values.iter())
        .all(|(e, a)| (e - a).abs() <= tolerance)
}

/// Compares two grayscale images pixel by pixel with a tolerance.
///
/// Returns `false` when the dimensions differ.
#[cfg(test)]
pub fn gray_images_approx_equal(expected: &ImageGray, actual: &ImageGray, tolerance: f32) -> bool {
    expected.dimensions() == actual.dimensions()
        && expected
            .as_slice()
            .iter()
            .zip(actual.as_slice().iter())
            .all(|(e, a)| (e - a).abs() <= tolerance)
}

/// Compares two colour images pixel by pixel with a tolerance.
///
/// Returns `false` when the dimensions differ.
#[cfg(test)]
pub fn rgb_images_approx_equal(expected: &ImageRgb, actual: &ImageRgb, tolerance: f32) -> bool {
    expected.dimensions() == actual.dimensions()
        && expected
            .as_slice()
            .iter()
            .zip(actual.as_slice().iter())
            .all(|(&e, &a)| colors_approx_equal(e, a, tolerance))
}
