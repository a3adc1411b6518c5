//! Internal helpers for moving samples between the float pipeline and
//! integer image formats.

use image::Primitive;
use imageproc::definitions::Clamp;

/// Maps a value in `[0, 1]` onto the full range of `T`, rounding to nearest.
///
/// Values outside the unit range saturate at the limits of `T`.
#[inline]
pub fn unit_to_primitive<T>(value: f32) -> T
where
    T: Primitive + Clamp<f32> + Into<f32>,
{
    let max: f32 = T::DEFAULT_MAX_VALUE.into();
    T::clamp(value.mul_add(max, 0.5))
}

/// Normalizes a sample to `[0, 1]` using the maximum value of its type.
#[inline]
pub fn primitive_to_unit<S>(value: S) -> f32
where
    S: Primitive + Into<f32>,
{
    value.into() / S::DEFAULT_MAX_VALUE.into()
}
