use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Rec. 709 luminance weights for linear RGB
pub const LUMINANCE_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Linear RGB colour with channels nominally in `[0, 1]`
///
/// The range is not enforced; intermediate results of haze removal
/// routinely leave it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub values: [f32; 3],
}

impl Color {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { values: [r, g, b] }
    }

    /// Colour with all three channels set to `v`
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self { values: [v, v, v] }
    }

    #[must_use]
    pub const fn r(&self) -> f32 {
        self.values[0]
    }

    #[must_use]
    pub const fn g(&self) -> f32 {
        self.values[1]
    }

    #[must_use]
    pub const fn b(&self) -> f32 {
        self.values[2]
    }

    pub fn r_mut(&mut self) -> &mut f32 {
        &mut self.values[0]
    }

    pub fn g_mut(&mut self) -> &mut f32 {
        &mut self.values[1]
    }

    pub fn b_mut(&mut self) -> &mut f32 {
        &mut self.values[2]
    }

    #[must_use]
    pub fn luminance(&self) -> f32 {
        let [wr, wg, wb] = LUMINANCE_WEIGHTS;
        wb.mul_add(self.b(), wr.mul_add(self.r(), wg * self.g()))
    }

    /// Rescales the colour so that its luminance becomes `value`.
    ///
    /// A black colour has no hue to preserve, so all channels are set to
    /// `value` directly.
    pub fn set_luminance(&mut self, value: f32) {
        let current = self.luminance();
        if current == 0.0 {
            *self = Self::splat(value);
            return;
        }
        *self = *self * (value / current);
    }

    /// Chroma relative to luminance, `(max - min) / luminance`; zero for black.
    #[must_use]
    pub fn saturation(&self) -> f32 {
        let max = self.r().max(self.g()).max(self.b());
        let min = self.r().min(self.g()).min(self.b());
        let luminance = self.luminance();

        if luminance == 0.0 {
            return 0.0;
        }
        (max - min) / luminance
    }

    #[must_use]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let [r, g, b] = self.values;
        Self::new(f(r), f(g), f(b))
    }

    #[must_use]
    pub fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(
            f(self.r(), other.r()),
            f(self.g(), other.g()),
            f(self.b(), other.b()),
        )
    }
}

impl From<[f32; 3]> for Color {
    fn from(values: [f32; 3]) -> Self {
        Self { values }
    }
}

impl From<f32> for Color {
    fn from(v: f32) -> Self {
        Self::splat(v)
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a + b)
    }
}

impl Sub for Color {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a - b)
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a * b)
    }
}

impl Div for Color {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.zip_map(rhs, |a, b| a / b)
    }
}

impl Add<f32> for Color {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        self.map(|v| v + rhs)
    }
}

impl Sub<f32> for Color {
    type Output = Self;

    fn sub(self, rhs: f32) -> Self {
        self.map(|v| v - rhs)
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.map(|v| v * rhs)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl Div<f32> for Color {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        self.map(|v| v / rhs)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ r: {}, g: {}, b: {} }}", self.r(), self.g(), self.b())
    }
}

/// Linear interpolation from `lhs` (amount 0) to `rhs` (amount 1)
#[must_use]
pub fn blend(lhs: Color, rhs: Color, amount: f32) -> Color {
    rhs * amount + lhs * (1.0 - amount)
}

#[must_use]
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.003_130_8 {
        return value * 12.92;
    }
    1.055f32.mul_add(value.powf(1.0 / 2.4), -0.055)
}

#[must_use]
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        return value / 12.92;
    }
    ((value + 0.055) / 1.055).powf(2.4)
}

#[must_use]
pub fn linear_to_srgb_color(color: Color) -> Color {
    color.map(linear_to_srgb)
}

#[must_use]
pub fn srgb_to_linear_color(color: Color) -> Color {
    color.map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn luminance_uses_rec709_weights() {
        assert!((Color::new(1.0, 0.0, 0.0).luminance() - 0.2126).abs() < TOLERANCE);
        assert!((Color::new(0.0, 1.0, 0.0).luminance() - 0.7152).abs() < TOLERANCE);
        assert!((Color::new(0.0, 0.0, 1.0).luminance() - 0.0722).abs() < TOLERANCE);
        assert!((Color::splat(0.5).luminance() - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn saturation_of_black_is_zero() {
        assert_eq!(Color::default().saturation(), 0.0);
    }

    #[test]
    fn saturation_of_grey_is_zero_and_of_pure_red_is_positive() {
        assert_eq!(Color::splat(0.3).saturation(), 0.0);
        let red = Color::new(1.0, 0.0, 0.0);
        assert!((red.saturation() - 1.0 / 0.2126).abs() < 1e-3);
    }

    #[test]
    fn set_luminance_scales_channels() {
        let mut c = Color::new(0.2, 0.4, 0.1);
        c.set_luminance(0.6);
        assert!((c.luminance() - 0.6).abs() < TOLERANCE);
        assert!((c.g() / c.r() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn set_luminance_on_black_sets_channels_directly() {
        let mut c = Color::default();
        c.set_luminance(0.25);
        assert_eq!(c, Color::splat(0.25));
    }

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Color::new(1.0, 2.0, 3.0);
        let b = Color::new(0.5, 0.5, 1.5);
        assert_eq!(a + b, Color::new(1.5, 2.5, 4.5));
        assert_eq!(a - b, Color::new(0.5, 1.5, 1.5));
        assert_eq!(a * b, Color::new(0.5, 1.0, 4.5));
        assert_eq!(a / b, Color::new(2.0, 4.0, 2.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Color::new(0.5, 1.0, 1.5));
        assert_eq!(a + 1.0, Color::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn blend_endpoints() {
        let a = Color::splat(0.0);
        let b = Color::splat(1.0);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.25), Color::splat(0.25));
    }

    #[test]
    fn srgb_round_trip() {
        for i in 0..=20 {
            let v = i as f32 / 20.0;
            assert!((srgb_to_linear(linear_to_srgb(v)) - v).abs() < 1e-4);
        }
        let c = Color::new(0.1, 0.5, 0.9);
        let back = srgb_to_linear_color(linear_to_srgb_color(c));
        assert!((back.r() - c.r()).abs() < 1e-4);
        assert!((back.b() - c.b()).abs() < 1e-4);
    }

    #[test]
    fn display_lists_channels() {
        assert_eq!(
            Color::new(1.0, 0.5, 0.0).to_string(),
            "{ r: 1, g: 0.5, b: 0 }"
        );
    }
}
