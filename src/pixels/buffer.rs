use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use itertools::iproduct;

use crate::error::{Error, Result};
use crate::pixels::{Color, Coord, ImageView};

/// Value types a [`PixelBuffer`] can hold
///
/// Elements form a vector space over `f32` closed under element-wise
/// arithmetic, which is all the box and guided filters need.
pub trait Element:
    Copy
    + Default
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Add<f32, Output = Self>
    + Sub<f32, Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
{
}

impl Element for f32 {}

impl Element for Color {}

/// Dense row-major 2D buffer of pixel values
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    width: u32,
    height: u32,
    data: Vec<T>,
}

/// Three-channel linear RGB image
pub type ImageRgb = PixelBuffer<Color>;

/// Single-channel float image
pub type ImageGray = PixelBuffer<f32>;

impl<T: Element> PixelBuffer<T> {
    /// Creates a buffer filled with `T::default()`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps row-major pixel data.
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `data.len()` is not `width * height`
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "pixel data holds {} values, {width}x{height} image needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Length already checked by the caller.
    pub(crate) fn from_raw_parts(width: u32, height: u32, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let data = iproduct!(0..height, 0..width)
            .map(|(y, x)| f(x, y))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn map<U: Element>(&self, f: impl Fn(T) -> U) -> PixelBuffer<U> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two equally sized buffers pixel by pixel.
    ///
    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn zip_map<U: Element, V: Element>(
        &self,
        other: &PixelBuffer<U>,
        f: impl Fn(T, U) -> V,
    ) -> Result<PixelBuffer<V>> {
        self.check_dimensions(other)?;
        Ok(PixelBuffer {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    fn zip_assign(&mut self, other: &Self, f: impl Fn(T, T) -> T) -> Result<()> {
        self.check_dimensions(other)?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = f(*a, b);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a + b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_sub(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a - b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a * b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_div(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a / b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_add_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |a, b| a + b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_sub_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |a, b| a - b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_mul_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |a, b| a * b)
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - the buffers differ in size
    pub fn try_div_assign(&mut self, other: &Self) -> Result<()> {
        self.zip_assign(other, |a, b| a / b)
    }
}

impl<T> PixelBuffer<T> {
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels, always `width * height`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View covering the whole buffer.
    #[must_use]
    pub fn view(&self) -> ImageView {
        self.sub_view(Coord::default(), self.width as i32, self.height as i32)
    }

    /// View over a sub-rectangle, clamped to the buffer.
    #[must_use]
    pub fn sub_view(&self, offset: Coord, width: i32, height: i32) -> ImageView {
        ImageView::new(self.bounds(), offset, width, height)
    }

    /// Pixel at `coord` after clamping it to the buffer's edges.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[must_use]
    pub fn get(&self, coord: Coord) -> &T {
        &self.data[self.clamped_index(coord)]
    }

    /// Mutable pixel at `coord` after clamping it to the buffer's edges.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn get_mut(&mut self, coord: Coord) -> &mut T {
        let index = self.clamped_index(coord);
        &mut self.data[index]
    }

    /// Pixel at `coord` without clamping.
    ///
    /// The caller guarantees `coord` lies inside the buffer; coordinates
    /// outside it either alias another pixel or panic.
    #[must_use]
    pub fn get_unchecked(&self, coord: Coord) -> &T {
        debug_assert!(self.contains(coord), "coordinate {coord} out of bounds");
        &self.data[self.index_of(coord)]
    }

    /// See [`PixelBuffer::get_unchecked`].
    pub fn get_unchecked_mut(&mut self, coord: Coord) -> &mut T {
        debug_assert!(self.contains(coord), "coordinate {coord} out of bounds");
        let index = self.index_of(coord);
        &mut self.data[index]
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// # Errors
    ///
    /// * `Error::DimensionMismatch` - `other` differs in size
    pub fn check_dimensions<U>(&self, other: &PixelBuffer<U>) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }

    const fn bounds(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn index_of(&self, coord: Coord) -> usize {
        coord.y as usize * self.width as usize + coord.x as usize
    }

    fn clamped_index(&self, coord: Coord) -> usize {
        let (max_x, max_y) = (self.width as i32 - 1, self.height as i32 - 1);
        self.index_of(Coord::new(
            coord.x.clamp(0, max_x.max(0)),
            coord.y.clamp(0, max_y.max(0)),
        ))
    }
}

macro_rules! impl_scalar_op {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident) => {
        impl<T: Element> $op<f32> for PixelBuffer<T> {
            type Output = Self;

            fn $method(mut self, rhs: f32) -> Self {
                for v in &mut self.data {
                    *v = $op::$method(*v, rhs);
                }
                self
            }
        }

        impl<T: Element> $op<f32> for &PixelBuffer<T> {
            type Output = PixelBuffer<T>;

            fn $method(self, rhs: f32) -> PixelBuffer<T> {
                $op::$method(self.clone(), rhs)
            }
        }

        impl<T: Element> $assign_op<f32> for PixelBuffer<T> {
            fn $assign_method(&mut self, rhs: f32) {
                for v in &mut self.data {
                    *v = $op::$method(*v, rhs);
                }
            }
        }
    };
}

impl_scalar_op!(Add, add, AddAssign, add_assign);
impl_scalar_op!(Sub, sub, SubAssign, sub_assign);
impl_scalar_op!(Mul, mul, MulAssign, mul_assign);
impl_scalar_op!(Div, div, DivAssign, div_assign);

/// Splits a colour image into its red, green and blue planes.
#[must_use]
pub fn split_channels(image: &ImageRgb) -> [ImageGray; 3] {
    [0, 1, 2].map(|channel| image.map(|p| p.values[channel]))
}

/// Joins three planes into one colour image.
///
/// # Errors
///
/// * `Error::DimensionMismatch` - the planes differ in size
pub fn join_channels(r: &ImageGray, g: &ImageGray, b: &ImageGray) -> Result<ImageRgb> {
    r.check_dimensions(g)?;
    r.check_dimensions(b)?;

    let data = r
        .data
        .iter()
        .zip(g.data.iter())
        .zip(b.data.iter())
        .map(|((&r, &g), &b)| Color::new(r, g, b))
        .collect();

    Ok(PixelBuffer {
        width: r.width,
        height: r.height,
        data,
    })
}
