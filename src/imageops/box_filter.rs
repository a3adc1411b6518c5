use crate::pixels::{Element, PixelBuffer};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Running sum over a sliding window
///
/// Holds only the sum and the number of samples currently inside the
/// window, so each 1D pass costs O(n) whatever the radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowAccumulator<T> {
    sum: T,
    count: u32,
}

impl<T: Element> WindowAccumulator<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sum: T::default(),
            count: 0,
        }
    }

    /// Adds a sample entering the window.
    pub fn push(&mut self, value: T) {
        self.sum = self.sum + value;
        self.count += 1;
    }

    /// Removes a sample leaving the window. It must have been pushed before.
    pub fn pop(&mut self, value: T) {
        debug_assert!(self.count > 0, "pop from an empty window");
        self.sum = self.sum - value;
        self.count -= 1;
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Mean of the samples in the window; NaN while the window is empty.
    #[must_use]
    pub fn mean(&self) -> T {
        self.sum / self.count as f32
    }
}

/// Mean filter over a square window of side `2 * radius + 1`
///
/// Windows are clipped at the image borders and the divisor shrinks with
/// them, so edge pixels average only over samples that exist.
pub trait BoxFilter {
    #[must_use]
    fn box_filter(&self, radius: u32) -> Self;
}

impl<T: Element> BoxFilter for PixelBuffer<T> {
    fn box_filter(&self, radius: u32) -> Self {
        box_filter(self, radius)
    }
}

/// Separable O(width * height) box filter.
///
/// Runs a horizontal sliding-window pass followed by a vertical one. The
/// vertical pass filters the rows of the transposed intermediate so both
/// passes share the same contiguous row kernel.
#[must_use]
pub fn box_filter<T: Element>(image: &PixelBuffer<T>, radius: u32) -> PixelBuffer<T> {
    let (width, height) = image.dimensions();
    if image.is_empty() {
        return image.clone();
    }

    let (w, h) = (width as usize, height as usize);
    let radius = radius as usize;

    let horizontal = filter_rows(image.as_slice(), w, radius);
    let transposed = transpose(&horizontal, w, h);
    let vertical = filter_rows(&transposed, h, radius);

    PixelBuffer::from_raw_parts(width, height, transpose(&vertical, h, w))
}

fn filter_rows<T: Element>(src: &[T], row_len: usize, radius: usize) -> Vec<T> {
    let mut out = vec![T::default(); src.len()];

    #[cfg(feature = "rayon")]
    out.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(dst, row)| filter_line(row, dst, radius));

    #[cfg(not(feature = "rayon"))]
    out.chunks_mut(row_len)
        .zip(src.chunks(row_len))
        .for_each(|(dst, row)| filter_line(row, dst, radius));

    out
}

/// One-dimensional clipped mean of `src` into `dst`.
///
/// At step `i` the leading edge `i` enters the window while it is still
/// inside the line, the sample `i - window` leaves once the window has
/// filled, and the mean is written to the centre `i - radius`.
fn filter_line<T: Element>(src: &[T], dst: &mut [T], radius: usize) {
    let len = src.len();
    // A window wider than the line behaves exactly like one spanning it.
    let radius = radius.min(len);
    let window = 2 * radius + 1;
    let mut acc = WindowAccumulator::new();

    for i in 0..len + radius {
        if i < len {
            acc.push(src[i]);
        }
        if i >= window {
            acc.pop(src[i - window]);
        }
        if i >= radius {
            dst[i - radius] = acc.mean();
        }
    }
}

fn transpose<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(data.len());
    for x in 0..width {
        for y in 0..height {
            out.push(data[y * width + x]);
        }
    }
    out
}
