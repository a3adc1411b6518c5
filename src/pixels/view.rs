use std::iter::FusedIterator;

use crate::pixels::Coord;

/// Rectangular window over the coordinate space of a buffer
///
/// A view never owns pixel data. It remembers the size of the buffer it
/// was taken from and is always clamped to it, so every coordinate it
/// yields is a valid in-bounds index for that buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageView {
    offset: Coord,
    width: i32,
    height: i32,
    bounds: (i32, i32),
}

impl ImageView {
    /// Creates a view of `width` x `height` at `offset`, clamped to a parent
    /// of size `bounds`.
    ///
    /// A rectangle entirely outside the parent yields an empty view.
    #[must_use]
    pub fn new(bounds: (i32, i32), offset: Coord, width: i32, height: i32) -> Self {
        let (x0, x1) = clamp_span(offset.x, width, bounds.0);
        let (y0, y1) = clamp_span(offset.y, height, bounds.1);

        Self {
            offset: Coord::new(x0, y0),
            width: x1 - x0,
            height: y1 - y0,
            bounds,
        }
    }

    /// Sub-rectangle at `offset` relative to this view's origin.
    #[must_use]
    pub fn sub_view(&self, offset: Coord, width: i32, height: i32) -> Self {
        Self::new(self.bounds, self.offset + offset, width, height)
    }

    /// Sub-rectangle of the given size centred on `centre`, which is given
    /// relative to this view's origin.
    ///
    /// Used for kernel windows; near the parent's borders the window shrinks
    /// rather than shifts.
    #[must_use]
    pub fn centred_sub_view(&self, centre: Coord, width: i32, height: i32) -> Self {
        self.sub_view(centre - Coord::new(width / 2, height / 2), width, height)
    }

    #[must_use]
    pub const fn offset(&self) -> Coord {
        self.offset
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of coordinates the view yields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major sequence of absolute coordinates covered by the view.
    ///
    /// Can be called any number of times; each call starts from the
    /// top-left corner.
    #[must_use]
    pub const fn coords(&self) -> Coords {
        Coords {
            view: *self,
            index: 0,
        }
    }
}

impl IntoIterator for &ImageView {
    type Item = Coord;
    type IntoIter = Coords;

    fn into_iter(self) -> Coords {
        self.coords()
    }
}

impl IntoIterator for ImageView {
    type Item = Coord;
    type IntoIter = Coords;

    fn into_iter(self) -> Coords {
        self.coords()
    }
}

/// Iterator over the coordinates of an [`ImageView`]
#[derive(Debug, Clone)]
pub struct Coords {
    view: ImageView,
    index: usize,
}

impl Iterator for Coords {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.index >= self.view.len() {
            return None;
        }

        let width = self.view.width as usize;
        let local = Coord::new((self.index % width) as i32, (self.index / width) as i32);
        self.index += 1;
        Some(self.view.offset + local)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Coords {}

impl FusedIterator for Coords {}

/// Intersects `[start, start + len)` with `[0, limit)`.
fn clamp_span(start: i32, len: i32, limit: i32) -> (i32, i32) {
    let lo = start.clamp(0, limit.max(0));
    let hi = start.saturating_add(len.max(0)).clamp(lo, limit.max(lo));
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_yields_row_major_coords() {
        let view = ImageView::new((3, 2), Coord::default(), 3, 2);
        let coords: Vec<_> = view.coords().collect();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(0, 1),
                Coord::new(1, 1),
                Coord::new(2, 1),
            ]
        );
    }

    #[test]
    fn view_is_restartable() {
        let view = ImageView::new((4, 4), Coord::new(1, 1), 2, 2);
        assert_eq!(view.coords().count(), 4);
        assert_eq!(view.coords().count(), 4);
        assert_eq!((&view).into_iter().len(), 4);
    }

    #[test]
    fn partially_overlapping_view_is_clamped() {
        let view = ImageView::new((4, 4), Coord::new(-1, 2), 3, 5);
        assert_eq!(view.offset(), Coord::new(0, 2));
        assert_eq!(view.width(), 2);
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn view_outside_parent_is_empty() {
        let right = ImageView::new((4, 4), Coord::new(10, 0), 3, 3);
        assert!(right.is_empty());
        assert_eq!(right.coords().count(), 0);

        let above = ImageView::new((4, 4), Coord::new(0, -10), 3, 3);
        assert!(above.is_empty());
        assert_eq!(above.coords().next(), None);
    }

    #[test]
    fn centred_sub_view_shrinks_at_corner() {
        let view = ImageView::new((5, 5), Coord::default(), 5, 5);

        let corner = view.centred_sub_view(Coord::new(0, 0), 3, 3);
        assert_eq!(corner.offset(), Coord::new(0, 0));
        assert_eq!((corner.width(), corner.height()), (2, 2));

        let centre = view.centred_sub_view(Coord::new(2, 2), 3, 3);
        assert_eq!(centre.offset(), Coord::new(1, 1));
        assert_eq!((centre.width(), centre.height()), (3, 3));

        let far = view.centred_sub_view(Coord::new(4, 4), 3, 3);
        assert_eq!(far.offset(), Coord::new(3, 3));
        assert_eq!((far.width(), far.height()), (2, 2));
    }

    #[test]
    fn sub_view_is_relative_to_parent_view() {
        let view = ImageView::new((10, 10), Coord::new(2, 3), 4, 4);
        let sub = view.sub_view(Coord::new(1, 1), 2, 2);
        assert_eq!(sub.offset(), Coord::new(3, 4));
        assert_eq!(sub.coords().next(), Some(Coord::new(3, 4)));
    }

    #[test]
    fn clamp_span_handles_negative_lengths() {
        assert_eq!(clamp_span(2, -5, 10), (2, 2));
        assert_eq!(clamp_span(-3, 2, 10), (0, 0));
        assert_eq!(clamp_span(8, 5, 10), (8, 10));
    }
}
