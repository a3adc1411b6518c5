//! Pixel storage: coordinates, colours, dense buffers and views over them.

mod buffer;
mod color;
mod coord;
mod view;

pub use buffer::{join_channels, split_channels, Element, ImageGray, ImageRgb, PixelBuffer};
pub use color::{
    blend, linear_to_srgb, linear_to_srgb_color, srgb_to_linear, srgb_to_linear_color, Color,
    LUMINANCE_WEIGHTS,
};
pub use coord::Coord;
pub use view::{Coords, ImageView};
