mod config;
mod error;
mod imageops;
mod io;
mod pipeline;
mod pixels;
mod test_utils;
mod utils;

pub use config::DehazeParams;
pub use error::{Error, Result, SingularMatrixError};
pub use imageops::box_filter::{box_filter, BoxFilter, WindowAccumulator};
pub use imageops::depth::{
    estimate_depth, estimate_raw_depth, min_filter, normalise, EstimateDepth, THETA,
};
pub use imageops::guided_filter::{
    guided_filter_gray, guided_filter_rgb, CovarianceMatrix, GuidedFilter, GuidedFilterValues,
    InverseCovariance,
};
pub use imageops::haze_removal::{
    estimate_atmospheric_light, remove_haze, transmission, RemoveHaze, MAX_TRANSMISSION,
    MIN_TRANSMISSION,
};
pub use io::{load_gray_image, load_rgb_image, save_gray_image, save_rgb_image};
pub use pipeline::{dehaze, run, DehazeResult, OutputPaths};
pub use pixels::{
    blend, join_channels, linear_to_srgb, linear_to_srgb_color, split_channels, srgb_to_linear,
    srgb_to_linear_color, Color, Coord, Coords, Element, ImageGray, ImageRgb, ImageView,
    PixelBuffer, LUMINANCE_WEIGHTS,
};
