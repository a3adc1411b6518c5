pub mod box_filter;
pub mod depth;
pub mod guided_filter;
pub mod haze_removal;
