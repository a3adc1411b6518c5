use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::DehazeParams;
use crate::error::Result;
use crate::imageops::depth::estimate_depth;
use crate::imageops::guided_filter::GuidedFilter;
use crate::imageops::haze_removal::remove_haze;
use crate::io::{load_rgb_image, save_gray_image, save_rgb_image};
use crate::pixels::{ImageGray, ImageRgb};

/// Every image a dehazing run produces
#[derive(Debug, Clone, PartialEq)]
pub struct DehazeResult {
    /// Normalised depth before edge-aware smoothing
    pub unfiltered_depth: ImageGray,
    /// Depth after guided filtering against the hazy input
    pub depth: ImageGray,
    pub dehazed: ImageRgb,
}

/// Runs depth estimation, guided filtering and haze removal on one image.
///
/// # Errors
///
/// * `Error::InvalidParameter` - `params` fail validation
/// * `Error::DegenerateInput` - the depth map is flat or a covariance is singular
pub fn dehaze(image: &ImageRgb, params: &DehazeParams) -> Result<DehazeResult> {
    params.validate()?;

    let unfiltered_depth = estimate_depth(image, params.radius)?;
    debug!("estimated depth map");

    let depth = unfiltered_depth.guided_filter(image, params.radius, params.epsilon)?;
    debug!(
        "filtered depth map, radius {} epsilon {}",
        params.radius, params.epsilon
    );

    let dehazed = remove_haze(image, &depth, params.beta)?;
    debug!("removed haze, beta {}", params.beta);

    Ok(DehazeResult {
        unfiltered_depth,
        depth,
        dehazed,
    })
}

/// Files written next to an input image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub unfiltered_depth: PathBuf,
    pub depth: PathBuf,
    pub dehazed: PathBuf,
}

impl OutputPaths {
    /// `photo.png` gives `photo_unfiltered_depth.jpg`, `photo_depth.jpg` and
    /// `photo_dehazed.jpg` in the same directory.
    #[must_use]
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref();
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        let sibling = |suffix: &str| {
            let mut name = stem.to_os_string();
            name.push(suffix);
            input.with_file_name(name)
        };

        Self {
            unfiltered_depth: sibling("_unfiltered_depth.jpg"),
            depth: sibling("_depth.jpg"),
            dehazed: sibling("_dehazed.jpg"),
        }
    }
}

/// Loads `input`, dehazes it and writes the results beside it.
///
/// All processing finishes before the first file is written, so a failing
/// stage leaves no output behind.
///
/// # Errors
///
/// * `Error::Load` - the input cannot be read
/// * `Error::Save` - an output cannot be written
/// * any error of [`dehaze`]
pub fn run(input: impl AsRef<Path>, params: &DehazeParams) -> Result<OutputPaths> {
    let input = input.as_ref();
    params.validate()?;

    let image = load_rgb_image(input)?;
    let result = dehaze(&image, params)?;
    let paths = OutputPaths::for_input(input);

    if params.save_intermediates {
        save_gray_image(&result.unfiltered_depth, &paths.unfiltered_depth)?;
        save_gray_image(&result.depth, &paths.depth)?;
    }
    save_rgb_image(&result.dehazed, &paths.dehazed)?;

    info!("dehazed {} -> {}", input.display(), paths.dehazed.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pixels::{Color, Coord};
    use crate::test_utils::create_hazy_test_image;

    #[test]
    fn output_paths_follow_input_stem() {
        let paths = OutputPaths::for_input("dir/scene.v2.png");
        assert_eq!(paths.unfiltered_depth, Path::new("dir/scene.v2_unfiltered_depth.jpg"));
        assert_eq!(paths.depth, Path::new("dir/scene.v2_depth.jpg"));
        assert_eq!(paths.dehazed, Path::new("dir/scene.v2_dehazed.jpg"));

        let bare = OutputPaths::for_input("scene");
        assert_eq!(bare.dehazed, Path::new("scene_dehazed.jpg"));
    }

    #[test]
    fn dehaze_produces_all_stages() {
        let image = create_hazy_test_image(16, 8);
        let params = DehazeParams::default().with_radius(2).with_epsilon(1e-3);

        let result = dehaze(&image, &params).unwrap();
        assert_eq!(result.unfiltered_depth.dimensions(), (16, 8));
        assert_eq!(result.depth.dimensions(), (16, 8));
        assert_eq!(result.dehazed.dimensions(), (16, 8));

        // The grey half is estimated to be farther away.
        let far = *result.depth.get(Coord::new(0, 4));
        let near = *result.depth.get(Coord::new(15, 4));
        assert!(far > near);
        assert!(result
            .dehazed
            .as_slice()
            .iter()
            .all(|c| c.values.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn dehaze_of_uniform_image_is_degenerate() {
        let image = ImageRgb::filled(3, 3, Color::splat(0.5));
        let params = DehazeParams::default().with_radius(1);
        assert!(matches!(
            dehaze(&image, &params),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn dehaze_validates_params_first() {
        let image = create_hazy_test_image(4, 4);
        let params = DehazeParams::default().with_beta(-1.0);
        assert!(matches!(
            dehaze(&image, &params),
            Err(Error::InvalidParameter(_))
        ));
    }
}
