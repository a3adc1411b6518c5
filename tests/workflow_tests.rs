//! Integration tests for haze-removal workflows
//!
//! These tests chain the stages the way the `dehaze` binary does, including
//! reading and writing real files.

use std::fs;
use std::path::PathBuf;

use haze_removal::{
    dehaze, estimate_atmospheric_light, estimate_depth, load_gray_image, load_rgb_image, run,
    save_rgb_image, Color, Coord, DehazeParams, Error, GuidedFilter, GuidedFilterValues,
    ImageGray, ImageRgb, OutputPaths, RemoveHaze,
};
use image::{Rgb, RgbImage};
use itertools::iproduct;

/// Test helper: a synthetic hazy scene
///
/// The top rows fade into a bright, desaturated sky; the bottom rows hold a
/// saturated, darker foreground with a vertical edge.
fn create_hazy_scene(width: u32, height: u32) -> ImageRgb {
    ImageRgb::from_fn(width, height, |x, y| {
        let haze = 1.0 - y as f32 / height as f32;
        let scene = if x < width / 2 {
            Color::new(0.55, 0.25, 0.1)
        } else {
            Color::new(0.1, 0.35, 0.2)
        };
        let airlight = Color::new(0.85, 0.87, 0.9);
        scene * (1.0 - haze) + airlight * haze
    })
}

/// Test helper: a fresh scratch directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("haze-removal-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn depth_then_guided_filter_then_haze_removal_workflow_works() {
    init_logger();
    let image = create_hazy_scene(24, 24);

    // Step 1: depth from the colour attenuation prior
    let depth = estimate_depth(&image, 3).unwrap();
    assert!(*depth.get(Coord::new(2, 1)) > *depth.get(Coord::new(2, 22)));

    // Step 2: edge-aware refinement guided by the hazy image
    let refined = depth.guided_filter(&image, 3, 1e-4).unwrap();
    assert_eq!(refined.dimensions(), depth.dimensions());

    // Step 3: radiance recovery
    let dehazed = image.remove_haze(&refined, 1.0).unwrap();

    // Haze removal increases contrast between the two foreground halves.
    let before = *image.get(Coord::new(2, 12)) - *image.get(Coord::new(21, 12));
    let after = *dehazed.get(Coord::new(2, 12)) - *dehazed.get(Coord::new(21, 12));
    assert!(after.r().abs() > before.r().abs());
}

#[test]
fn dehaze_matches_manual_pipeline() {
    let image = create_hazy_scene(16, 12);
    let params = DehazeParams::default().with_radius(2).with_epsilon(1e-3);

    let result = dehaze(&image, &params).unwrap();

    let depth = estimate_depth(&image, 2).unwrap();
    let refined = GuidedFilterValues::new(&image, 2, 1e-3)
        .unwrap()
        .filter_channel(&depth)
        .unwrap();
    let dehazed = image.remove_haze(&refined, 1.0).unwrap();

    assert_eq!(result.unfiltered_depth, depth);
    assert_eq!(result.depth, refined);
    assert_eq!(result.dehazed, dehazed);
}

#[test]
fn guided_filter_values_are_reusable_across_channels() {
    let image = create_hazy_scene(12, 12);
    let values = GuidedFilterValues::new(&image, 2, 1e-3).unwrap();

    let filtered = values.filter_rgb(&image).unwrap();
    let [r, _, _] = haze_removal::split_channels(&image);
    let red = values.filter_channel(&r).unwrap();

    for (x, y) in iproduct!(0..12, 0..12) {
        let coord = Coord::new(x, y);
        assert_eq!(filtered.get(coord).r(), *red.get(coord));
    }
}

#[test]
fn atmospheric_light_comes_from_the_sky() {
    let image = create_hazy_scene(40, 40);
    let depth = estimate_depth(&image, 3).unwrap();
    let light = estimate_atmospheric_light(&image, &depth).unwrap();

    // The deepest pixels sit in the top row, which is almost pure airlight.
    assert!(light.luminance() > 0.8);
}

#[test]
fn run_writes_all_outputs() {
    init_logger();
    let dir = scratch_dir("run");
    let input = dir.join("scene.png");
    save_rgb_image(&create_hazy_scene(20, 16), &input).unwrap();

    let params = DehazeParams::default().with_radius(2);
    let paths = run(&input, &params).unwrap();

    assert_eq!(paths, OutputPaths::for_input(&input));
    assert_eq!(paths.dehazed, dir.join("scene_dehazed.jpg"));
    assert!(paths.unfiltered_depth.exists());
    assert!(paths.depth.exists());

    let dehazed = load_rgb_image(&paths.dehazed).unwrap();
    assert_eq!(dehazed.dimensions(), (20, 16));
    let depth = load_gray_image(&paths.depth).unwrap();
    assert_eq!(depth.dimensions(), (20, 16));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_without_intermediates_writes_only_result() {
    let dir = scratch_dir("no-intermediates");
    let input = dir.join("scene.png");
    save_rgb_image(&create_hazy_scene(20, 16), &input).unwrap();

    let params = DehazeParams::default()
        .with_radius(2)
        .with_save_intermediates(false);
    let paths = run(&input, &params).unwrap();

    assert!(paths.dehazed.exists());
    assert!(!paths.unfiltered_depth.exists());
    assert!(!paths.depth.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_run_writes_nothing() {
    let dir = scratch_dir("flat");
    let input = dir.join("flat.png");
    RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]))
        .save(&input)
        .unwrap();

    let result = run(&input, &DehazeParams::default().with_radius(1));
    assert!(matches!(result, Err(Error::DegenerateInput(_))));

    let paths = OutputPaths::for_input(&input);
    assert!(!paths.unfiltered_depth.exists());
    assert!(!paths.depth.exists());
    assert!(!paths.dehazed.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn run_reports_missing_input() {
    let dir = scratch_dir("missing");
    let result = run(dir.join("absent.png"), &DehazeParams::default());
    assert!(matches!(result, Err(Error::Load { .. })));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn saved_images_are_clamped_to_unit_range() {
    let dir = scratch_dir("clamp");
    let path = dir.join("wide.png");
    let image = ImageRgb::from_fn(2, 1, |x, _| {
        if x == 0 {
            Color::new(-1.0, 0.5, 2.0)
        } else {
            Color::splat(1.0)
        }
    });
    save_rgb_image(&image, &path).unwrap();

    let loaded = load_rgb_image(&path).unwrap();
    let pixel = *loaded.get(Coord::new(0, 0));
    assert_eq!(pixel.r(), 0.0);
    assert!((pixel.g() - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(pixel.b(), 1.0);

    let gray: ImageGray = load_gray_image(&path).unwrap();
    assert_eq!(*gray.get(Coord::new(1, 0)), 1.0);

    let _ = fs::remove_dir_all(&dir);
}
