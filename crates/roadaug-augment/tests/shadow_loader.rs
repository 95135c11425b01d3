use std::path::Path;

use roadaug_augment::{
    shadow::{load_shadow_assets, load_shadow_assets_with, shadow_asset_from_rgba, ShadowLoadOptions},
    AugmentError,
};
use roadaug_image::ImageSize;

fn write_rgba(path: &Path, width: u32, height: u32, alpha: u8) -> Result<(), image::ImageError> {
    image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, alpha])).save(path)
}

fn write_rgb(path: &Path, width: u32, height: u32) -> Result<(), image::ImageError> {
    image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3])).save(path)
}

fn pattern(dir: &Path) -> String {
    dir.join("*.png").to_string_lossy().into_owned()
}

#[test]
fn loads_only_rgba_assets() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    write_rgba(&tmp_dir.path().join("a.png"), 64, 32, 180)?;
    write_rgb(&tmp_dir.path().join("b.png"), 64, 32)?;
    write_rgba(&tmp_dir.path().join("c.png"), 600, 300, 90)?;

    let assets = load_shadow_assets(&pattern(tmp_dir.path()))?;
    assert_eq!(assets.len(), 2);

    let small = &assets[0];
    assert_eq!(small.top.size(), ImageSize::from([64, 32]));
    assert_eq!(small.mask.size(), small.top.size());
    assert!(small.mask.as_slice().iter().all(|&a| a == 180));
    assert_eq!(&small.top.as_slice()[..3], &[10, 20, 30]);

    let large = &assets[1];
    assert_eq!(large.top.size(), ImageSize::from([256, 128]));
    assert_eq!(large.mask.size(), large.top.size());
    assert!(large.mask.as_slice().iter().all(|&a| a == 90));

    Ok(())
}

#[test]
fn empty_match_gives_empty_set() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let assets = load_shadow_assets(&pattern(tmp_dir.path()))?;
    assert!(assets.is_empty());
    Ok(())
}

#[test]
fn corrupt_file_fails_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    write_rgba(&tmp_dir.path().join("a.png"), 8, 8, 255)?;
    std::fs::write(tmp_dir.path().join("b.png"), b"definitely not a png")?;

    let res = load_shadow_assets(&pattern(tmp_dir.path()));
    assert!(matches!(res, Err(AugmentError::Io(_))));

    let options = ShadowLoadOptions {
        skip_unreadable: true,
        ..Default::default()
    };
    let assets = load_shadow_assets_with(&pattern(tmp_dir.path()), &options)?;
    assert_eq!(assets.len(), 1);

    Ok(())
}

#[test]
fn custom_max_size() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    write_rgba(&tmp_dir.path().join("a.png"), 100, 50, 255)?;

    let options = ShadowLoadOptions {
        max_size: 20,
        ..Default::default()
    };
    let assets = load_shadow_assets_with(&pattern(tmp_dir.path()), &options)?;
    assert_eq!(assets[0].top.size(), ImageSize::from([20, 10]));

    Ok(())
}

#[test]
fn zero_max_size_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    write_rgba(&tmp_dir.path().join("a.png"), 100, 50, 255)?;

    for skip_unreadable in [false, true] {
        let options = ShadowLoadOptions {
            max_size: 0,
            skip_unreadable,
        };
        let res = load_shadow_assets_with(&pattern(tmp_dir.path()), &options);
        assert!(matches!(res, Err(AugmentError::InvalidConfig(_))));
    }

    let image = roadaug_image::Image::<u8, 4>::from_size_val([100, 50].into(), 255)?;
    let res = shadow_asset_from_rgba(&image, 0);
    assert!(matches!(res, Err(AugmentError::Image(_))));

    Ok(())
}

#[test]
fn malformed_pattern_is_rejected() {
    assert!(matches!(
        load_shadow_assets("shadows/[.png"),
        Err(AugmentError::Pattern(_))
    ));
}
