use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use roadaug_image::Image;
use roadaug_imgproc::{composite, enhance, interpolation::InterpolationMode, resize, warp};
use roadaug_io::functional::{read_image_any, GenericImage};

use crate::{config::ShadowConfig, error::AugmentError};

/// A shadow split into its color layer and its opacity mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowAsset {
    /// The color layer.
    pub top: Image<u8, 3>,
    /// The opacity of `top`, same size.
    pub mask: Image<u8, 1>,
}

/// The shadows available to the compositor, loaded once and shared read-only.
pub type ShadowAssetSet = Vec<ShadowAsset>;

/// Options of the shadow loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowLoadOptions {
    /// Largest side of a loaded asset; larger assets are shrunk keeping their aspect ratio.
    pub max_size: usize,
    /// Log and skip files that cannot be decoded instead of failing.
    pub skip_unreadable: bool,
}

impl Default for ShadowLoadOptions {
    fn default() -> Self {
        Self {
            max_size: 256,
            skip_unreadable: false,
        }
    }
}

impl ShadowLoadOptions {
    /// Check that the options can be used by the loader.
    pub fn validate(&self) -> Result<(), AugmentError> {
        if self.max_size == 0 {
            return Err(AugmentError::InvalidConfig(
                "shadow max_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shrink an RGBA image to fit `max_size` and split it into color and alpha.
pub fn shadow_asset_from_rgba(
    image: &Image<u8, 4>,
    max_size: usize,
) -> Result<ShadowAsset, AugmentError> {
    let image = resize::thumbnail(image, max_size, InterpolationMode::Bicubic)?;
    let channels = image.split_channels()?;
    let top = Image::from_channels(&channels[..3])?;
    let mask = channels[3].clone();
    Ok(ShadowAsset { top, mask })
}

/// Load every RGBA shadow matching a glob pattern with the default options.
///
/// See [`load_shadow_assets_with`].
pub fn load_shadow_assets(pattern: &str) -> Result<ShadowAssetSet, AugmentError> {
    load_shadow_assets_with(pattern, &ShadowLoadOptions::default())
}

/// Load every RGBA shadow matching a glob pattern.
///
/// Files without an alpha channel are skipped with a warning. Paths are visited in
/// the order the glob yields them, which is alphabetical per directory.
///
/// # Errors
///
/// Fails on invalid options, on a malformed pattern, on unreadable paths, and on the
/// first file that cannot be decoded unless [`ShadowLoadOptions::skip_unreadable`] is set.
pub fn load_shadow_assets_with(
    pattern: &str,
    options: &ShadowLoadOptions,
) -> Result<ShadowAssetSet, AugmentError> {
    options.validate()?;

    let mut assets = ShadowAssetSet::new();
    let mut skipped = 0usize;

    for entry in glob::glob(pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        match load_one(&path, options) {
            Ok(Some(asset)) => assets.push(asset),
            Ok(None) => skipped += 1,
            Err(err) if options.skip_unreadable => {
                log::warn!("skipping unreadable shadow {}: {err}", path.display());
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    log::info!(
        "loaded {} shadow assets from '{pattern}' ({skipped} skipped)",
        assets.len()
    );

    Ok(assets)
}

fn load_one(path: &Path, options: &ShadowLoadOptions) -> Result<Option<ShadowAsset>, AugmentError> {
    match read_image_any(path)? {
        GenericImage::Rgba8(image) => Ok(Some(shadow_asset_from_rgba(&image, options.max_size)?)),
        other => {
            log::warn!(
                "skipping shadow {} with {} channels, expected 4",
                path.display(),
                other.num_channels()
            );
            Ok(None)
        }
    }
}

/// The random draws of one shadow composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Index of the asset in the set.
    pub index: usize,
    /// Counter-clockwise rotation in degrees.
    pub angle: f32,
    /// Factor applied to the mask opacity.
    pub opacity: f32,
    /// Position of the top-left corner of the asset in the image.
    pub offset: (i64, i64),
}

/// Composites a random shadow onto images.
#[derive(Debug, Clone, Default)]
pub struct ShadowCompositor {
    config: ShadowConfig,
}

impl ShadowCompositor {
    /// Create a compositor from a validated configuration.
    pub fn new(config: ShadowConfig) -> Result<Self, AugmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Draw the asset index, rotation, opacity and offset.
    pub fn sample_params<R: Rng + ?Sized>(
        &self,
        num_assets: usize,
        rng: &mut R,
    ) -> Result<ShadowParams, AugmentError> {
        if num_assets == 0 {
            return Err(AugmentError::EmptyShadowSet);
        }
        let index = rng.random_range(0..num_assets);
        let (lo, hi) = self.config.rotation;
        let angle = rng.random_range(lo..=hi) as f32;
        let (lo, hi) = self.config.opacity;
        let opacity = rng.random_range(lo..=hi);
        let (lo, hi) = self.config.offset;
        let offset = (rng.random_range(lo..=hi), rng.random_range(lo..=hi));
        Ok(ShadowParams {
            index,
            angle,
            opacity,
            offset,
        })
    }

    /// Composite a randomly chosen and transformed shadow onto `image`.
    pub fn composite<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        shadows: &[ShadowAsset],
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let params = self.sample_params(shadows.len(), rng)?;
        log::debug!("shadow {params:?}");
        Self::composite_with(image, &shadows[params.index], &params)
    }

    /// Composite `asset` onto `image` with fixed parameters.
    ///
    /// Both layers are rotated about their center on their own canvas, the mask is
    /// scaled by the opacity factor and the rotated top is pasted through it.
    /// `params.index` is ignored.
    pub fn composite_with(
        image: &Image<u8, 3>,
        asset: &ShadowAsset,
        params: &ShadowParams,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let mut top = Image::from_size_val(asset.top.size(), 0)?;
        warp::rotate(&asset.top, &mut top, params.angle, InterpolationMode::Nearest)?;

        let mut mask = Image::from_size_val(asset.mask.size(), 0)?;
        warp::rotate(&asset.mask, &mut mask, params.angle, InterpolationMode::Nearest)?;

        let mut faded = Image::from_size_val(mask.size(), 0)?;
        enhance::adjust_brightness(&mask, params.opacity, &mut faded)?;

        let mut out = image.clone();
        composite::paste_with_mask(&mut out, &top, &faded, params.offset)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use roadaug_image::{Image, ImageSize};

    use super::{shadow_asset_from_rgba, ShadowAsset, ShadowCompositor, ShadowParams};
    use crate::error::AugmentError;

    fn asset(size: usize, color: u8, alpha: u8) -> Result<ShadowAsset, AugmentError> {
        Ok(ShadowAsset {
            top: Image::from_size_val([size, size].into(), color)?,
            mask: Image::from_size_val([size, size].into(), alpha)?,
        })
    }

    #[test]
    fn split_rgba() -> Result<(), AugmentError> {
        let rgba = Image::<u8, 4>::new([2, 1].into(), vec![1, 2, 3, 4, 5, 6, 7, 8])?;
        let asset = shadow_asset_from_rgba(&rgba, 256)?;
        assert_eq!(asset.top.as_slice(), &[1, 2, 3, 5, 6, 7]);
        assert_eq!(asset.mask.as_slice(), &[4, 8]);
        Ok(())
    }

    #[test]
    fn large_asset_is_thumbnailed() -> Result<(), AugmentError> {
        let rgba = Image::<u8, 4>::from_size_val([512, 128].into(), 100)?;
        let asset = shadow_asset_from_rgba(&rgba, 256)?;
        assert_eq!(asset.top.size(), ImageSize::from([256, 64]));
        assert_eq!(asset.mask.size(), asset.top.size());
        Ok(())
    }

    #[test]
    fn opaque_mask_replaces_region() -> Result<(), AugmentError> {
        let image = Image::<u8, 3>::from_size_val([8, 8].into(), 50)?;
        let shadow = asset(4, 0, 255)?;
        let params = ShadowParams {
            index: 0,
            angle: 0.0,
            opacity: 1.0,
            offset: (2, 3),
        };

        let out = ShadowCompositor::composite_with(&image, &shadow, &params)?;
        for y in 0..8 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (3..7).contains(&y);
                let expected = if inside { 0 } else { 50 };
                for c in 0..3 {
                    assert_eq!(out.get_pixel(x, y, c)?, expected);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn transparent_mask_keeps_image() -> Result<(), AugmentError> {
        let data = (0..8 * 8 * 3).map(|i| (i % 256) as u8).collect();
        let image = Image::<u8, 3>::new([8, 8].into(), data)?;
        let shadow = asset(6, 0, 0)?;
        let params = ShadowParams {
            index: 0,
            angle: 20.0,
            opacity: 0.7,
            offset: (-2, 1),
        };
        assert_eq!(
            ShadowCompositor::composite_with(&image, &shadow, &params)?,
            image
        );
        Ok(())
    }

    #[test]
    fn rotation_is_applied() -> Result<(), AugmentError> {
        // the mask only covers the top row, a quarter turn moves it to the left column
        let mut shadow = asset(5, 0, 0)?;
        shadow.mask.as_slice_mut()[..5].fill(255);

        let image = Image::<u8, 3>::from_size_val([5, 5].into(), 200)?;
        let params = ShadowParams {
            index: 0,
            angle: 90.0,
            opacity: 1.0,
            offset: (0, 0),
        };
        let out = ShadowCompositor::composite_with(&image, &shadow, &params)?;

        for y in 0..5 {
            for x in 0..5 {
                let expected = if x == 0 { 0 } else { 200 };
                assert_eq!(out.get_pixel(x, y, 0)?, expected);
            }
        }
        Ok(())
    }

    #[test]
    fn sampled_params_stay_in_range() -> Result<(), AugmentError> {
        let compositor = ShadowCompositor::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let p = compositor.sample_params(3, &mut rng)?;
            assert!(p.index < 3);
            assert!((-35.0..=35.0).contains(&p.angle));
            assert_eq!(p.angle.fract(), 0.0);
            assert!((0.3..=1.0).contains(&p.opacity));
            assert!((-128..=128).contains(&p.offset.0));
            assert!((-128..=128).contains(&p.offset.1));
        }
        Ok(())
    }

    #[test]
    fn empty_set_is_an_error() -> Result<(), AugmentError> {
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 0)?;
        let mut rng = StdRng::seed_from_u64(0);
        let res = ShadowCompositor::default().composite(&image, &[], &mut rng);
        assert!(matches!(res, Err(AugmentError::EmptyShadowSet)));
        Ok(())
    }
}
