use rand::Rng;

use roadaug_image::Image;

use crate::{
    config::AugmentConfig,
    error::AugmentError,
    format::PixelFormat,
    noise_blur::NoiseBlurStage,
    perspective::PerspectiveSampler,
    photometric::PhotometricJitter,
    shadow::{ShadowAsset, ShadowCompositor},
};

/// The full augmentation pipeline.
///
/// Stages run in a fixed order: noise and blur, photometric jitter, shadow
/// (when assets are given) and perspective (when `warp` is set). Inputs in any
/// [`PixelFormat`] are converted to discrete pixels on entry and back on exit.
#[derive(Debug, Clone, Default)]
pub struct Augmenter {
    noise_blur: NoiseBlurStage,
    photometric: PhotometricJitter,
    shadow: ShadowCompositor,
    perspective: PerspectiveSampler,
}

impl Augmenter {
    /// Create a pipeline, validating the configuration.
    pub fn new(config: AugmentConfig) -> Result<Self, AugmentError> {
        Ok(Self {
            noise_blur: NoiseBlurStage::new(config.noise_blur)?,
            photometric: PhotometricJitter::new(config.photometric)?,
            shadow: ShadowCompositor::new(config.shadow)?,
            perspective: PerspectiveSampler::new(config.perspective)?,
        })
    }

    /// Augment an image in any supported pixel format.
    ///
    /// # Arguments
    ///
    /// * `image` - The RGB input image.
    /// * `shadows` - Shadow assets to composite from, if any. An empty set skips the stage.
    /// * `warp` - Apply the random perspective tilt.
    /// * `rng` - The random number generator driving every stage.
    ///
    /// # Returns
    ///
    /// An image of the same size and format as `image`.
    pub fn augment<F, R>(
        &self,
        image: &Image<F, 3>,
        shadows: Option<&[ShadowAsset]>,
        warp: bool,
        rng: &mut R,
    ) -> Result<Image<F, 3>, AugmentError>
    where
        F: PixelFormat,
        R: Rng + ?Sized,
    {
        let discrete = F::to_discrete(image)?;
        let out = self.augment_discrete(&discrete, shadows, warp, rng)?;
        Ok(F::from_discrete(out)?)
    }

    /// Augment a discrete image.
    pub fn augment_discrete<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        shadows: Option<&[ShadowAsset]>,
        warp: bool,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let (mut img, report) = self.noise_blur.apply(image, rng)?;
        log::debug!("noise/blur stage {report:?}");

        img = self.photometric.apply(&img, rng)?;

        match shadows {
            Some(shadows) if !shadows.is_empty() => {
                img = self.shadow.composite(&img, shadows, rng)?;
            }
            Some(_) => log::debug!("empty shadow set, shadow stage skipped"),
            None => {}
        }

        if warp {
            img = self.perspective.apply(&img, rng)?;
        }

        Ok(img)
    }

    /// Augment a normalized image with values in [0, 1].
    pub fn augment_normalized<R: Rng + ?Sized>(
        &self,
        image: &Image<f32, 3>,
        shadows: Option<&[ShadowAsset]>,
        warp: bool,
        rng: &mut R,
    ) -> Result<Image<f32, 3>, AugmentError> {
        self.augment(image, shadows, warp, rng)
    }
}

/// Augment an image with the default configuration.
///
/// See [`Augmenter::augment`].
pub fn augment<F, R>(
    image: &Image<F, 3>,
    shadows: Option<&[ShadowAsset]>,
    warp: bool,
    rng: &mut R,
) -> Result<Image<F, 3>, AugmentError>
where
    F: PixelFormat,
    R: Rng + ?Sized,
{
    Augmenter::default().augment(image, shadows, warp, rng)
}
