use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use roadaug_image::{Image, ImageDtype};
use roadaug_imgproc::{filter, noise, parallel};

use crate::{config::NoiseBlurConfig, error::AugmentError};

/// A tone or channel transform from the optional tone family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneTransform {
    /// Replace every value `v` by `255 - v`.
    Invert,
    /// Randomly permute the three channels.
    ChannelShuffle,
    /// Apply `255 * (v / 255)^gamma` with `gamma` drawn in percent from the limit.
    RandomGamma {
        /// Inclusive gamma range in percent.
        gamma_limit: (u32, u32),
    },
    /// Scale and offset the values by random amounts.
    RandomBrightnessContrast {
        /// Largest brightness offset, as a fraction of 255.
        brightness_limit: f32,
        /// Largest deviation of the contrast factor from 1.
        contrast_limit: f32,
    },
    /// Shift each channel by its own random integer amount.
    RgbShift {
        /// Largest absolute shift per channel.
        shift_limit: i32,
    },
}

impl ToneTransform {
    /// Check that the limits describe non-empty ranges.
    pub fn validate(&self) -> Result<(), AugmentError> {
        let ok = match self {
            ToneTransform::Invert | ToneTransform::ChannelShuffle => true,
            ToneTransform::RandomGamma { gamma_limit } => {
                gamma_limit.0 > 0 && gamma_limit.0 <= gamma_limit.1
            }
            ToneTransform::RandomBrightnessContrast {
                brightness_limit,
                contrast_limit,
            } => {
                brightness_limit.is_finite()
                    && contrast_limit.is_finite()
                    && *brightness_limit >= 0.0
                    && *contrast_limit >= 0.0
            }
            ToneTransform::RgbShift { shift_limit } => *shift_limit >= 0,
        };
        if !ok {
            return Err(AugmentError::InvalidConfig(format!(
                "invalid tone transform {self:?}"
            )));
        }
        Ok(())
    }

    /// Apply the transform, drawing its parameters from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidConfig`] if the limits are invalid.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        self.validate()?;

        let out = match self {
            ToneTransform::Invert => image.map(|v| 255 - v),
            ToneTransform::ChannelShuffle => {
                let mut order = [0usize, 1, 2];
                order.shuffle(rng);
                log::debug!("channel shuffle {order:?}");
                let mut out = Image::from_size_val(image.size(), 0)?;
                parallel::par_iter_rows(image, &mut out, |src, dst| {
                    for (d, &o) in dst.iter_mut().zip(order.iter()) {
                        *d = src[o];
                    }
                });
                out
            }
            ToneTransform::RandomGamma { gamma_limit } => {
                let gamma = rng.random_range(gamma_limit.0..=gamma_limit.1) as f32 / 100.0;
                log::debug!("gamma {gamma}");
                image.map(|v| u8::from_f32(255.0 * (v as f32 / 255.0).powf(gamma)))
            }
            ToneTransform::RandomBrightnessContrast {
                brightness_limit,
                contrast_limit,
            } => {
                let alpha = 1.0 + rng.random_range(-contrast_limit..=*contrast_limit);
                let beta = rng.random_range(-brightness_limit..=*brightness_limit);
                log::debug!("brightness/contrast alpha {alpha} beta {beta}");
                image.map(|v| u8::from_f32(v as f32 * alpha + beta * 255.0))
            }
            ToneTransform::RgbShift { shift_limit } => {
                let shift: [i32; 3] =
                    std::array::from_fn(|_| rng.random_range(-shift_limit..=*shift_limit));
                log::debug!("rgb shift {shift:?}");
                let mut out = Image::from_size_val(image.size(), 0)?;
                parallel::par_iter_rows(image, &mut out, |src, dst| {
                    for ((d, &s), &k) in dst.iter_mut().zip(src).zip(shift.iter()) {
                        *d = (s as i32 + k).clamp(0, 255) as u8;
                    }
                });
                out
            }
        };
        Ok(out)
    }
}

/// The noise transforms the stage chooses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Gaussian noise with one sample per pixel shared by all channels.
    AdditiveGaussian,
    /// Gaussian noise with one sample per channel, parameterized by variance.
    GaussianVariance,
    /// Camera sensor noise on hue and lightness.
    IsoSensor,
}

const NOISE_KINDS: [NoiseKind; 3] = [
    NoiseKind::AdditiveGaussian,
    NoiseKind::GaussianVariance,
    NoiseKind::IsoSensor,
];

/// The blur transforms the stage chooses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurKind {
    /// Box filter.
    Box,
    /// Random line kernel.
    Motion,
    /// Per-channel median.
    Median,
}

const BLUR_KINDS: [BlurKind; 3] = [BlurKind::Box, BlurKind::Motion, BlurKind::Median];

/// What the noise and blur stage applied on one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    /// The tone transform, if one was applied.
    pub tone: Option<ToneTransform>,
    /// The noise transform, if one was applied.
    pub noise: Option<NoiseKind>,
    /// The blur transform and its kernel size, if one was applied.
    pub blur: Option<(BlurKind, usize)>,
}

/// Applies at most one tone, one noise and one blur transform, in that order.
///
/// Each family is gated by its own probability and, when selected, one member
/// is picked uniformly. An empty tone list skips the tone gate without drawing.
#[derive(Debug, Clone, Default)]
pub struct NoiseBlurStage {
    config: NoiseBlurConfig,
}

impl NoiseBlurStage {
    /// Create a stage from a validated configuration.
    pub fn new(config: NoiseBlurConfig) -> Result<Self, AugmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The stage configuration.
    pub fn config(&self) -> &NoiseBlurConfig {
        &self.config
    }

    /// Run the stage on a discrete image.
    ///
    /// # Returns
    ///
    /// The transformed image and a report of the transforms that were applied.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        rng: &mut R,
    ) -> Result<(Image<u8, 3>, StageReport), AugmentError> {
        let mut report = StageReport::default();
        let mut img = image.clone();

        let tones = &self.config.tone_transforms;
        if !tones.is_empty() && rng.random_bool(self.config.tone_prob) {
            let tone = &tones[rng.random_range(0..tones.len())];
            log::debug!("tone transform {tone:?}");
            img = tone.apply(&img, rng)?;
            report.tone = Some(tone.clone());
        }

        if rng.random_bool(self.config.noise_prob) {
            let kind = NOISE_KINDS[rng.random_range(0..NOISE_KINDS.len())];
            img = self.apply_noise(&img, kind, rng)?;
            report.noise = Some(kind);
        }

        if rng.random_bool(self.config.blur_prob) {
            let kind = BLUR_KINDS[rng.random_range(0..BLUR_KINDS.len())];
            let kernel_size = 3 + 2 * rng.random_range(0..=(self.config.blur_limit - 3) / 2);
            img = self.apply_blur(&img, kind, kernel_size, rng)?;
            report.blur = Some((kind, kernel_size));
        }

        Ok((img, report))
    }

    fn apply_noise<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        kind: NoiseKind,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let mut dst = Image::from_size_val(image.size(), 0)?;
        match kind {
            NoiseKind::AdditiveGaussian => {
                let (lo, hi) = self.config.gaussian_sigma;
                let sigma = rng.random_range(lo..=hi);
                log::debug!("additive gaussian noise sigma {sigma:.3}");
                noise::additive_gaussian_noise(image, &mut dst, sigma, false, rng)?;
            }
            NoiseKind::GaussianVariance => {
                let (lo, hi) = self.config.gaussian_var;
                let var = rng.random_range(lo..=hi);
                log::debug!("gaussian noise var {var:.3}");
                noise::additive_gaussian_noise(image, &mut dst, var.sqrt(), true, rng)?;
            }
            NoiseKind::IsoSensor => {
                let (lo, hi) = self.config.iso_color_shift;
                let color_shift = rng.random_range(lo..=hi);
                let (lo, hi) = self.config.iso_intensity;
                let intensity = rng.random_range(lo..=hi);
                log::debug!("iso noise color shift {color_shift:.3} intensity {intensity:.3}");
                noise::iso_noise(image, &mut dst, color_shift, intensity, rng)?;
            }
        }
        Ok(dst)
    }

    fn apply_blur<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        kind: BlurKind,
        kernel_size: usize,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        log::debug!("{kind:?} blur kernel size {kernel_size}");
        let mut dst = Image::from_size_val(image.size(), 0)?;
        match kind {
            BlurKind::Box => filter::box_blur(image, &mut dst, (kernel_size, kernel_size))?,
            BlurKind::Motion => {
                let kernel = filter::kernels::motion_blur_kernel(kernel_size, rng)?;
                filter::motion_blur(image, &mut dst, &kernel, kernel_size)?;
            }
            BlurKind::Median => filter::median_blur(image, &mut dst, kernel_size)?,
        }
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use roadaug_image::Image;

    use super::{NoiseBlurStage, ToneTransform};
    use crate::{config::NoiseBlurConfig, error::AugmentError};

    fn gradient() -> Result<Image<u8, 3>, AugmentError> {
        let data = (0..32 * 24 * 3).map(|i| (i % 256) as u8).collect();
        Ok(Image::new([32, 24].into(), data)?)
    }

    #[test]
    fn disabled_stage_is_identity() -> Result<(), AugmentError> {
        let stage = NoiseBlurStage::new(NoiseBlurConfig {
            noise_prob: 0.0,
            blur_prob: 0.0,
            ..Default::default()
        })?;
        let image = gradient()?;
        let mut rng = StdRng::seed_from_u64(0);

        let (out, report) = stage.apply(&image, &mut rng)?;
        assert_eq!(out, image);
        assert_eq!(report, Default::default());

        Ok(())
    }

    #[test]
    fn forced_stage_applies_both() -> Result<(), AugmentError> {
        let stage = NoiseBlurStage::new(NoiseBlurConfig {
            noise_prob: 1.0,
            blur_prob: 1.0,
            ..Default::default()
        })?;
        let image = gradient()?;
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let (out, report) = stage.apply(&image, &mut rng)?;
            assert_eq!(out.size(), image.size());
            assert!(report.noise.is_some());
            let (_, kernel_size) = report.blur.expect("blur is always applied");
            assert!([3, 5, 7].contains(&kernel_size));
            assert!(report.tone.is_none());
        }

        Ok(())
    }

    #[test]
    fn tone_family_is_used_when_configured() -> Result<(), AugmentError> {
        let stage = NoiseBlurStage::new(NoiseBlurConfig {
            tone_prob: 1.0,
            tone_transforms: vec![ToneTransform::Invert],
            noise_prob: 0.0,
            blur_prob: 0.0,
            ..Default::default()
        })?;
        let image = gradient()?;
        let mut rng = StdRng::seed_from_u64(2);

        let (out, report) = stage.apply(&image, &mut rng)?;
        assert_eq!(report.tone, Some(ToneTransform::Invert));
        assert_eq!(out, image.map(|v| 255 - v));

        Ok(())
    }

    #[test]
    fn tone_transforms_keep_shape() -> Result<(), AugmentError> {
        let image = gradient()?;
        let mut rng = StdRng::seed_from_u64(3);
        let tones = [
            ToneTransform::ChannelShuffle,
            ToneTransform::RandomGamma {
                gamma_limit: (80, 120),
            },
            ToneTransform::RandomBrightnessContrast {
                brightness_limit: 0.2,
                contrast_limit: 0.2,
            },
            ToneTransform::RgbShift { shift_limit: 20 },
        ];
        for tone in tones {
            let out = tone.apply(&image, &mut rng)?;
            assert_eq!(out.size(), image.size());
        }

        // a neutral gamma keeps the image
        let gamma = ToneTransform::RandomGamma {
            gamma_limit: (100, 100),
        };
        assert_eq!(gamma.apply(&image, &mut rng)?, image);

        Ok(())
    }

    #[test]
    fn channel_shuffle_permutes_pixels() -> Result<(), AugmentError> {
        let image = Image::<u8, 3>::new([1, 1].into(), vec![1, 2, 3])?;
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..10 {
            let out = ToneTransform::ChannelShuffle.apply(&image, &mut rng)?;
            let mut values = out.as_slice().to_vec();
            values.sort_unstable();
            assert_eq!(values, vec![1, 2, 3]);
        }
        Ok(())
    }

    #[test]
    fn invalid_tone_is_rejected() {
        let config = NoiseBlurConfig {
            tone_transforms: vec![ToneTransform::RandomGamma {
                gamma_limit: (120, 80),
            }],
            ..Default::default()
        };
        assert!(matches!(
            NoiseBlurStage::new(config),
            Err(AugmentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn invalid_tone_apply_errors() -> Result<(), AugmentError> {
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 120)?;
        let mut rng = StdRng::seed_from_u64(11);

        let tones = [
            ToneTransform::RgbShift { shift_limit: -5 },
            ToneTransform::RandomGamma {
                gamma_limit: (120, 80),
            },
            ToneTransform::RandomBrightnessContrast {
                brightness_limit: f32::NAN,
                contrast_limit: 0.2,
            },
        ];
        for tone in tones {
            assert!(matches!(
                tone.apply(&image, &mut rng),
                Err(AugmentError::InvalidConfig(_))
            ));
        }

        Ok(())
    }
}
