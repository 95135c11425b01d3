use rand::Rng;

use roadaug_image::Image;
use roadaug_imgproc::enhance;

use crate::{config::PhotometricConfig, error::AugmentError};

/// The four enhancement factors of one jitter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotometricFactors {
    /// Brightness factor.
    pub brightness: f32,
    /// Contrast factor.
    pub contrast: f32,
    /// Sharpness factor.
    pub sharpness: f32,
    /// Color saturation factor.
    pub color: f32,
}

impl PhotometricFactors {
    /// Factors that leave the image unchanged.
    pub const NEUTRAL: Self = Self {
        brightness: 1.0,
        contrast: 1.0,
        sharpness: 1.0,
        color: 1.0,
    };
}

/// Random brightness, contrast, sharpness and color enhancement, applied in that order.
#[derive(Debug, Clone, Default)]
pub struct PhotometricJitter {
    config: PhotometricConfig,
}

impl PhotometricJitter {
    /// Create a jitter from a validated configuration.
    pub fn new(config: PhotometricConfig) -> Result<Self, AugmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Draw the four factors, one uniform sample per range.
    pub fn sample_factors<R: Rng + ?Sized>(&self, rng: &mut R) -> PhotometricFactors {
        let mut draw = |(lo, hi): (f32, f32)| rng.random_range(lo..=hi);
        PhotometricFactors {
            brightness: draw(self.config.brightness),
            contrast: draw(self.config.contrast),
            sharpness: draw(self.config.sharpness),
            color: draw(self.config.color),
        }
    }

    /// Apply fixed factors to a discrete image.
    pub fn apply_factors(
        image: &Image<u8, 3>,
        factors: &PhotometricFactors,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let mut a = Image::from_size_val(image.size(), 0)?;
        let mut b = Image::from_size_val(image.size(), 0)?;

        enhance::adjust_brightness(image, factors.brightness, &mut a)?;
        enhance::adjust_contrast(&a, factors.contrast, &mut b)?;
        enhance::adjust_sharpness(&b, factors.sharpness, &mut a)?;
        enhance::adjust_saturation(&a, factors.color, &mut b)?;

        Ok(b)
    }

    /// Draw factors and apply them.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let factors = self.sample_factors(rng);
        log::debug!("photometric jitter {factors:?}");
        Self::apply_factors(image, &factors)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use roadaug_image::Image;

    use super::{PhotometricFactors, PhotometricJitter};
    use crate::{config::PhotometricConfig, error::AugmentError};

    #[test]
    fn neutral_factors_are_identity() -> Result<(), AugmentError> {
        let data = (0..20 * 10 * 3).map(|i| ((i * 7) % 256) as u8).collect();
        let image = Image::<u8, 3>::new([20, 10].into(), data)?;

        let out = PhotometricJitter::apply_factors(&image, &PhotometricFactors::NEUTRAL)?;
        assert_eq!(out, image);

        Ok(())
    }

    #[test]
    fn factors_stay_in_range() {
        let jitter = PhotometricJitter::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..500 {
            let f = jitter.sample_factors(&mut rng);
            assert!((0.5..=2.0).contains(&f.brightness));
            assert!((0.5..=1.0).contains(&f.contrast));
            assert!((0.5..=1.5).contains(&f.sharpness));
            assert!((0.0..=2.0).contains(&f.color));
        }
    }

    #[test]
    fn zero_color_gives_gray() -> Result<(), AugmentError> {
        let image = Image::<u8, 3>::new([2, 1].into(), vec![200, 40, 10, 10, 90, 220])?;
        let factors = PhotometricFactors {
            color: 0.0,
            ..PhotometricFactors::NEUTRAL
        };
        let out = PhotometricJitter::apply_factors(&image, &factors)?;
        for px in out.as_slice().chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
        Ok(())
    }

    #[test]
    fn fixed_range_is_deterministic() -> Result<(), AugmentError> {
        let jitter = PhotometricJitter::new(PhotometricConfig {
            brightness: (0.5, 0.5),
            contrast: (1.0, 1.0),
            sharpness: (1.0, 1.0),
            color: (1.0, 1.0),
        })?;
        let image = Image::<u8, 3>::from_size_val([4, 4].into(), 200)?;
        let out = jitter.apply(&image, &mut StdRng::seed_from_u64(9))?;
        assert!(out.as_slice().iter().all(|&v| v == 100));
        Ok(())
    }
}
