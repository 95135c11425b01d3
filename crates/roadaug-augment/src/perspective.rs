use rand::Rng;

use roadaug_image::{Image, ImageSize};
use roadaug_imgproc::{interpolation::InterpolationMode, warp};

use crate::{config::PerspectiveConfig, error::AugmentError};

/// The random draws of one perspective tilt, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerspectiveParams {
    /// Width of the bottom edge of the destination quad.
    pub new_width: i64,
    /// Horizontal position of the bottom-left corner of the destination quad.
    pub xshift: i64,
}

/// Simulates a forward tilt by stretching and shifting the bottom edge of the frame.
///
/// The source quad is the reference square `(0, 0), (s, 0), (s, s), (0, s)` and the
/// destination quad is `(0, 0), (s, 0), (new_width, h), (xshift, h)` where `h` is
/// the image height. The solved coefficients map output pixels to input pixels and
/// the output keeps the input size.
#[derive(Debug, Clone, Default)]
pub struct PerspectiveSampler {
    config: PerspectiveConfig,
}

impl PerspectiveSampler {
    /// Create a sampler from a validated configuration.
    pub fn new(config: PerspectiveConfig) -> Result<Self, AugmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Draw the bottom edge width and shift for an image of the given width.
    ///
    /// Widths below the configured minimum are clamped to it.
    pub fn sample_params<R: Rng + ?Sized>(&self, width: usize, rng: &mut R) -> PerspectiveParams {
        let width = width as f64;
        let (lo, hi) = self.config.width_scale;
        let mut new_width = (width * rng.random_range(lo..=hi)).floor() as i64;
        let (lo, hi) = self.config.shift;
        let xshift = (width * rng.random_range(lo..=hi)).floor() as i64;

        if new_width < self.config.min_width {
            log::warn!(
                "perspective width {new_width} clamped to {}",
                self.config.min_width
            );
            new_width = self.config.min_width;
        }

        PerspectiveParams { new_width, xshift }
    }

    /// Solve the coefficients for an image size and fixed parameters.
    pub fn coefficients(
        &self,
        size: ImageSize,
        params: &PerspectiveParams,
    ) -> Result<[f64; 8], AugmentError> {
        let s = self.config.reference_size;
        let h = size.height as f64;
        let src = [[0.0, 0.0], [s, 0.0], [s, s], [0.0, s]];
        let dst = [
            [0.0, 0.0],
            [s, 0.0],
            [params.new_width as f64, h],
            [params.xshift as f64, h],
        ];
        Ok(warp::get_perspective_transform(&src, &dst)?)
    }

    /// Warp an image with fixed parameters using bicubic resampling.
    pub fn warp_with(
        &self,
        image: &Image<u8, 3>,
        params: &PerspectiveParams,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let coeffs = self.coefficients(image.size(), params)?;
        let mut out = Image::from_size_val(image.size(), 0)?;
        warp::warp_perspective(image, &mut out, &coeffs, InterpolationMode::Bicubic)?;
        Ok(out)
    }

    /// Draw parameters and warp the image.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        image: &Image<u8, 3>,
        rng: &mut R,
    ) -> Result<Image<u8, 3>, AugmentError> {
        let params = self.sample_params(image.width(), rng);
        log::debug!("perspective {params:?}");
        self.warp_with(image, &params)
    }
}
