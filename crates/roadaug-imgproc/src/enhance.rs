use roadaug_image::{Image, ImageDtype, ImageError};

use crate::{color, filter, parallel};

fn check_size<T, const C1: usize, U, const C2: usize>(
    src: &Image<T, C1>,
    dst: &Image<U, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Interpolate between a degenerate image and the source image.
///
/// The formula used is:
///
/// dst(x,y,c) = degenerate(x,y,c) + factor * (src(x,y,c) - degenerate(x,y,c))
///
/// A factor of 1.0 returns the source, 0.0 returns the degenerate image and values
/// above 1.0 extrapolate away from it. Discrete outputs are rounded and clamped.
///
/// # Arguments
///
/// * `degenerate` - The image the factor interpolates from.
/// * `src` - The input image.
/// * `factor` - The interpolation factor.
/// * `dst` - The output image.
///
/// # Errors
///
/// Returns an error if the sizes of the three images do not match.
pub fn blend<T: ImageDtype, const C: usize>(
    degenerate: &Image<T, C>,
    src: &Image<T, C>,
    factor: f32,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    check_size(degenerate, src)?;
    check_size(src, dst)?;

    parallel::par_iter_rows_val_two(degenerate, src, dst, |&d, &s, dst_pixel| {
        let d: f32 = d.into();
        let s: f32 = s.into();
        *dst_pixel = T::from_f32(d + factor * (s - d));
    });

    Ok(())
}

/// Adjust the brightness of an image by scaling it towards black.
///
/// dst(x,y,c) = factor * src(x,y,c)
///
/// # Arguments
///
/// * `src` - The input image.
/// * `factor` - The brightness factor, 1.0 leaves the image unchanged.
/// * `dst` - The output image.
pub fn adjust_brightness<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    factor: f32,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows_val(src, dst, |&s, dst_pixel| {
        let s: f32 = s.into();
        *dst_pixel = T::from_f32(factor * s);
    });

    Ok(())
}

/// Adjust the contrast of an RGB image.
///
/// The degenerate image is a uniform gray whose level is the mean luma of `src`.
/// For discrete images the level is rounded to the nearest integer.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `factor` - The contrast factor, 1.0 leaves the image unchanged.
/// * `dst` - The output image.
pub fn adjust_contrast<T: ImageDtype>(
    src: &Image<T, 3>,
    factor: f32,
    dst: &mut Image<T, 3>,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    let mut gray = Image::<T, 1>::from_size_val(src.size(), T::default())?;
    color::gray_from_rgb(src, &mut gray)?;

    let num_pixels = gray.as_slice().len().max(1);
    let mean = gray
        .as_slice()
        .iter()
        .map(|&v| {
            let v: f32 = v.into();
            v as f64
        })
        .sum::<f64>()
        / num_pixels as f64;
    let level: f32 = T::from_f32(mean as f32).into();

    parallel::par_iter_rows_val(src, dst, |&s, dst_pixel| {
        let s: f32 = s.into();
        *dst_pixel = T::from_f32(level + factor * (s - level));
    });

    Ok(())
}

/// Adjust the sharpness of an image.
///
/// The degenerate image is the source filtered with [`filter::smooth`]. Factors below
/// 1.0 soften the image and factors above 1.0 sharpen it.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `factor` - The sharpness factor, 1.0 leaves the image unchanged.
/// * `dst` - The output image.
pub fn adjust_sharpness<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    factor: f32,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    let mut smoothed = Image::<T, C>::from_size_val(src.size(), T::default())?;
    filter::smooth(src, &mut smoothed)?;

    blend(&smoothed, src, factor, dst)
}

/// Adjust the color saturation of an RGB image.
///
/// The degenerate image is the luma of `src` replicated on the three channels.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `factor` - The saturation factor, 0.0 gives a grayscale image.
/// * `dst` - The output image.
pub fn adjust_saturation<T: ImageDtype>(
    src: &Image<T, 3>,
    factor: f32,
    dst: &mut Image<T, 3>,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    let mut gray = Image::<T, 1>::from_size_val(src.size(), T::default())?;
    color::gray_from_rgb(src, &mut gray)?;

    let mut degenerate = Image::<T, 3>::from_size_val(src.size(), T::default())?;
    color::rgb_from_gray(&gray, &mut degenerate)?;

    blend(&degenerate, src, factor, dst)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use roadaug_image::{Image, ImageError, ImageSize};

    fn sample() -> Result<Image<u8, 3>, ImageError> {
        Image::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![
                10, 200, 30, 40, 50, 60, 70, 80, 90, //
                100, 110, 120, 130, 140, 150, 160, 170, 180, //
                190, 200, 210, 220, 230, 240, 250, 5, 15,
            ],
        )
    }

    #[test]
    fn blend_endpoints() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::new([2, 1].into(), vec![0.2, 0.8])?;
        let degenerate = Image::<f32, 1>::from_size_val(src.size(), 0.5)?;
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;

        super::blend(&degenerate, &src, 0.0, &mut dst)?;
        for &v in dst.as_slice() {
            assert_relative_eq!(v, 0.5, epsilon = 1e-6);
        }

        super::blend(&degenerate, &src, 1.0, &mut dst)?;
        for (&v, &e) in dst.as_slice().iter().zip(src.as_slice()) {
            assert_relative_eq!(v, e, epsilon = 1e-6);
        }

        super::blend(&degenerate, &src, 2.0, &mut dst)?;
        assert_relative_eq!(dst.as_slice()[0], -0.1, epsilon = 1e-6);
        assert_relative_eq!(dst.as_slice()[1], 1.1, epsilon = 1e-6);

        Ok(())
    }

    #[test]
    fn neutral_factors_are_identity() -> Result<(), ImageError> {
        let src = sample()?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;

        super::adjust_brightness(&src, 1.0, &mut dst)?;
        assert_eq!(dst, src);

        super::adjust_contrast(&src, 1.0, &mut dst)?;
        assert_eq!(dst, src);

        super::adjust_sharpness(&src, 1.0, &mut dst)?;
        assert_eq!(dst, src);

        super::adjust_saturation(&src, 1.0, &mut dst)?;
        assert_eq!(dst, src);

        Ok(())
    }

    #[test]
    fn brightness_clamps() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([3, 1].into(), vec![0, 100, 200])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        super::adjust_brightness(&src, 1.5, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 150, 255]);

        super::adjust_brightness(&src, 0.0, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 0, 0]);
        Ok(())
    }

    #[test]
    fn zero_contrast_is_mean_gray() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new([2, 1].into(), vec![0, 0, 0, 100, 100, 100])?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::adjust_contrast(&src, 0.0, &mut dst)?;
        assert_eq!(dst.as_slice(), &[50; 6]);
        Ok(())
    }

    #[test]
    fn zero_saturation_is_gray() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new([1, 1].into(), vec![255, 0, 0])?;
        let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
        super::adjust_saturation(&src, 0.0, &mut dst)?;
        assert_eq!(dst.as_slice(), &[76, 76, 76]);
        Ok(())
    }
}
