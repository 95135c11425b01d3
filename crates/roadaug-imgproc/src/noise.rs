use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use rayon::prelude::*;
use roadaug_image::{Image, ImageDtype, ImageError};

use crate::{color, parallel};

fn check_size<T, const C: usize>(src: &Image<T, C>, dst: &Image<T, C>) -> Result<(), ImageError> {
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

/// Add zero-mean gaussian noise to an image.
///
/// The noise is drawn serially from `rng` so the result only depends on its state,
/// then added to the pixels in parallel.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `sigma` - The standard deviation of the noise, in the units of the pixel values.
/// * `per_channel` - Draw one sample per channel instead of one per pixel.
/// * `rng` - The random number generator.
///
/// # Errors
///
/// Returns an error if the sizes do not match or `sigma` is negative or not finite.
pub fn additive_gaussian_noise<T, const C: usize, R>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    sigma: f32,
    per_channel: bool,
    rng: &mut R,
) -> Result<(), ImageError>
where
    T: ImageDtype,
    R: Rng + ?Sized,
{
    check_size(src, dst)?;

    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ImageError::InvalidParameter(format!(
            "gaussian noise sigma must be finite and non-negative, got {sigma}"
        )));
    }

    let normal = Normal::new(0.0f32, sigma).map_err(|e| {
        ImageError::InvalidParameter(format!("gaussian noise sigma {sigma}: {e}"))
    })?;

    let noise: Vec<f32> = if per_channel {
        (0..src.as_slice().len())
            .map(|_| normal.sample(rng))
            .collect()
    } else {
        let num_pixels = src.cols() * src.rows();
        (0..num_pixels)
            .flat_map(|_| std::iter::repeat(normal.sample(rng)).take(C))
            .collect()
    };

    dst.as_slice_mut()
        .par_iter_mut()
        .zip(src.as_slice().par_iter())
        .zip(noise.par_iter())
        .for_each(|((dst_val, &src_val), &n)| {
            let v: f32 = src_val.into();
            *dst_val = T::from_f32(v + n);
        });

    Ok(())
}

/// Simulate camera sensor noise on an RGB image.
///
/// The image is converted to HLS. The hue receives gaussian noise with standard
/// deviation `color_shift * 360 * intensity` degrees and wraps around. The
/// lightness receives Poisson noise whose rate is the standard deviation of the
/// lightness scaled by `intensity * 255`, applied as `l += n / 255 * (1 - l)`.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `color_shift` - The hue noise scale, as a fraction of the hue circle.
/// * `intensity` - The overall strength of the noise.
/// * `rng` - The random number generator.
///
/// # Errors
///
/// Returns an error if the sizes do not match or `color_shift` or `intensity` is
/// negative or not finite.
pub fn iso_noise<R: Rng + ?Sized>(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    color_shift: f32,
    intensity: f32,
    rng: &mut R,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    for (name, value) in [("color shift", color_shift), ("intensity", intensity)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ImageError::InvalidParameter(format!(
                "iso noise {name} must be finite and non-negative, got {value}"
            )));
        }
    }

    let rgb = src.cast_and_scale::<f32>(1.0 / 255.0)?;
    let mut hls = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;
    color::hls_from_rgb(&rgb, &mut hls)?;

    let num_pixels = src.cols() * src.rows();
    if num_pixels == 0 {
        return Ok(());
    }

    let (sum, sum_sq) = hls
        .as_slice()
        .chunks_exact(3)
        .fold((0.0f64, 0.0f64), |(s, sq), px| {
            let l = px[1] as f64;
            (s + l, sq + l * l)
        });
    let mean = sum / num_pixels as f64;
    let stddev = (sum_sq / num_pixels as f64 - mean * mean).max(0.0).sqrt() as f32;

    let hue_normal = Normal::new(0.0f32, color_shift * 360.0 * intensity).map_err(|e| {
        ImageError::InvalidParameter(format!("iso noise color shift {color_shift}: {e}"))
    })?;

    let rate = stddev * intensity * 255.0;
    let luminance_noise: Vec<f32> = if rate > 0.0 {
        let poisson = Poisson::new(rate).map_err(|e| {
            ImageError::InvalidParameter(format!("iso noise intensity {intensity}: {e}"))
        })?;
        (0..num_pixels).map(|_| poisson.sample(rng)).collect()
    } else {
        vec![0.0; num_pixels]
    };
    let hue_noise: Vec<f32> = (0..num_pixels).map(|_| hue_normal.sample(rng)).collect();

    hls.as_slice_mut()
        .par_chunks_exact_mut(3)
        .zip(luminance_noise.par_iter().zip(hue_noise.par_iter()))
        .for_each(|(px, (&ln, &hn))| {
            px[0] = (px[0] + hn).rem_euclid(360.0);
            let l = px[1];
            px[1] = (l + ln / 255.0 * (1.0 - l)).clamp(0.0, 1.0);
        });

    let mut noisy = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;
    color::rgb_from_hls(&hls, &mut noisy)?;

    parallel::par_iter_rows_val(&noisy, dst, |&v, dst_val| {
        *dst_val = u8::from_f32(v * 255.0);
    });

    Ok(())
}
