use crate::interpolation::{grid::meshgrid_image, interpolate_pixel, InterpolationMode};
use crate::parallel;
use roadaug_image::{Image, ImageDtype, ImageError, ImageSize};

/// Resize an image to a new size.
///
/// The function resizes an image to the size of `dst` using the specified
/// interpolation mode. It supports any number of channels and data types.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use roadaug_image::{Image, ImageSize};
/// use roadaug_imgproc::resize::resize_native;
/// use roadaug_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    // create a grid of x and y coordinates for the output image
    // and interpolate the values from the input image.
    let (map_x, map_y) = meshgrid_image(dst.cols(), src.cols(), dst.rows(), src.rows())?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |x, y, dst_pixel| {
        dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
            *pixel = T::from_f32(interpolate_pixel(src, x, y, k, interpolation));
        });
    });

    Ok(())
}

/// Compute the size that fits `size` inside a `max_size` x `max_size` box.
///
/// The aspect ratio is preserved, images are never upscaled and each side is at least one pixel.
/// A `max_size` of zero is treated as one.
pub fn thumbnail_size(size: ImageSize, max_size: usize) -> ImageSize {
    let max_size = max_size.max(1);
    if size.width <= max_size && size.height <= max_size {
        return size;
    }

    let scale = f64::min(
        max_size as f64 / size.width as f64,
        max_size as f64 / size.height as f64,
    );

    ImageSize {
        width: ((size.width as f64 * scale).round() as usize).clamp(1, max_size),
        height: ((size.height as f64 * scale).round() as usize).clamp(1, max_size),
    }
}

/// Shrink an image so neither side exceeds `max_size`, preserving the aspect ratio.
///
/// Images that already fit are returned unchanged.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] if `max_size` is zero.
pub fn thumbnail<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    max_size: usize,
    interpolation: InterpolationMode,
) -> Result<Image<T, C>, ImageError> {
    if max_size == 0 {
        return Err(ImageError::InvalidParameter(
            "thumbnail max size must be at least 1".to_string(),
        ));
    }

    let new_size = thumbnail_size(src.size(), max_size);
    if new_size == src.size() {
        return Ok(src.clone());
    }

    let mut dst = Image::from_size_val(new_size, T::default())?;
    resize_native(src, &mut dst, interpolation)?;

    Ok(dst)
}
