use roadaug_image::{Image, ImageDtype, ImageError};

use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;

/// Inverts a 2x3 affine matrix. A singular matrix maps to all zeros.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Builds the 2x3 matrix rotating points by `angle` degrees around `center`.
///
/// Rows are `[s*cos, s*sin, tx]` and `[-s*sin, s*cos, ty]`, with the translation
/// chosen so that `center` is a fixed point. In image coordinates (y down) a positive
/// angle turns the content counter-clockwise on screen.
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// Destination pixels whose source position falls outside the pixel extent of `src`
/// are left untouched.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
pub fn warp_affine<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(transform_point(x as f32, y as f32, &m_inv))
    })?;

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);
    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |x, y, dst_pixel| {
        // a position is inside when it falls within the extent of a source pixel
        if x > -0.5 && x < src_cols - 0.5 && y > -0.5 && y < src_rows - 0.5 {
            dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
                *pixel = T::from_f32(interpolate_pixel(src, x, y, k, interpolation))
            });
        }
    });

    Ok(())
}

/// Rotate an image about its center, keeping the canvas size.
///
/// Areas uncovered by the rotation are filled with zero.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `angle` - The angle in degrees, counter-clockwise.
/// * `interpolation` - The interpolation mode to use.
pub fn rotate<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    angle: f32,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let center = (
        (src.cols() as f32 - 1.0) / 2.0,
        (src.rows() as f32 - 1.0) / 2.0,
    );
    let m = get_rotation_matrix2d(center, angle, 1.0);

    dst.as_slice_mut().fill(T::default());
    warp_affine(src, dst, &m, interpolation)
}
