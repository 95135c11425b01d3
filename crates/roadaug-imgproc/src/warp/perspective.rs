use faer::prelude::SpSolver;

use crate::{
    interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode},
    parallel,
};

use roadaug_image::{Image, ImageDtype, ImageError};

// Ratio between the smallest and largest singular value below which the
// correspondence system is treated as singular.
const SINGULAR_RATIO: f64 = 1e-10;

/// Compute the eight perspective coefficients mapping `src` points onto `dst` points.
///
/// The coefficients `[a, b, c, d, e, f, g, h]` define
///
/// x' = (a·x + b·y + c) / (g·x + h·y + 1)
/// y' = (d·x + e·y + f) / (g·x + h·y + 1)
///
/// Each correspondence contributes two rows to an 8x8 system `A·k = B`, which is
/// solved in the least squares sense. With four points in general position the
/// system is exactly determined.
///
/// # Arguments
///
/// * `src` - The four source points (x, y).
/// * `dst` - The four destination points (x, y).
///
/// # Errors
///
/// Returns [`ImageError::SingularTransform`] when the source points are collinear
/// or otherwise degenerate.
pub fn get_perspective_transform(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<[f64; 8], ImageError> {
    // construct matrix A and vector B
    let mut rows = [[0.0f64; 8]; 8];
    let mut rhs = [0.0f64; 8];
    for i in 0..4 {
        let ([x, y], [u, v]) = (src[i], dst[i]);
        rows[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y];
        rows[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y];
        rhs[2 * i] = u;
        rhs[2 * i + 1] = v;
    }

    if rows.iter().flatten().chain(rhs.iter()).any(|x| !x.is_finite()) {
        return Err(ImageError::SingularTransform);
    }

    let mat_a = faer::Mat::<f64>::from_fn(8, 8, |i, j| rows[i][j]);
    let mat_b = faer::Mat::<f64>::from_fn(8, 1, |i, _| rhs[i]);

    // reject rank deficient systems before solving
    let singular_values = mat_a.singular_values();
    let max_sv = singular_values.iter().cloned().fold(0.0f64, f64::max);
    let min_sv = singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if !(max_sv > 0.0) || !(min_sv > max_sv * SINGULAR_RATIO) {
        return Err(ImageError::SingularTransform);
    }

    // A is square and full rank, so its LU solution is the least squares solution
    let k = mat_a.partial_piv_lu().solve(mat_b.as_ref());

    let mut coeffs = [0.0f64; 8];
    for (i, c) in coeffs.iter_mut().enumerate() {
        *c = k.read(i, 0);
    }

    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(ImageError::SingularTransform);
    }

    Ok(coeffs)
}

/// Map a point through the perspective coefficients.
///
/// Returns `None` when the point lies on the line at infinity of the transform.
pub fn perspective_transform_point(x: f64, y: f64, coeffs: &[f64; 8]) -> Option<(f64, f64)> {
    let [a, b, c, d, e, f, g, h] = *coeffs;
    let w = g * x + h * y + 1.0;
    if w.abs() < f64::EPSILON {
        return None;
    }
    Some(((a * x + b * y + c) / w, (d * x + e * y + f) / w))
}

/// Applies a perspective transformation to an image.
///
/// The coefficients map each OUTPUT pixel onto the INPUT image, i.e. the output
/// pixel centered at (x, y) takes the value sampled at `T(x, y)`. Output pixels
/// that map outside the input are set to zero.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `coeffs` - The perspective coefficients output -> input.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use roadaug_image::{Image, ImageSize};
/// use roadaug_imgproc::interpolation::InterpolationMode;
/// use roadaug_imgproc::warp::warp_perspective;
///
/// let src = Image::<f32, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 5,
///   },
///   vec![0.0f32; 4 * 5]
/// ).unwrap();
///
/// let coeffs = [1.0, 0.0, 1.0, 0.0, 1.0, -1.0, 0.0, 0.0];
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///   ImageSize {
///     width: 2,
///     height: 3,
///   },
///   0.0
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &coeffs, InterpolationMode::Bicubic).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    coeffs: &[f64; 8],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    // sample at pixel centers; NaN marks pixels with no source
    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        let pos = perspective_transform_point(x as f64 + 0.5, y as f64 + 0.5, coeffs);
        Ok(match pos {
            Some((u, v)) => (u as f32, v as f32),
            None => (f32::NAN, f32::NAN),
        })
    })?;

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);
    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |x, y, dst_pixel| {
        if x >= 0.0 && x < src_cols && y >= 0.0 && y < src_rows {
            dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
                *pixel = T::from_f32(interpolate_pixel(src, x - 0.5, y - 0.5, k, interpolation))
            });
        } else {
            dst_pixel.iter_mut().for_each(|pixel| *pixel = T::default());
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use roadaug_image::{Image, ImageError, ImageSize};

    use crate::interpolation::InterpolationMode;

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [256.0, 0.0], [256.0, 256.0], [0.0, 256.0]];

    #[test]
    fn perspective_identity() -> Result<(), ImageError> {
        let coeffs = super::get_perspective_transform(&SQUARE, &SQUARE)?;
        let expected = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        for (c, e) in coeffs.iter().zip(expected.iter()) {
            assert_relative_eq!(c, e, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn perspective_maps_control_points() -> Result<(), ImageError> {
        let dst = [[0.0, 0.0], [256.0, 0.0], [300.0, 256.0], [10.0, 256.0]];
        let coeffs = super::get_perspective_transform(&SQUARE, &dst)?;

        for (s, d) in SQUARE.iter().zip(dst.iter()) {
            let (u, v) = super::perspective_transform_point(s[0], s[1], &coeffs)
                .ok_or(ImageError::SingularTransform)?;
            assert_relative_eq!(u, d[0], epsilon = 1e-6);
            assert_relative_eq!(v, d[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn perspective_general_quad() -> Result<(), ImageError> {
        let src = [[3.0, 7.0], [120.0, 15.0], [140.0, 90.0], [-5.0, 100.0]];
        let dst = [[10.0, 12.0], [98.0, -4.0], [150.0, 130.0], [20.0, 77.0]];
        let coeffs = super::get_perspective_transform(&src, &dst)?;

        for (s, d) in src.iter().zip(dst.iter()) {
            let (u, v) = super::perspective_transform_point(s[0], s[1], &coeffs)
                .ok_or(ImageError::SingularTransform)?;
            assert_relative_eq!(u, d[0], epsilon = 1e-6);
            assert_relative_eq!(v, d[1], epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn perspective_collinear_is_singular() {
        let src = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let res = super::get_perspective_transform(&src, &SQUARE);
        assert_eq!(res, Err(ImageError::SingularTransform));

        let repeated = [[5.0, 5.0]; 4];
        let res = super::get_perspective_transform(&repeated, &SQUARE);
        assert_eq!(res, Err(ImageError::SingularTransform));
    }

    #[test]
    fn transform_point_at_infinity() {
        let coeffs = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0];
        assert_eq!(super::perspective_transform_point(1.0, 0.0, &coeffs), None);
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..60).map(|x| x as u8).collect(),
        )?;

        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let mut image_transformed = Image::from_size_val(image.size(), 0u8)?;
        super::warp_perspective(&image, &mut image_transformed, &m, InterpolationMode::Bicubic)?;

        assert_eq!(image_transformed.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let image_expected = vec![1.0, 0.0, 3.0, 2.0, 5.0, 4.0];

        // x' = 2 - x mirrors the pixel centers 0.5 <-> 1.5
        let m = [-1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 0.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_perspective(&image, &mut image_transformed, &m, InterpolationMode::Nearest)?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift_fills_zero() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).map(|x| x as f32).collect(),
        )?;

        // shift left by 1 pixel
        let m = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0];

        let image_expected = vec![
            1.0f32, 2.0, 3.0, 0.0, 5.0, 6.0, 7.0, 0.0, 9.0, 10.0, 11.0, 0.0, 13.0, 14.0, 15.0, 0.0,
        ];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 7.0)?;

        super::warp_perspective(&image, &mut image_transformed, &m, InterpolationMode::Nearest)?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_keeps_output_frame() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([256, 256].into(), 128)?;
        let dst = [[0.0, 0.0], [256.0, 0.0], [300.0, 256.0], [10.0, 256.0]];
        let coeffs = super::get_perspective_transform(&SQUARE, &dst)?;

        let mut warped = Image::from_size_val(image.size(), 0u8)?;
        super::warp_perspective(&image, &mut warped, &coeffs, InterpolationMode::Bicubic)?;

        assert_eq!(warped.size(), image.size());
        // the top-left corner maps onto itself
        assert_eq!(warped.get([0, 0, 0]), Some(&128));
        // the bottom-right corner samples beyond the input width
        assert_eq!(warped.get([255, 255, 0]), Some(&0));

        Ok(())
    }
}
