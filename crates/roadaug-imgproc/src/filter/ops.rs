use rayon::prelude::*;
use roadaug_image::{Image, ImageDtype, ImageError};

use super::{kernels, replicate, separable_filter};

fn check_size<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<T, C>,
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

/// Blur an image using a box blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn box_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: (usize, usize),
) -> Result<(), ImageError> {
    let kernel_x = kernels::box_blur_kernel_1d(kernel_size.0);
    let kernel_y = kernels::box_blur_kernel_1d(kernel_size.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)
}

/// Convolve an image with a square, row major 2D kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The kernel weights, `kernel_size * kernel_size` values.
/// * `kernel_size` - The odd side length of the kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn filter2d<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &[f32],
    kernel_size: usize,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    if kernel_size % 2 == 0 || kernel.len() != kernel_size * kernel_size {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half = (kernel_size / 2) as isize;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (ky, kernel_row) in kernel.chunks_exact(kernel_size).enumerate() {
                    let y = replicate(r as isize + ky as isize - half, rows);
                    for (kx, &k) in kernel_row.iter().enumerate() {
                        if k == 0.0 {
                            continue;
                        }
                        let x = replicate(c as isize + kx as isize - half, cols);
                        let idx = (y * cols + x) * C;
                        for (ch, acc_val) in acc.iter_mut().enumerate() {
                            let v: f32 = src_data[idx + ch].into();
                            *acc_val += v * k;
                        }
                    }
                }
                for (ch, &acc_val) in acc.iter().enumerate() {
                    dst_row[c * C + ch] = T::from_f32(acc_val);
                }
            }
        });

    Ok(())
}

/// Blur an image with a per-channel median filter.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The odd side length of the window.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn median_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    if kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half = (kernel_size / 2) as isize;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            let mut window = Vec::with_capacity(kernel_size * kernel_size);
            for c in 0..cols {
                for ch in 0..C {
                    window.clear();
                    for dy in -half..=half {
                        let y = replicate(r as isize + dy, rows);
                        for dx in -half..=half {
                            let x = replicate(c as isize + dx, cols);
                            let v: f32 = src_data[(y * cols + x) * C + ch].into();
                            window.push(v);
                        }
                    }
                    window.sort_unstable_by(|a, b| a.total_cmp(b));
                    dst_row[c * C + ch] = T::from_f32(window[window.len() / 2]);
                }
            }
        });

    Ok(())
}

/// Blur an image along a line shaped kernel.
///
/// The kernel is normalized to sum 1 before it is applied, so the raw output of
/// [`kernels::motion_blur_kernel`] or any non-negative line mask can be passed.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The row major kernel weights.
/// * `kernel_size` - The odd side length of the kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn motion_blur<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &[f32],
    kernel_size: usize,
) -> Result<(), ImageError> {
    let total = kernel.iter().sum::<f32>();
    if total <= 0.0 {
        return Err(ImageError::InvalidParameter(format!(
            "motion blur kernel must have a positive sum, got {total}"
        )));
    }
    let normalized = kernel.iter().map(|w| w / total).collect::<Vec<_>>();
    filter2d(src, dst, &normalized, kernel_size)
}

/// Smooth an image with the 3x3 kernel from [`kernels::smooth_kernel_3x3`].
///
/// The outermost rows and columns are copied from the source unchanged.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn smooth<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let kernel = kernels::smooth_kernel_3x3();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .zip(src_data.par_chunks_exact(cols * C))
        .enumerate()
        .for_each(|(r, (dst_row, src_row))| {
            if r == 0 || r + 1 == rows || cols < 3 {
                dst_row.copy_from_slice(src_row);
                return;
            }

            dst_row[..C].copy_from_slice(&src_row[..C]);
            dst_row[(cols - 1) * C..].copy_from_slice(&src_row[(cols - 1) * C..]);

            for c in 1..cols - 1 {
                for ch in 0..C {
                    let mut acc = 0.0f32;
                    for (i, &k) in kernel.iter().enumerate() {
                        let y = r + i / 3 - 1;
                        let x = c + i % 3 - 1;
                        let v: f32 = src_data[(y * cols + x) * C + ch].into();
                        acc += v * k;
                    }
                    dst_row[c * C + ch] = T::from_f32(acc);
                }
            }
        });

    Ok(())
}
