use rayon::prelude::*;
use roadaug_image::{Image, ImageDtype, ImageError};

use super::replicate;

/// Apply a separable filter to an image.
///
/// The horizontal kernel is applied first into an `f32` buffer, then the vertical
/// kernel writes the destination. Discrete outputs are rounded once, at the end.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, of odd length.
/// * `kernel_y` - The vertical kernel, of odd length.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    for kernel in [kernel_x, kernel_y] {
        if kernel.len() % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(kernel.len()));
        }
    }

    let (rows, cols) = (src.rows(), src.cols());
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;
    let src_data = src.as_slice();

    // horizontal pass
    let mut temp = vec![0.0f32; src_data.len()];
    temp.par_chunks_exact_mut(cols * C)
        .zip(src_data.par_chunks_exact(cols * C))
        .for_each(|(temp_row, src_row)| {
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (i, &k) in kernel_x.iter().enumerate() {
                    let x = replicate(c as isize + i as isize - half_x, cols);
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        let v: f32 = src_row[x * C + ch].into();
                        *acc_val += v * k;
                    }
                }
                temp_row[c * C..(c + 1) * C].copy_from_slice(&acc);
            }
        });

    // vertical pass
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (i, &k) in kernel_y.iter().enumerate() {
                    let y = replicate(r as isize + i as isize - half_y, rows);
                    let idx = (y * cols + c) * C;
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += temp[idx + ch] * k;
                    }
                }
                for (ch, &acc_val) in acc.iter().enumerate() {
                    dst_row[c * C + ch] = T::from_f32(acc_val);
                }
            }
        });

    Ok(())
}
