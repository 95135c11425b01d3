use rand::Rng;
use roadaug_image::{Image, ImageError, ImageSize};

use crate::draw;

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_blur_kernel_1d(kernel_size: usize) -> Vec<f32> {
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Create the 3x3 smoothing kernel, row major.
///
/// The center weight is 5 and the eight neighbours weigh 1, normalized by 13.
pub fn smooth_kernel_3x3() -> [f32; 9] {
    let mut kernel = [1.0 / 13.0; 9];
    kernel[4] = 5.0 / 13.0;
    kernel
}

/// Create a random motion blur kernel.
///
/// A single line segment between two random points is rasterized into a
/// `kernel_size` x `kernel_size` grid and the result is normalized to sum 1.
/// Vertical segments always span at least two distinct rows.
///
/// # Arguments
///
/// * `kernel_size` - The odd size of the kernel, at least 3.
/// * `rng` - The random number generator used to pick the end points.
///
/// # Returns
///
/// The row major kernel weights.
pub fn motion_blur_kernel<R: Rng + ?Sized>(
    kernel_size: usize,
    rng: &mut R,
) -> Result<Vec<f32>, ImageError> {
    if kernel_size < 3 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let k = kernel_size as i64;
    let xs = rng.random_range(0..k);
    let xe = rng.random_range(0..k);
    let (ys, ye) = if xs == xe {
        let ys = rng.random_range(0..k);
        let mut ye = rng.random_range(0..k - 1);
        if ye >= ys {
            ye += 1;
        }
        (ys, ye)
    } else {
        (rng.random_range(0..k), rng.random_range(0..k))
    };

    let mut grid = Image::<f32, 1>::from_size_val(
        ImageSize {
            width: kernel_size,
            height: kernel_size,
        },
        0.0,
    )?;
    draw::draw_line(&mut grid, (xs, ys), (xe, ye), [1.0]);

    let mut kernel = grid.into_vec();
    let total = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|w| *w /= total);

    Ok(kernel)
}
