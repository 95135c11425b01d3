use rayon::prelude::*;
use roadaug_image::{Image, ImageError};

/// Paste `top` onto `dst` at `offset`, weighted by a per-pixel `mask`.
///
/// For every covered pixel the output is
///
/// dst = (m * top + (255 - m) * dst) / 255
///
/// rounded to the nearest integer, so a mask value of 255 copies `top` and 0 keeps
/// `dst`. The offset is the position of the top-left corner of `top` in `dst` and may
/// be negative; the pasted region is clipped to the destination.
///
/// # Arguments
///
/// * `dst` - The background image, modified in place.
/// * `top` - The image to paste.
/// * `mask` - The blending weights, same size as `top`.
/// * `offset` - The (x, y) position of `top` in `dst`.
///
/// # Errors
///
/// Returns an error if `top` and `mask` have different sizes.
pub fn paste_with_mask<const C: usize>(
    dst: &mut Image<u8, C>,
    top: &Image<u8, C>,
    mask: &Image<u8, 1>,
    offset: (i64, i64),
) -> Result<(), ImageError> {
    if top.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            top.cols(),
            top.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    let (dst_cols, dst_rows) = (dst.cols() as i64, dst.rows() as i64);
    let (top_cols, top_rows) = (top.cols() as i64, top.rows() as i64);

    // overlap in destination coordinates
    let x0 = offset.0.max(0);
    let y0 = offset.1.max(0);
    let x1 = (offset.0 + top_cols).min(dst_cols);
    let y1 = (offset.1 + top_rows).min(dst_rows);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let (x0, x1) = (x0 as usize, x1 as usize);
    let top_x0 = (x0 as i64 - offset.0) as usize;
    let width = x1 - x0;
    let top_data = top.as_slice();
    let mask_data = mask.as_slice();
    let dst_cols = dst_cols as usize;
    let top_cols = top_cols as usize;

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(y, dst_row)| {
            let top_y = (y as i64 - offset.1) as usize;
            let top_row = &top_data[top_y * top_cols * C..(top_y + 1) * top_cols * C];
            let mask_row = &mask_data[top_y * top_cols..(top_y + 1) * top_cols];

            for i in 0..width {
                let m = mask_row[top_x0 + i] as u32;
                let dst_px = &mut dst_row[(x0 + i) * C..(x0 + i + 1) * C];
                let top_px = &top_row[(top_x0 + i) * C..(top_x0 + i + 1) * C];
                for (d, &t) in dst_px.iter_mut().zip(top_px) {
                    *d = ((t as u32 * m + *d as u32 * (255 - m) + 127) / 255) as u8;
                }
            }
        });

    Ok(())
}
