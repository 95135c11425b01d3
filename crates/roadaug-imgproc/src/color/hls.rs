use crate::parallel;
use roadaug_image::{Image, ImageError};

/// Convert an RGB image to an HLS image.
///
/// The input is expected in the range [0, 1]. The output channels are:
///
/// * H: The hue in degrees, in the range [0, 360).
/// * L: The lightness in the range [0, 1].
/// * S: The saturation in the range [0, 1].
///
/// Precondition: the input and output images must have the same size.
pub fn hls_from_rgb(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (r, g, b) = (src_pixel[0], src_pixel[1], src_pixel[2]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        let (h, s) = if delta <= f32::EPSILON {
            (0.0, 0.0)
        } else {
            let s = if l < 0.5 {
                delta / (max + min)
            } else {
                delta / (2.0 - max - min)
            };

            let h = if max == r {
                60.0 * (g - b) / delta
            } else if max == g {
                60.0 * (b - r) / delta + 120.0
            } else {
                60.0 * (r - g) / delta + 240.0
            };

            (if h < 0.0 { h + 360.0 } else { h }, s)
        };

        dst_pixel[0] = h;
        dst_pixel[1] = l;
        dst_pixel[2] = s;
    });

    Ok(())
}

fn hue_to_channel(p: f32, q: f32, h: f32) -> f32 {
    let h = h.rem_euclid(360.0);
    if h < 60.0 {
        p + (q - p) * h / 60.0
    } else if h < 180.0 {
        q
    } else if h < 240.0 {
        p + (q - p) * (240.0 - h) / 60.0
    } else {
        p
    }
}

/// Convert an HLS image back to RGB in the range [0, 1].
///
/// The input uses the channel layout produced by [`hls_from_rgb`].
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_hls(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (h, l, s) = (src_pixel[0], src_pixel[1], src_pixel[2]);

        if s <= 0.0 {
            dst_pixel.fill(l);
            return;
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        dst_pixel[0] = hue_to_channel(p, q, h + 120.0);
        dst_pixel[1] = hue_to_channel(p, q, h);
        dst_pixel[2] = hue_to_channel(p, q, h - 120.0);
    });

    Ok(())
}
