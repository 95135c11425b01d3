use roadaug_image::{Image, ImageDtype};

// Keys cubic convolution coefficient, same as PIL and OpenCV.
const A: f32 = -0.5;

fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

/// Kernel for bicubic interpolation over the 4x4 neighbourhood of (u, v).
///
/// Neighbours outside the image replicate the border pixel.
pub(crate) fn bicubic_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);
    let data = image.as_slice();

    let (u0, v0) = (u.floor(), v.floor());
    let (fu, fv) = (u - u0, v - v0);
    let (iu, iv) = (u0 as i64, v0 as i64);

    let wx = [
        cubic_weight(1.0 + fu),
        cubic_weight(fu),
        cubic_weight(1.0 - fu),
        cubic_weight(2.0 - fu),
    ];
    let wy = [
        cubic_weight(1.0 + fv),
        cubic_weight(fv),
        cubic_weight(1.0 - fv),
        cubic_weight(2.0 - fv),
    ];

    let mut acc = 0.0;
    for (j, wyj) in wy.iter().enumerate() {
        let y = (iv + j as i64 - 1).clamp(0, rows - 1) as usize;
        let mut row_acc = 0.0;
        for (i, wxi) in wx.iter().enumerate() {
            let x = (iu + i as i64 - 1).clamp(0, cols - 1) as usize;
            let val: f32 = data[(y * cols as usize + x) * C + c].into();
            row_acc += val * wxi;
        }
        acc += row_acc * wyj;
    }

    acc
}
