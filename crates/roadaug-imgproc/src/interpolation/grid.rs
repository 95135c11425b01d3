use roadaug_image::ImageError;

/// Create a meshgrid of source coordinates, one per destination pixel.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps a destination pixel (x, y) to its source coordinate.
///
/// # Returns
///
/// A tuple of row-major vectors of length `rows * cols` holding the x and y coordinates.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> Result<(f32, f32), ImageError>,
) -> Result<(Vec<f32>, Vec<f32>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = f(x, y)?;
            map_x.push(u);
            map_y.push(v);
        }
    }

    Ok((map_x, map_y))
}

/// Create a meshgrid that spreads `cols` x `rows` samples over a `max_cols` x `max_rows` image.
///
/// The first and last samples land on the first and last source pixels.
pub fn meshgrid_image(
    cols: usize,
    max_cols: usize,
    rows: usize,
    max_rows: usize,
) -> Result<(Vec<f32>, Vec<f32>), ImageError> {
    let step = |n: usize, max: usize| {
        if n > 1 {
            (max.saturating_sub(1)) as f32 / (n - 1) as f32
        } else {
            0.0
        }
    };
    let (step_x, step_y) = (step(cols, max_cols), step(rows, max_rows));

    meshgrid_from_fn(cols, rows, |x, y| {
        Ok((x as f32 * step_x, y as f32 * step_y))
    })
}
