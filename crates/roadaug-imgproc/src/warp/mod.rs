//! Geometric image transformations using affine and perspective warps.
//!
//! This module provides functions for applying 2D transformations to images:
//!
//! - Rotations about the image center (affine)
//! - Perspective transformations defined by eight coefficients
//! - Solving the perspective coefficients from four point correspondences
//!
//! # Examples
//!
//! Solving the coefficients that tilt the bottom edge of a 256x256 frame:
//!
//! ```
//! use roadaug_imgproc::warp::get_perspective_transform;
//!
//! let src = [[0.0, 0.0], [256.0, 0.0], [256.0, 256.0], [0.0, 256.0]];
//! let dst = [[0.0, 0.0], [256.0, 0.0], [280.0, 256.0], [12.0, 256.0]];
//! let coeffs = get_perspective_transform(&src, &dst).unwrap();
//! assert_eq!(coeffs.len(), 8);
//! ```

mod affine;
mod perspective;

pub use affine::{get_rotation_matrix2d, invert_affine_transform, rotate, warp_affine};
pub use perspective::{
    get_perspective_transform, perspective_transform_point, warp_perspective,
};
