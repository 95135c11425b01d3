//! Filter operations
//!
//! This module provides filter operations for image processing. Pixels outside of
//! the image are replicated from the nearest border pixel.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;

/// Clamp a signed coordinate to `[0, len)`.
#[inline]
pub(crate) fn replicate(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}
