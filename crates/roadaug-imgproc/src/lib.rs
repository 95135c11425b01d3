#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// masked compositing of one image onto another.
pub mod composite;

/// utilities to draw on images.
pub mod draw;

/// image enhancement module.
pub mod enhance;

/// image filtering module.
pub mod filter;

/// utilities for interpolation.
pub mod interpolation;

/// random noise generators.
pub mod noise;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
