#![deny(missing_docs)]
//! Randomized augmentation of driving images.
//!
//! The pipeline runs, in order:
//!
//! 1. a noise and blur stage ([`noise_blur::NoiseBlurStage`]),
//! 2. brightness, contrast, sharpness and color jitter ([`photometric::PhotometricJitter`]),
//! 3. an optional shadow composite ([`shadow::ShadowCompositor`]),
//! 4. an optional perspective tilt ([`perspective::PerspectiveSampler`]).
//!
//! Every random draw comes from a generator passed by the caller, so a seeded
//! generator reproduces the same output.
//!
//! ```no_run
//! use rand::{rngs::StdRng, SeedableRng};
//! use roadaug_augment::{augment, shadow::load_shadow_assets};
//! use roadaug_image::Image;
//!
//! let shadows = load_shadow_assets("assets/shadows/*.png").unwrap();
//! let image = Image::<f32, 3>::from_size_val([160, 120].into(), 0.5).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let out = augment(&image, Some(&shadows), true, &mut rng).unwrap();
//! assert_eq!(out.size(), image.size());
//! ```

/// Configuration of every augmentation stage.
pub mod config;

/// Error types for the augmentation pipeline.
pub mod error;

/// Conversion between normalized and discrete images.
pub mod format;

/// Random noise, blur and tone transforms.
pub mod noise_blur;

/// Random perspective tilt.
pub mod perspective;

/// Random enhancement chain.
pub mod photometric;

/// Orchestration of the full pipeline.
pub mod pipeline;

/// Shadow asset loading and compositing.
pub mod shadow;

pub use config::AugmentConfig;
pub use error::AugmentError;
pub use format::PixelFormat;
pub use pipeline::{augment, Augmenter};
pub use shadow::{ShadowAsset, ShadowAssetSet};
