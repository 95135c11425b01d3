use roadaug_image::ImageError;
use roadaug_io::IoError;

/// An error type for the augmentation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    /// The perspective control points are degenerate.
    #[error("Cannot solve the perspective transform: control points are degenerate")]
    SingularTransform,

    /// Error from an image operation.
    #[error(transparent)]
    Image(ImageError),

    /// Error reading an asset from disk.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error when the shadow asset pattern is malformed.
    #[error("Invalid shadow asset pattern. {0}")]
    Pattern(#[from] glob::PatternError),

    /// Error when a path matched by the shadow asset pattern cannot be read.
    #[error("Failed to list shadow assets. {0}")]
    Glob(#[from] glob::GlobError),

    /// Error when the configuration is out of its valid domain.
    #[error("Invalid augmentation config: {0}")]
    InvalidConfig(String),

    /// Error when the configuration cannot be parsed.
    #[error("Failed to parse augmentation config. {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Error when a shadow is requested from an empty asset set.
    #[error("Cannot composite a shadow from an empty asset set")]
    EmptyShadowSet,
}

impl From<ImageError> for AugmentError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::SingularTransform => AugmentError::SingularTransform,
            other => AugmentError::Image(other),
        }
    }
}
