/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two image sizes do not match.
    #[error("Image size mismatch ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the number of images passed to a merge does not match the channels.
    #[error("Expected {1} channel images, got {0}")]
    InvalidChannelCount(usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for an image of {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a pixel value cannot be cast to the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when a filter kernel has an unsupported size.
    #[error("Invalid kernel size {0}, expected an odd size >= 1")]
    InvalidKernelSize(usize),

    /// Error when the control points of a perspective transform are degenerate.
    #[error("Cannot solve the perspective transform: control points are degenerate")]
    SingularTransform,

    /// Error when a numeric parameter is outside of its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
