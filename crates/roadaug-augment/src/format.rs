use roadaug_image::{Image, ImageDtype, ImageError};

/// A pixel representation accepted at the pipeline boundary.
///
/// The pipeline works on discrete `u8` images internally; implementors convert
/// into and out of that representation.
pub trait PixelFormat: ImageDtype {
    /// Convert an image of this format into a discrete image.
    fn to_discrete(image: &Image<Self, 3>) -> Result<Image<u8, 3>, ImageError>;

    /// Convert a discrete image back into this format.
    fn from_discrete(image: Image<u8, 3>) -> Result<Image<Self, 3>, ImageError>;
}

impl PixelFormat for u8 {
    fn to_discrete(image: &Image<u8, 3>) -> Result<Image<u8, 3>, ImageError> {
        Ok(image.clone())
    }

    fn from_discrete(image: Image<u8, 3>) -> Result<Image<u8, 3>, ImageError> {
        Ok(image)
    }
}

impl PixelFormat for f32 {
    fn to_discrete(image: &Image<f32, 3>) -> Result<Image<u8, 3>, ImageError> {
        Ok(discrete_from_normalized(image))
    }

    fn from_discrete(image: Image<u8, 3>) -> Result<Image<f32, 3>, ImageError> {
        image.cast_and_scale::<f32>(1.0 / 255.0)
    }
}

/// Convert a normalized image in [0, 1] into a discrete image.
///
/// Values are scaled by 255, rounded and saturated.
pub fn discrete_from_normalized<const C: usize>(image: &Image<f32, C>) -> Image<u8, C> {
    image.map(|v| u8::from_f32(v * 255.0))
}

/// Convert a discrete image into a normalized image in [0, 1].
pub fn normalized_from_discrete<const C: usize>(image: &Image<u8, C>) -> Image<f32, C> {
    image.map(|v| v as f32 / 255.0)
}
