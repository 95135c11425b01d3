use std::path::Path;

use roadaug_image::{Image, ImageSize};

use crate::error::IoError;

/// A generic image type that can be any of the supported 8-bit layouts.
#[derive(Debug, Clone)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit grayscale image with alpha channel
    La8(Image<u8, 2>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl GenericImage {
    /// The size of the image.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::La8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// The number of channels of the image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(_) => 1,
            GenericImage::La8(_) => 2,
            GenericImage::Rgb8(_) => 3,
            GenericImage::Rgba8(_) => 4,
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// Sources with more than 8 bits per sample are narrowed to 8 bits, keeping the
/// alpha channel when there is one.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let image = match (color.has_color(), color.has_alpha()) {
        (false, false) => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        (false, true) => GenericImage::La8(Image::new(size, img.into_luma_alpha8().into_raw())?),
        (true, false) => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        (true, true) => GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?),
    };

    if color.bytes_per_pixel() as usize > image.num_channels() {
        log::debug!("narrowed {color:?} to 8 bits: {}", file_path.display());
    }

    Ok(image)
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// Grayscale sources are replicated on the three channels and alpha is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an 8-bit image to the given path.
///
/// The encoder is picked from the file extension, e.g. `.png` or `.jpg`.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image with 1 to 4 channels.
pub fn write_image<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, C>,
) -> Result<(), IoError> {
    let color = match C {
        1 => image::ExtendedColorType::L8,
        2 => image::ExtendedColorType::La8,
        3 => image::ExtendedColorType::Rgb8,
        4 => image::ExtendedColorType::Rgba8,
        _ => return Err(IoError::UnsupportedChannels(C)),
    };

    image::save_buffer(
        file_path.as_ref(),
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        color,
    )?;

    Ok(())
}
