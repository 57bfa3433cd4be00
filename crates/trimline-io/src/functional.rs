use std::path::Path;

use trimline_image::{Image, ImageSize};

use crate::error::IoError;

/// A decoded raster in the channel layout it was stored with.
///
/// Deeper formats (16-bit, float) are reduced to 8 bits per channel while decoding.
#[derive(Debug, Clone, PartialEq)]
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
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::La8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// Whether the stored format carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, GenericImage::La8(_) | GenericImage::Rgba8(_))
    }

    /// Convert to RGBA8, filling a missing alpha channel with 255.
    pub fn into_rgba8(self) -> Result<Image<u8, 4>, IoError> {
        let size = self.size();
        let data: Vec<u8> = match self {
            GenericImage::Rgba8(img) => return Ok(img),
            GenericImage::L8(img) => img
                .as_slice()
                .iter()
                .flat_map(|&l| [l, l, l, u8::MAX])
                .collect(),
            GenericImage::La8(img) => img
                .as_slice()
                .chunks_exact(2)
                .flat_map(|la| [la[0], la[0], la[0], la[1]])
                .collect(),
            GenericImage::Rgb8(img) => img
                .as_slice()
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                .collect(),
        };

        Ok(Image::new(size, data)?)
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate,
/// guessing the format from the file content rather than its extension.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    decode_image_any(&bytes)
}

/// Decodes an image of any supported format from raw bytes.
pub fn decode_image_any(bytes: &[u8]) -> Result<GenericImage, IoError> {
    let img = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    let color = img.color();
    log::trace!("decoded {size} image with color type {color:?}");

    let image = match (color.has_color(), color.has_alpha()) {
        (false, false) => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        (false, true) => GenericImage::La8(Image::new(size, img.into_luma_alpha8().into_raw())?),
        (true, false) => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        (true, true) => GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?),
    };

    Ok(image)
}
