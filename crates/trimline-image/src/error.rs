/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must match differ in size.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),
}
