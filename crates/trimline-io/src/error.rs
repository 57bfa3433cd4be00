use std::path::PathBuf;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// The input path does not exist.
    #[error("No such input file: {0}")]
    FileDoesNotExist(PathBuf),

    /// The reader does not handle files with this extension.
    #[error("Unexpected extension for {0}")]
    InvalidFileExtension(PathBuf),

    /// Reading or writing the file failed.
    #[error("File access failed. {0}")]
    FileError(#[from] std::io::Error),

    /// The decoded pixels do not fit the image size.
    #[error("Decoded pixels do not form an image. {0}")]
    ImageCreationError(#[from] trimline_image::ImageError),

    /// The raster could not be decoded or saved by the image codecs.
    #[error("Raster codec failed. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// PNG encoding failed.
    #[error("Could not encode PNG. {0}")]
    PngEncodingError(String),

    /// The file is not an 8-bit RGBA PNG.
    #[error("Could not decode PNG. {0}")]
    PngDecodeError(String),
}
