use std::path::PathBuf;

use trimline_image::ImageError;
use trimline_io::IoError;
use trimline_vector::VectorError;

/// An error type for the file pipelines and the batch runner.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Error reading, writing or copying a file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error decoding or encoding a raster.
    #[error(transparent)]
    Raster(#[from] IoError),

    /// Error raised by a raster operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error parsing or writing an SVG document.
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// The configuration file is not valid JSON for a [`crate::ProcessConfig`].
    #[error("Failed to parse the configuration. {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The file extension is not handled by the selected mode.
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),

    /// No file of the batch could be processed.
    #[error("None of the {attempted} input files could be processed")]
    NothingProcessed {
        /// Number of files that were tried.
        attempted: usize,
    },
}
