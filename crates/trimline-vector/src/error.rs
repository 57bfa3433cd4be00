use trimline_image::ImageError;

/// An error type for the vector module.
#[derive(thiserror::Error, Debug)]
pub enum VectorError {
    /// The document is not well-formed XML.
    #[error("Failed to parse the SVG document")]
    Xml(#[from] roxmltree::Error),

    /// The root element is not `<svg>`.
    #[error("Root element is <{0}>, expected <svg>")]
    NotSvg(String),

    /// A `d` attribute could not be parsed.
    #[error("Invalid path data {data:?}: {message}")]
    PathData {
        /// The offending attribute value.
        data: String,
        /// The parser message.
        message: String,
    },

    /// Error reading or writing an SVG file.
    #[error("Failed to manipulate the SVG file")]
    Io(#[from] std::io::Error),

    /// Error raised by the raster stage of vectorization.
    #[error(transparent)]
    Image(#[from] ImageError),
}
