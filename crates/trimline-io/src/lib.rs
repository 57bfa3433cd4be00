#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Reading images of any supported format.
///
/// See [`functional::read_image_any`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Every raster written by trimline is an 8-bit RGBA PNG so transparency survives.
pub mod png;

pub use error::IoError;
pub use functional::{decode_image_any, read_image_any, GenericImage};
