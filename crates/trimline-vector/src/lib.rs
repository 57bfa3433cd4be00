#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// SVG document parsing and serialization.
pub mod document;

/// Error types for the vector module.
pub mod error;

/// Polygon offsetting with mitered joins.
pub mod offset;

/// Rebuilding paths from polygons.
pub mod reconstruct;

/// Path sampling.
pub mod sample;

/// Shrinking of paths and documents.
pub mod shrink;

/// Path styles and the shrink target predicate.
pub mod style;

/// Raster to SVG conversion.
pub mod vectorize;

pub use document::{SvgDocument, SvgPath};
pub use error::VectorError;
pub use offset::{offset_polygon, IslandPolicy, OffsetOptions, OffsetPolygon};
pub use sample::{sample_path, SampledPolygon};
pub use shrink::{shrink_document, shrink_path, ShrinkOptions, ShrunkDocument};
pub use style::{PathStyle, ShrinkTarget};
pub use vectorize::{vectorize, VectorizeOptions};
