#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use trimline_core as common;

#[doc(inline)]
pub use trimline_image as image;

#[doc(inline)]
pub use trimline_imgproc as imgproc;

#[doc(inline)]
pub use trimline_io as io;

#[doc(inline)]
pub use trimline_vector as vector;

#[doc(inline)]
pub use trimline_cutout as cutout;

/// Sequential batch processing of input files.
pub mod batch;

/// Pipeline configuration.
pub mod config;

/// Error types for the pipelines.
pub mod error;

/// File-level pipelines, one input file to one output file.
pub mod pipeline;

pub use batch::{run_batch, BatchReport};
pub use config::{Mode, ProcessConfig};
pub use error::PipelineError;
pub use pipeline::{cutout_file, shrink_raster_file, shrink_svg_file, vectorize_file, FileOutcome};
