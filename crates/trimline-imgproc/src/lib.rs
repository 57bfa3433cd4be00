#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// alpha channel operations.
pub mod alpha;

/// polygon simplification.
pub mod approx;

/// color transformations module.
pub mod color;

/// alpha compositing of RGBA images.
pub mod composite;

/// border following and contour measurements.
pub mod contours;

/// foreground mask extraction.
pub mod mask;

/// morphological operations.
pub mod morphology;

/// image padding module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// stroke synthesis around a mask.
pub mod stroke;

/// operations to threshold images.
pub mod threshold;
