/// Structuring elements.
pub mod kernels;

/// Min and max filters.
pub mod ops;

pub use kernels::{box_kernel, ellipse_kernel, Kernel, KernelShape};
pub use ops::{dilate, erode, morphology, MorphOp};
