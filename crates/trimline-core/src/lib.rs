#![deny(missing_docs)]
//! Core types shared by every stage of the trimline pipeline.

/// outcome module with the succeeded / degraded result type.
pub mod outcome;

/// color module with hex color parsing.
pub mod color;

pub use crate::color::{ColorError, Rgb8};
pub use crate::outcome::{DegradeReason, Outcome};
