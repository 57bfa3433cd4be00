/// Why an operation fell back to its input instead of producing a new result.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradeReason {
    /// The offset distance consumed the whole shape.
    OffsetCollapsed {
        /// The signed offset distance that was requested.
        distance: f64,
    },

    /// The polygon was too degenerate or the geometry kernel rejected it.
    InvalidGeometry(String),

    /// The segmentation collaborator failed.
    SegmentationFailed(String),

    /// Thresholding, edge shifting or stroke synthesis failed.
    PostProcessFailed(String),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DegradeReason::OffsetCollapsed { distance } => {
                write!(f, "offset by {distance} collapsed the shape")
            }
            DegradeReason::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            DegradeReason::SegmentationFailed(msg) => write!(f, "segmentation failed: {msg}"),
            DegradeReason::PostProcessFailed(msg) => write!(f, "post-processing failed: {msg}"),
        }
    }
}

/// The result of a best-effort operation.
///
/// Hard failures are reported through `Result`; an `Outcome` only distinguishes
/// between a fully computed value and a value that was carried forward unchanged
/// from the input.
///
/// # Examples
///
/// ```
/// use trimline_core::{DegradeReason, Outcome};
///
/// let done: Outcome<u32> = Outcome::Complete(3);
/// assert!(!done.is_degraded());
///
/// let kept = Outcome::Degraded {
///     value: 7,
///     reason: DegradeReason::OffsetCollapsed { distance: -8.0 },
/// };
/// assert!(kept.is_degraded());
/// assert_eq!(kept.into_inner(), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation produced a new value.
    Complete(T),

    /// The operation could not complete and returned its input instead.
    Degraded {
        /// The carried-forward value.
        value: T,
        /// The cause of the fallback.
        reason: DegradeReason,
    },
}

impl<T> Outcome<T> {
    /// Whether the value is a fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Borrow the carried value regardless of the variant.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) => value,
            Outcome::Degraded { value, .. } => value,
        }
    }

    /// The fallback reason, if any.
    pub fn reason(&self) -> Option<&DegradeReason> {
        match self {
            Outcome::Complete(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Consume the outcome and return the carried value.
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Complete(value) => value,
            Outcome::Degraded { value, .. } => value,
        }
    }

    /// Transform the carried value while keeping the variant.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Complete(value) => Outcome::Complete(f(value)),
            Outcome::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}
