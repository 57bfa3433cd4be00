use kurbo::BezPath;
use trimline_core::{DegradeReason, Outcome};

use crate::document::{SvgDocument, SvgPath};
use crate::offset::{offset_polygon, OffsetOptions};
use crate::reconstruct::rings_path;
use crate::sample::sample_path;
use crate::style::{PathStyle, ShrinkTarget};

/// Number of samples taken along a path before offsetting it.
pub const DEFAULT_SHRINK_SAMPLES: usize = 1000;

/// Parameters of [`shrink_path`] and [`shrink_document`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkOptions {
    /// Samples taken along each path.
    pub samples: usize,
    /// Parameters of the polygon offset.
    pub offset: OffsetOptions,
}

impl Default for ShrinkOptions {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SHRINK_SAMPLES,
            offset: OffsetOptions::default(),
        }
    }
}

/// Move the outline of a closed path inwards by `shrink_px`.
///
/// The path is sampled into a polygon, offset by `-shrink_px` and rebuilt from
/// straight segments. When the offset degrades the original path is returned
/// unchanged together with the reason.
///
/// # Example
///
/// ```
/// use kurbo::{BezPath, Rect, Shape};
/// use trimline_vector::shrink::{shrink_path, ShrinkOptions};
///
/// let square = Rect::new(0.0, 0.0, 100.0, 100.0).to_path(0.1);
/// let shrunk = shrink_path(&square, 10.0, &ShrinkOptions::default());
/// assert!(!shrunk.is_degraded());
/// assert!((shrunk.value().area().abs() - 6400.0).abs() < 1.0);
/// ```
pub fn shrink_path(path: &BezPath, shrink_px: f64, options: &ShrinkOptions) -> Outcome<BezPath> {
    let polygon = sample_path(path, options.samples);
    match offset_polygon(&polygon, -shrink_px, &options.offset) {
        Outcome::Complete(offset) => Outcome::Complete(rings_path(offset.rings())),
        Outcome::Degraded { reason, .. } => Outcome::Degraded {
            value: path.clone(),
            reason,
        },
    }
}

/// The result of [`shrink_document`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShrunkDocument {
    /// The document holding only the shrunk target paths.
    pub document: SvgDocument,
    /// Index in the output document and reason of every path kept unchanged.
    pub degraded: Vec<(usize, DegradeReason)>,
}

/// The style given to every re-emitted path.
pub fn shrunk_style() -> PathStyle {
    PathStyle::from_pairs([("fill", "black"), ("stroke", "none"), ("fill-opacity", "1")])
}

/// Shrink every target path of a document.
///
/// Paths that do not match `target` are dropped. Each target path is replaced
/// by its shrunk version styled with [`shrunk_style`]. The root attributes are
/// kept as they are.
pub fn shrink_document(
    document: &SvgDocument,
    shrink_px: f64,
    target: &ShrinkTarget,
    options: &ShrinkOptions,
) -> ShrunkDocument {
    let mut output = SvgDocument::new(document.attributes.clone());
    let mut degraded = Vec::new();

    for svg_path in document
        .paths
        .iter()
        .filter(|p| target.is_shrink_target(&p.style))
    {
        let outcome = shrink_path(&svg_path.path, shrink_px, options);
        if let Some(reason) = outcome.reason() {
            degraded.push((output.paths.len(), reason.clone()));
        }
        output
            .paths
            .push(SvgPath::new(outcome.into_inner(), shrunk_style()));
    }

    log::debug!(
        "shrunk {} of {} paths by {shrink_px}, {} kept unchanged",
        output.paths.len(),
        document.paths.len(),
        degraded.len()
    );

    ShrunkDocument {
        document: output,
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorError;
    use approx::assert_relative_eq;
    use kurbo::Shape;

    fn apothem_square(apothem: f64) -> BezPath {
        kurbo::Rect::new(-apothem, -apothem, apothem, apothem).to_path(0.1)
    }

    #[test]
    fn test_square_apothem_reduces() {
        let shrunk = shrink_path(&apothem_square(50.0), 10.0, &ShrinkOptions::default());
        assert!(!shrunk.is_degraded());

        let bbox = shrunk.value().bounding_box();
        assert_relative_eq!(bbox.x0, -40.0, epsilon = 1e-3);
        assert_relative_eq!(bbox.y0, -40.0, epsilon = 1e-3);
        assert_relative_eq!(bbox.x1, 40.0, epsilon = 1e-3);
        assert_relative_eq!(bbox.y1, 40.0, epsilon = 1e-3);
        assert_relative_eq!(shrunk.value().area().abs(), 6400.0, epsilon = 0.5);
    }

    #[test]
    fn test_circle_radius_reduces() {
        let circle = kurbo::Circle::new((0.0, 0.0), 40.0).to_path(0.01);
        let shrunk = shrink_path(&circle, 15.0, &ShrinkOptions::default());
        let expected = std::f64::consts::PI * 25.0 * 25.0;
        assert!((shrunk.value().area().abs() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_overshrink_returns_original() {
        let square = apothem_square(50.0);
        for shrink in [50.0, 51.0, 500.0] {
            let outcome = shrink_path(&square, shrink, &ShrinkOptions::default());
            assert!(matches!(
                outcome.reason(),
                Some(DegradeReason::OffsetCollapsed { .. })
            ));
            assert_eq!(outcome.value(), &square);
        }
    }

    #[test]
    fn test_empty_path_degrades() {
        let outcome = shrink_path(&BezPath::new(), 3.0, &ShrinkOptions::default());
        assert!(outcome.is_degraded());
        assert!(outcome.value().elements().is_empty());
    }

    #[test]
    fn test_document_keeps_only_targets() -> Result<(), VectorError> {
        let doc = SvgDocument::parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="100" viewBox="0 0 300 100">
  <rect x="0" y="0" width="100" height="100" fill=" BLACK "/>
  <rect x="100" y="0" width="100" height="100" fill="#010101"/>
  <rect x="200" y="40" width="10" height="10" stroke="#000" fill="none"/>
</svg>"##,
        )?;

        let shrunk = shrink_document(&doc, 10.0, &ShrinkTarget::default(), &ShrinkOptions::default());
        let out = &shrunk.document;

        assert_eq!(out.attributes, doc.attributes);
        assert_eq!(out.paths.len(), 2);
        for p in &out.paths {
            assert_eq!(p.style, shrunk_style());
        }

        // the small square collapses and is carried through unchanged
        assert_eq!(shrunk.degraded.len(), 1);
        assert_eq!(shrunk.degraded[0].0, 1);
        assert_eq!(out.paths[1].path, doc.paths[2].path);

        let bbox = out.paths[0].path.bounding_box();
        assert_relative_eq!(bbox.x0, 10.0, epsilon = 1e-3);
        assert_relative_eq!(bbox.x1, 90.0, epsilon = 1e-3);
        Ok(())
    }
}
