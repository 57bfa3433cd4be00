use kurbo::Point;
use trimline_image::Image;
use trimline_imgproc::approx::approx_poly_dp;
use trimline_imgproc::contours::{
    arc_length, chain_approx_simple, contour_area, find_external_contours, Point as PixelPoint,
};
use trimline_imgproc::mask::binary_mask;

use crate::document::{SvgDocument, SvgPath};
use crate::error::VectorError;
use crate::reconstruct::{rounded_path, straight_path};
use crate::style::PathStyle;

/// Contours enclosing less area than this, in square pixels, are noise.
pub const DEFAULT_MIN_AREA: f64 = 50.0;

/// Tolerance per unit of smoothness, relative to the contour perimeter.
pub const DEFAULT_EPSILON_FACTOR: f64 = 0.0005;

/// Parameters of [`vectorize`].
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizeOptions {
    /// Simplification strength, higher values give fewer vertices.
    pub smoothness: f64,
    /// Corner radius in pixels, `0` keeps sharp corners.
    pub corner_radius: f64,
    /// Fill color of the emitted paths.
    pub fill_color: String,
    /// Minimum enclosed area of a contour.
    pub min_area: f64,
    /// Tolerance per unit of smoothness, relative to the perimeter.
    pub epsilon_factor: f64,
}

impl Default for VectorizeOptions {
    fn default() -> Self {
        Self {
            smoothness: 4.0,
            corner_radius: 0.0,
            fill_color: "black".to_string(),
            min_area: DEFAULT_MIN_AREA,
            epsilon_factor: DEFAULT_EPSILON_FACTOR,
        }
    }
}

/// Trace and simplify the outer contours of a binary mask.
///
/// Contours under `min_area` are dropped, the rest are simplified with a
/// tolerance of `smoothness * epsilon_factor * perimeter`. Polygons left with
/// fewer than three vertices are dropped.
pub fn mask_polygons(mask: &Image<u8, 1>, options: &VectorizeOptions) -> Vec<Vec<PixelPoint>> {
    let contours = find_external_contours(mask, 0);
    let total = contours.len();

    let polygons: Vec<Vec<PixelPoint>> = contours
        .into_iter()
        .filter_map(|contour| {
            let points = chain_approx_simple(&contour.points);
            if contour_area(&points) < options.min_area {
                return None;
            }

            let epsilon = options.smoothness * options.epsilon_factor * arc_length(&points, true);
            let simplified = approx_poly_dp(&points, epsilon, true);
            (simplified.len() >= 3).then_some(simplified)
        })
        .collect();

    log::debug!("kept {} of {total} contours", polygons.len());
    polygons
}

/// Convert the silhouette of an RGBA image into an SVG document.
///
/// With `has_alpha` the silhouette is every pixel with alpha above 10, otherwise
/// the dark pixels under Otsu's threshold. Each outer contour becomes one path
/// filled with [`VectorizeOptions::fill_color`]; holes are not represented. The
/// document is sized to the image with a matching `viewBox`.
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_vector::vectorize::{vectorize, VectorizeOptions};
///
/// let mut img = Image::<u8, 4>::from_size_val([40, 40].into(), 0).unwrap();
/// for y in 10..30 {
///     for x in 10..30 {
///         img.set_pixel(x, y, 3, 255).unwrap();
///     }
/// }
///
/// let doc = vectorize(&img, true, &VectorizeOptions::default()).unwrap();
/// assert_eq!(doc.attribute("viewBox"), Some("0 0 40 40"));
/// assert_eq!(doc.paths.len(), 1);
/// ```
pub fn vectorize(
    src: &Image<u8, 4>,
    has_alpha: bool,
    options: &VectorizeOptions,
) -> Result<SvgDocument, VectorError> {
    let mask = binary_mask(src, has_alpha)?;
    let (width, height) = (src.width(), src.height());

    let mut document = SvgDocument::new(vec![
        ("width".to_string(), width.to_string()),
        ("height".to_string(), height.to_string()),
        ("viewBox".to_string(), format!("0 0 {width} {height}")),
    ]);

    for polygon in mask_polygons(&mask, options) {
        let points: Vec<Point> = polygon
            .iter()
            .map(|p| Point::new(p.x as f64, p.y as f64))
            .collect();

        let path = if options.corner_radius > 0.0 {
            rounded_path(&points, options.corner_radius)
        } else {
            straight_path(&points)
        };

        let style = PathStyle::from_pairs([("fill", options.fill_color.as_str()), ("stroke", "none")]);
        document.paths.push(SvgPath::new(path, style));
    }

    Ok(document)
}
