use std::fmt;
use std::path::Path;

use kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape};

use crate::error::VectorError;
use crate::reconstruct::path_data;
use crate::style::PathStyle;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Flattening tolerance used when converting basic shapes to paths.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Attributes that describe geometry rather than style.
const GEOMETRY_ATTRIBUTES: [&str; 16] = [
    "d", "x", "y", "width", "height", "cx", "cy", "r", "rx", "ry", "x1", "y1", "x2", "y2",
    "points", "style",
];

/// One drawable path of a document and its presentation attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    /// The path geometry.
    pub path: BezPath,
    /// The fill, stroke and other attributes of the path.
    pub style: PathStyle,
}

impl SvgPath {
    /// Create a path with a style.
    pub fn new(path: BezPath, style: PathStyle) -> Self {
        Self { path, style }
    }
}

/// A flat SVG document: the root attributes and every drawable element as a path.
///
/// Parsing visits every `path`, `rect`, `circle`, `ellipse`, `line`, `polyline`
/// and `polygon` element in document order. Groups, transforms and text are not
/// interpreted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgDocument {
    /// Attributes of the root `<svg>` element, e.g. `width`, `height`, `viewBox`.
    pub attributes: Vec<(String, String)>,
    /// The drawable paths in document order.
    pub paths: Vec<SvgPath>,
}

impl SvgDocument {
    /// An empty document with the given root attributes.
    pub fn new(attributes: Vec<(String, String)>) -> Self {
        Self {
            attributes,
            paths: Vec::new(),
        }
    }

    /// Value of the root attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parse a document from its text.
    ///
    /// # Example
    ///
    /// ```
    /// use trimline_vector::document::SvgDocument;
    ///
    /// let doc = SvgDocument::parse(
    ///     r#"<svg xmlns="http://www.w3.org/2000/svg" width="20"><path d="M0 0 L10 0 L10 10 Z" fill="black"/></svg>"#,
    /// ).unwrap();
    /// assert_eq!(doc.attribute("width"), Some("20"));
    /// assert_eq!(doc.paths.len(), 1);
    /// ```
    pub fn parse(text: &str) -> Result<Self, VectorError> {
        let xml = roxmltree::Document::parse(text)?;
        let root = xml.root_element();
        if root.tag_name().name() != "svg" {
            return Err(VectorError::NotSvg(root.tag_name().name().to_string()));
        }

        let attributes = root
            .attributes()
            .filter(|attr| attr.namespace().is_none())
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();

        let mut paths = Vec::new();
        for node in root.descendants().filter(|n| n.is_element()) {
            let ns = node.tag_name().namespace();
            if ns.is_some() && ns != Some(SVG_NAMESPACE) {
                continue;
            }

            let Some(path) = element_path(&node)? else {
                continue;
            };
            paths.push(SvgPath::new(path, element_style(&node)));
        }

        log::debug!("parsed svg document with {} paths", paths.len());

        Ok(Self { attributes, paths })
    }

    /// Read and parse a document from a file.
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, VectorError> {
        let text = std::fs::read_to_string(file_path)?;
        Self::parse(&text)
    }

    /// Serialize the document to SVG text.
    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }

    /// Serialize the document into a file.
    pub fn write_file(&self, file_path: impl AsRef<Path>) -> Result<(), VectorError> {
        std::fs::write(file_path, self.to_svg_string())?;
        Ok(())
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        write!(f, r#"<svg xmlns="{SVG_NAMESPACE}""#)?;
        for (name, value) in &self.attributes {
            if name != "xmlns" {
                write!(f, r#" {name}="{}""#, escape(value))?;
            }
        }
        writeln!(f, ">")?;

        for svg_path in &self.paths {
            if svg_path.path.elements().is_empty() {
                continue;
            }
            write!(f, r#"  <path d="{}""#, path_data(&svg_path.path))?;
            for (name, value) in svg_path.style.iter() {
                write!(f, r#" {name}="{}""#, escape(value))?;
            }
            writeln!(f, "/>")?;
        }

        writeln!(f, "</svg>")
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn element_style(node: &roxmltree::Node) -> PathStyle {
    let mut style = PathStyle::new();
    for attr in node.attributes() {
        if attr.namespace().is_none() && !GEOMETRY_ATTRIBUTES.contains(&attr.name()) {
            style.set(attr.name(), attr.value());
        }
    }
    if let Some(declarations) = node.attribute("style") {
        style.merge_declarations(declarations);
    }
    style
}

/// Parse a length such as `12`, `12.5` or `12px`.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse().ok()
}

fn length(node: &roxmltree::Node, name: &str) -> Option<f64> {
    node.attribute(name).and_then(parse_length)
}

fn parse_points(value: &str) -> Vec<Point> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map_while(|s| s.parse().ok())
        .collect();
    numbers
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    path
}

/// Convert a drawable element to a path, `None` for other or empty elements.
fn element_path(node: &roxmltree::Node) -> Result<Option<BezPath>, VectorError> {
    let at = |name: &str| length(node, name).unwrap_or(0.0);

    let path = match node.tag_name().name() {
        "path" => {
            let data = node.attribute("d").unwrap_or_default();
            if data.trim().is_empty() {
                return Ok(None);
            }
            BezPath::from_svg(data).map_err(|e| VectorError::PathData {
                data: data.to_string(),
                message: e.to_string(),
            })?
        }
        "rect" => {
            let (x, y, w, h) = (at("x"), at("y"), at("width"), at("height"));
            if w <= 0.0 || h <= 0.0 {
                return Ok(None);
            }
            // a missing corner radius takes the value of the other one
            let (rx, ry) = match (length(node, "rx"), length(node, "ry")) {
                (Some(rx), Some(ry)) => (rx, ry),
                (Some(r), None) | (None, Some(r)) => (r, r),
                (None, None) => (0.0, 0.0),
            };
            let radius = rx.min(ry).min(w / 2.0).min(h / 2.0);
            if radius > 0.0 {
                RoundedRect::new(x, y, x + w, y + h, radius).to_path(SHAPE_TOLERANCE)
            } else {
                Rect::new(x, y, x + w, y + h).to_path(SHAPE_TOLERANCE)
            }
        }
        "circle" => {
            let r = at("r");
            if r <= 0.0 {
                return Ok(None);
            }
            Circle::new((at("cx"), at("cy")), r).to_path(SHAPE_TOLERANCE)
        }
        "ellipse" => {
            let (rx, ry) = (at("rx"), at("ry"));
            if rx <= 0.0 || ry <= 0.0 {
                return Ok(None);
            }
            Ellipse::new((at("cx"), at("cy")), (rx, ry), 0.0).to_path(SHAPE_TOLERANCE)
        }
        "line" => polyline(
            &[Point::new(at("x1"), at("y1")), Point::new(at("x2"), at("y2"))],
            false,
        ),
        "polyline" | "polygon" => {
            let points = parse_points(node.attribute("points").unwrap_or_default());
            if points.len() < 2 {
                return Ok(None);
            }
            polyline(&points, node.tag_name().name() == "polygon")
        }
        _ => return Ok(None),
    };

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    const DOC: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     width="200" height="100" viewBox="0 0 200 100">
  <g fill="red">
    <path d="M10 10 H 90 V 90 H 10 Z" fill="#000" id="body"/>
    <rect x="100" y="10" width="50px" height="20" style="fill: black; stroke:none"/>
    <circle cx="50" cy="50" r="0"/>
    <polygon points="0,0 10,0 10,10"/>
    <text x="0" y="0">label</text>
  </g>
</svg>"##;

    #[test]
    fn test_parse_shapes_and_attributes() -> Result<(), VectorError> {
        let doc = SvgDocument::parse(DOC)?;

        assert_eq!(doc.attribute("viewBox"), Some("0 0 200 100"));
        assert_eq!(doc.attributes.len(), 3);

        // zero radius circle and text are skipped
        assert_eq!(doc.paths.len(), 3);
        assert_eq!(doc.paths[0].style.fill(), Some("#000"));
        assert_eq!(doc.paths[0].style.get("id"), Some("body"));
        assert_eq!(doc.paths[1].style.fill(), Some("black"));
        assert_eq!(doc.paths[1].style.stroke(), Some("none"));

        let rect = doc.paths[1].path.bounding_box();
        assert_eq!((rect.x0, rect.y0, rect.x1, rect.y1), (100.0, 10.0, 150.0, 30.0));

        let polygon = doc.paths[2].path.elements();
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon[3], PathEl::ClosePath);
        Ok(())
    }

    #[test]
    fn test_serialize_round_trip() -> Result<(), VectorError> {
        let doc = SvgDocument::parse(DOC)?;
        let text = doc.to_svg_string();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains(r#"viewBox="0 0 200 100""#));

        let again = SvgDocument::parse(&text)?;
        assert_eq!(again.attributes, doc.attributes);
        assert_eq!(again.paths.len(), doc.paths.len());
        for (a, b) in again.paths.iter().zip(&doc.paths) {
            assert_eq!(a.style, b.style);
            assert_eq!(a.path.bounding_box(), b.path.bounding_box());
        }
        Ok(())
    }

    #[test]
    fn test_file_round_trip() -> Result<(), VectorError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("label.svg");

        let doc = SvgDocument::parse(DOC)?;
        doc.write_file(&file_path)?;
        let read = SvgDocument::from_file(&file_path)?;
        assert_eq!(read.attribute("viewBox"), Some("0 0 200 100"));
        assert_eq!(read.paths.len(), doc.paths.len());

        let missing = SvgDocument::from_file(tmp_dir.path().join("missing.svg"));
        assert!(matches!(missing, Err(VectorError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_attribute_values_are_escaped() -> Result<(), VectorError> {
        let mut doc = SvgDocument::new(vec![("data-note".into(), r#"a "b" & <c>"#.into())]);
        doc.paths.push(SvgPath::new(
            polyline(&[Point::ZERO, Point::new(1.0, 0.0), Point::new(1.0, 1.0)], true),
            PathStyle::from_pairs([("fill", "black")]),
        ));
        let again = SvgDocument::parse(&doc.to_svg_string())?;
        assert_eq!(again.attribute("data-note"), Some(r#"a "b" & <c>"#));
        Ok(())
    }

    #[test]
    fn test_rejects_non_svg_and_bad_data() {
        assert!(matches!(
            SvgDocument::parse("<html/>"),
            Err(VectorError::NotSvg(name)) if name == "html"
        ));
        assert!(matches!(
            SvgDocument::parse("<svg><path d='M 0 0 X 5 5'/></svg>"),
            Err(VectorError::PathData { .. })
        ));
        assert!(matches!(
            SvgDocument::parse("<svg>"),
            Err(VectorError::Xml(_))
        ));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_length(" 12px"), Some(12.0));
        assert_eq!(parse_length("3.5"), Some(3.5));
        assert_eq!(parse_length("50%"), None);
        assert_eq!(
            parse_points("0,0 1 2,3,4 5"),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0), Point::new(3.0, 4.0)]
        );
    }
}
