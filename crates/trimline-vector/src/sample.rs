use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point};

/// Accuracy of the per segment arc length estimate.
const ARCLEN_ACCURACY: f64 = 1e-6;

/// A closed ring of points approximating a path.
///
/// The last point equals the first one whenever the ring is not empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledPolygon {
    points: Vec<Point>,
}

impl SampledPolygon {
    /// Create a ring from points, appending the first point if the ring is open.
    pub fn new(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// The points of the ring, closing point included.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the ring and return its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Number of points, closing point included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct points, counting stops at three.
    pub fn distinct_count(&self) -> usize {
        let mut distinct: Vec<Point> = Vec::new();
        for p in &self.points {
            if !distinct.contains(p) {
                distinct.push(*p);
                if distinct.len() == 3 {
                    return 3;
                }
            }
        }
        distinct.len()
    }
}

/// Sample `n` points along a path.
///
/// Sample `i` is taken at the global parameter `i / n`. The global parameter is
/// split over the segments in proportion to their arc length, then the segment
/// is evaluated analytically at the matching local parameter, so lines are
/// sampled uniformly and curves at uniform parameter steps. Sub-paths are visited in order
/// as if they were one curve. The ring is closed by repeating the first sample.
///
/// A path without any segment yields `n` copies of its start point, an empty
/// path an empty polygon.
///
/// # Example
///
/// ```
/// use kurbo::{BezPath, Point};
/// use trimline_vector::sample::sample_path;
///
/// let mut path = BezPath::new();
/// path.move_to((0.0, 0.0));
/// path.line_to((10.0, 0.0));
/// path.line_to((10.0, 10.0));
/// path.line_to((0.0, 10.0));
/// path.close_path();
///
/// let ring = sample_path(&path, 8);
/// assert_eq!(ring.len(), 9);
/// assert_eq!(ring.points()[2], Point::new(10.0, 0.0));
/// ```
pub fn sample_path(path: &BezPath, n: usize) -> SampledPolygon {
    if n == 0 {
        return SampledPolygon::default();
    }

    let segments: Vec<PathSeg> = path.segments().collect();
    if segments.is_empty() {
        let start = path.elements().iter().find_map(|el| match el {
            PathEl::MoveTo(p) => Some(*p),
            _ => None,
        });
        return match start {
            Some(p) => SampledPolygon::new(vec![p; n]),
            None => SampledPolygon::default(),
        };
    }

    let lengths: Vec<f64> = segments
        .iter()
        .map(|seg| seg.arclen(ARCLEN_ACCURACY))
        .collect();
    let total: f64 = lengths.iter().sum();
    let fractions: Vec<f64> = if total > 0.0 {
        lengths.iter().map(|l| l / total).collect()
    } else {
        vec![1.0 / segments.len() as f64; segments.len()]
    };

    let mut points = Vec::with_capacity(n + 1);
    let (mut index, mut start) = (0, 0.0);
    for i in 0..n {
        let global = i as f64 / n as f64;
        while index + 1 < segments.len() && global >= start + fractions[index] {
            start += fractions[index];
            index += 1;
        }

        let t = if fractions[index] > 0.0 {
            ((global - start) / fractions[index]).clamp(0.0, 1.0)
        } else {
            0.0
        };
        points.push(segments[index].eval(t));
    }

    SampledPolygon::new(points)
}
