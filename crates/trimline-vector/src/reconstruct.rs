use kurbo::{BezPath, PathEl, Point};

/// A closed path through `points`: a move, one line per further point and a close.
///
/// An empty slice gives an empty path.
pub fn straight_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };

    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    path
}

/// One straight closed sub-path per ring.
pub fn rings_path(rings: &[Vec<Point>]) -> BezPath {
    let mut path = BezPath::new();
    for ring in rings {
        path.extend(straight_path(ring).elements().iter().copied());
    }
    path
}

/// The point at distance `r` from vertex `index` towards its next (or previous) neighbour.
fn toward(points: &[Point], index: usize, forward: bool, r: f64) -> Point {
    let n = points.len();
    let center = points[index];
    let target = if forward {
        points[(index + 1) % n]
    } else {
        points[(index + n - 1) % n]
    };

    let v = target - center;
    let length = v.hypot();
    if length == 0.0 {
        return center;
    }
    center + v * (r / length)
}

/// A closed polygon whose corners are replaced by quadratic curves.
///
/// Each vertex is cut back by `radius` along both of its edges, clamped to half
/// of the shorter edge so neighbouring curves never overlap. The path runs
/// straight between the cut points and turns through a quadratic curve whose
/// control point is the original vertex. Fewer than three points give an empty
/// path.
///
/// # Example
///
/// ```
/// use kurbo::{PathEl, Point};
/// use trimline_vector::reconstruct::rounded_path;
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let path = rounded_path(&square, 2.0);
/// let quads = path.elements().iter().filter(|el| matches!(el, PathEl::QuadTo(..))).count();
/// assert_eq!(quads, 4);
/// ```
pub fn rounded_path(points: &[Point], radius: f64) -> BezPath {
    let n = points.len();
    let mut path = BezPath::new();
    if n < 3 {
        return path;
    }

    // edges[i] runs from vertex i to vertex i + 1
    let edges: Vec<f64> = (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .collect();
    let radii: Vec<f64> = (0..n)
        .map(|i| {
            let limit = edges[(i + n - 1) % n].min(edges[i]) / 2.0;
            radius.min(limit)
        })
        .collect();

    path.move_to(toward(points, 0, true, radii[0]));
    for i in 0..n {
        let next = (i + 1) % n;
        path.line_to(toward(points, next, false, radii[next]));
        path.quad_to(points[next], toward(points, next, true, radii[next]));
    }
    path.close_path();
    path
}

/// Round to two decimals and drop trailing zeros.
fn coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}

fn pt(p: Point) -> String {
    format!("{},{}", coord(p.x), coord(p.y))
}

/// SVG path data for a path, with coordinates rounded to two decimals.
///
/// # Example
///
/// ```
/// use kurbo::Point;
/// use trimline_vector::reconstruct::{path_data, straight_path};
///
/// let path = straight_path(&[Point::new(0.0, 0.0), Point::new(10.5, 0.0), Point::new(3.0, 4.126)]);
/// assert_eq!(path_data(&path), "M 0,0 L 10.5,0 L 3,4.13 Z");
/// ```
pub fn path_data(path: &BezPath) -> String {
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => format!("M {}", pt(p)),
            PathEl::LineTo(p) => format!("L {}", pt(p)),
            PathEl::QuadTo(c, p) => format!("Q {} {}", pt(c), pt(p)),
            PathEl::CurveTo(c1, c2, p) => format!("C {} {} {}", pt(c1), pt(c2), pt(p)),
            PathEl::ClosePath => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
