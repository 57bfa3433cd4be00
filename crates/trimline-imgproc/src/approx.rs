use crate::contours::Point;

fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / len
}

fn squared_distance(a: Point, b: Point) -> i64 {
    let d = b - a;
    d.x as i64 * d.x as i64 + d.y as i64 * d.y as i64
}

/// Index of the point of `points` farthest from `from`, first one on ties.
fn farthest_from(points: &[Point], from: Point) -> usize {
    let mut best = 0;
    let mut best_dist = -1;
    for (i, &p) in points.iter().enumerate() {
        let d = squared_distance(from, p);
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Mark the vertices of the chain `start -> end` (indices modulo `n`) that
/// Douglas-Peucker keeps for `epsilon`.
fn simplify_chain(points: &[Point], start: usize, end: usize, epsilon: f64, keep: &mut [bool]) {
    let n = points.len();
    let mut stack = vec![(start, end)];

    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let a = points[first % n];
        let b = points[last % n];
        let mut max_dist = 0.0;
        let mut max_idx = first;
        for k in first + 1..last {
            let d = distance_to_line(points[k % n], a, b);
            if d > max_dist {
                max_dist = d;
                max_idx = k;
            }
        }

        if max_dist > epsilon {
            keep[max_idx % n] = true;
            stack.push((max_idx, last));
            stack.push((first, max_idx));
        }
    }
}

/// Approximate a polyline with fewer vertices (Douglas-Peucker).
///
/// Every dropped vertex lies within `epsilon` of the simplified polyline. For a
/// closed curve the two vertices farthest apart are kept as anchors and the two
/// chains between them are simplified independently; the result starts at the
/// first anchor.
///
/// # Example
///
/// ```
/// use trimline_imgproc::approx::approx_poly_dp;
/// use trimline_imgproc::contours::Point;
///
/// let ring = [
///     Point::new(0, 0), Point::new(0, 5), Point::new(0, 10), Point::new(5, 10),
///     Point::new(10, 10), Point::new(10, 5), Point::new(10, 0), Point::new(5, 0),
/// ];
/// let square = approx_poly_dp(&ring, 1.0, true);
/// assert_eq!(square.len(), 4);
/// ```
pub fn approx_poly_dp(points: &[Point], epsilon: f64, closed: bool) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];

    if closed {
        let a = farthest_from(points, points[0]);
        let b = farthest_from(points, points[a]);
        if a == b {
            // every point coincides
            return vec![points[a]];
        }

        let (lo, hi) = (a.min(b), a.max(b));
        keep[lo] = true;
        keep[hi] = true;
        simplify_chain(points, lo, hi, epsilon, &mut keep);
        simplify_chain(points, hi, lo + n, epsilon, &mut keep);

        (0..n)
            .map(|k| (a + k) % n)
            .filter(|&i| keep[i])
            .map(|i| points[i])
            .collect()
    } else {
        keep[0] = true;
        keep[n - 1] = true;
        simplify_chain(points, 0, n - 1, epsilon, &mut keep);

        points
            .iter()
            .zip(keep)
            .filter(|(_, k)| *k)
            .map(|(&p, _)| p)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contours::{arc_length, contour_area};

    /// Unit step trace of an axis aligned rectangle, clockwise from its top-left corner.
    fn rect_trace(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        let mut pts = Vec::new();
        pts.extend((x0..x1).map(|x| Point::new(x, y0)));
        pts.extend((y0..y1).map(|y| Point::new(x1, y)));
        pts.extend((x0 + 1..=x1).rev().map(|x| Point::new(x, y1)));
        pts.extend((y0 + 1..=y1).rev().map(|y| Point::new(x0, y)));
        pts
    }

    #[test]
    fn test_rectangle_trace_reduces_to_corners() {
        let trace = rect_trace(10, 10, 100, 100);
        let eps = 4.0 * 0.0005 * arc_length(&trace, true);
        let poly = approx_poly_dp(&trace, eps, true);

        assert_eq!(poly.len(), 4);
        for corner in [(10, 10), (100, 10), (100, 100), (10, 100)] {
            assert!(poly.contains(&Point::new(corner.0, corner.1)));
        }
        assert_eq!(contour_area(&poly), 8100.0);
    }

    #[test]
    fn test_noise_within_tolerance_is_dropped() {
        let mut trace = rect_trace(0, 0, 40, 20);
        // one pixel bump on the top edge
        trace[20] = Point::new(20, -1);

        let poly = approx_poly_dp(&trace, 1.5, true);
        assert_eq!(poly.len(), 4);

        let fine = approx_poly_dp(&trace, 0.5, true);
        assert!(fine.contains(&Point::new(20, -1)));
    }

    #[test]
    fn test_open_polyline_keeps_end_points() {
        let line = [
            Point::new(0, 0),
            Point::new(1, 1),
            Point::new(2, 0),
            Point::new(3, 1),
            Point::new(10, 0),
        ];
        let simplified = approx_poly_dp(&line, 2.0, false);
        assert_eq!(simplified, vec![Point::new(0, 0), Point::new(10, 0)]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(approx_poly_dp(&[], 1.0, true).is_empty());
        let same = [Point::new(3, 3); 5];
        assert_eq!(approx_poly_dp(&same, 1.0, true), vec![Point::new(3, 3)]);
        let pair = [Point::new(0, 0), Point::new(1, 0)];
        assert_eq!(approx_poly_dp(&pair, 1.0, true), pair.to_vec());
    }
}
