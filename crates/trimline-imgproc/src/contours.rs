use std::ops::{Add, Sub};

use trimline_image::Image;

/// Kind of border a traced contour follows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    /// Perimeter of foreground regions
    Outer,
    /// Perimeter of background regions enclosed by foreground.
    Hole,
}

/// An integer pixel coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// x-coordinate (column).
    pub x: i32,
    /// y-coordinate (row).
    pub y: i32,
}

impl Point {
    /// Construct a point at (x, y).
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// The border for any region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// The points on the border.
    pub points: Vec<Point>,
    /// The type of the border. Outer or Hole.
    pub border_type: BorderType,
    /// Index of the enclosing border, `None` for borders touching the background frame.
    pub parent: Option<usize>,
}

impl Contour {
    /// Constructor for contour.
    pub fn new(points: Vec<Point>, border_type: BorderType, parent: Option<usize>) -> Self {
        Contour {
            points,
            border_type,
            parent,
        }
    }

    /// Whether this is an outer border not enclosed by any other region.
    pub fn is_external(&self) -> bool {
        self.border_type == BorderType::Outer && self.parent.is_none()
    }
}

// Neighbor offsets in clockwise order (y grows downwards): E, SE, S, SW, W, NW, N, NE.
const DIRECTIONS: [Point; 8] = [
    Point::new(1, 0),
    Point::new(1, 1),
    Point::new(0, 1),
    Point::new(-1, 1),
    Point::new(-1, 0),
    Point::new(-1, -1),
    Point::new(0, -1),
    Point::new(1, -1),
];

const EAST: usize = 0;

fn direction_index(diff: Point) -> usize {
    DIRECTIONS.iter().position(|&d| d == diff).unwrap_or(EAST)
}

/// Finds the borders of the foreground regions of the image. All pixels with
/// intensity greater than `threshold` are treated as belonging to the foreground.
///
/// Border following after Suzuki and Abe. The image is framed by one background
/// pixel internally, so regions touching the canvas edge are traced like any
/// other. An outer border starts at its top-left pixel and runs down its left side.
///
/// # Arguments
///
/// * `src` - A reference to the source grayscale image.
/// * `threshold` - The threshold for treating a pixel as a foreground pixel.
///
/// # Returns
///
/// All borders in raster scan order of their starting pixel, with their hierarchy.
pub fn find_contours(src: &Image<u8, 1>, threshold: u8) -> Vec<Contour> {
    let width = src.width() + 2;
    let height = src.height() + 2;
    let mut image_values = vec![0i32; height * width];
    let mut contours: Vec<Contour> = Vec::new();
    let mut nbd = 1i32; // new-border label

    let at = |p: Point| p.x as usize + p.y as usize * width;

    for (y, row) in src.as_slice().chunks_exact(src.width().max(1)).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v > threshold {
                image_values[(x + 1) + (y + 1) * width] = 1;
            }
        }
    }

    for y in 1..height as i32 - 1 {
        let mut lnbd = 1i32;

        for x in 1..width as i32 - 1 {
            let curr = Point::new(x, y);
            let value = image_values[at(curr)];
            if value == 0 {
                continue;
            }

            let west = image_values[at(Point::new(x - 1, y))];
            let east = image_values[at(Point::new(x + 1, y))];

            let maybe_border = if value == 1 && west == 0 {
                Some((Point::new(x - 1, y), BorderType::Outer))
            } else if value >= 1 && east == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some((Point::new(x + 1, y), BorderType::Hole))
            } else {
                None
            };

            if let Some((adj, border_type)) = maybe_border {
                nbd += 1;

                let parent = if lnbd.abs() >= 2 {
                    let parent_index = (lnbd.abs() - 2) as usize;
                    let parent_contour = &contours[parent_index];
                    if border_type == parent_contour.border_type {
                        parent_contour.parent
                    } else {
                        Some(parent_index)
                    }
                } else {
                    None
                };

                let mut points = trace_border(&mut image_values, width, curr, adj, nbd);

                // if hole border, reverse points to make counter clockwise.
                if border_type == BorderType::Hole {
                    points.reverse();
                }

                // back to the caller's coordinates
                for p in points.iter_mut() {
                    *p = *p - Point::new(1, 1);
                }

                contours.push(Contour::new(points, border_type, parent));
            }

            let value = image_values[at(curr)];
            if value != 1 {
                lnbd = value.abs();
            }
        }
    }

    contours
}

/// Follow one border starting at `start`, whose background neighbor is `adj`.
///
/// Visited pixels are labelled `nbd`, or `-nbd` where the border runs along the
/// right side of the region.
fn trace_border(
    image_values: &mut [i32],
    width: usize,
    start: Point,
    adj: Point,
    nbd: i32,
) -> Vec<Point> {
    let at = |p: Point| p.x as usize + p.y as usize * width;
    let mut points = Vec::new();

    // clockwise search for the first foreground neighbor
    let first_dir = direction_index(adj - start);
    let pos1 = (0..8)
        .map(|k| start + DIRECTIONS[(first_dir + k) % 8])
        .find(|&p| image_values[at(p)] != 0);

    let Some(pos1) = pos1 else {
        // isolated pixel
        image_values[at(start)] = -nbd;
        points.push(start);
        return points;
    };

    let mut pos2 = pos1;
    let mut pos3 = start;

    loop {
        points.push(pos3);

        // counter clockwise search starting right after pos2
        let back_dir = direction_index(pos2 - pos3);
        let mut is_right_edge = false;
        let mut pos4 = pos2;
        for k in 1..=8 {
            let dir = (back_dir + 8 - k) % 8;
            let candidate = pos3 + DIRECTIONS[dir];
            if image_values[at(candidate)] != 0 {
                pos4 = candidate;
                break;
            }
            if dir == EAST {
                is_right_edge = true;
            }
        }

        if is_right_edge {
            image_values[at(pos3)] = -nbd;
        } else if image_values[at(pos3)] == 1 {
            image_values[at(pos3)] = nbd;
        }

        if pos4 == start && pos3 == pos1 {
            break;
        }
        pos2 = pos3;
        pos3 = pos4;
    }

    points
}

/// Finds the outermost borders only, holes and regions nested inside holes are skipped.
pub fn find_external_contours(src: &Image<u8, 1>, threshold: u8) -> Vec<Contour> {
    find_contours(src, threshold)
        .into_iter()
        .filter(Contour::is_external)
        .collect()
}

/// Compress horizontal, vertical and diagonal runs of a closed border to their end points.
///
/// # Example
///
/// ```
/// use trimline_imgproc::contours::{chain_approx_simple, Point};
///
/// let ring = [
///     Point::new(0, 0), Point::new(1, 0), Point::new(2, 0),
///     Point::new(2, 1), Point::new(2, 2), Point::new(1, 1),
/// ];
/// let corners = chain_approx_simple(&ring);
/// assert_eq!(corners, vec![Point::new(0, 0), Point::new(2, 0), Point::new(2, 2)]);
/// ```
pub fn chain_approx_simple(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            points[i] - prev != next - points[i]
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}

/// Area enclosed by a closed polygon (shoelace formula), always non negative.
pub fn contour_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let twice_area: i64 = (0..n)
        .map(|i| {
            let p = points[i];
            let q = points[(i + 1) % n];
            p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
        })
        .sum();

    twice_area.abs() as f64 / 2.0
}

/// Length of a polyline, including the closing edge when `closed` is set.
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let edges = if closed { n } else { n - 1 };
    (0..edges)
        .map(|i| {
            let d = points[(i + 1) % n] - points[i];
            (d.x as f64).hypot(d.y as f64)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimline_image::{Image, ImageError, ImageSize};

    fn fill(
        img: &mut Image<u8, 1>,
        x0: usize,
        x1: usize,
        y0: usize,
        y1: usize,
        v: u8,
    ) -> Result<(), ImageError> {
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.set_pixel(x, y, 0, v)?;
            }
        }
        Ok(())
    }

    fn canvas(side: usize) -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: side,
                height: side,
            },
            vec![0; side * side],
        )
    }

    #[test]
    fn test_basic_contours() -> Result<(), ImageError> {
        let mut img = canvas(10)?;
        fill(&mut img, 2, 7, 2, 7, 255)?;
        fill(&mut img, 4, 5, 4, 5, 0)?;

        let contours = find_contours(&img, 0);
        assert_eq!(contours.len(), 2);

        let outer = &contours[0];
        assert_eq!(outer.border_type, BorderType::Outer);
        assert_eq!(outer.parent, None);
        assert_eq!(outer.points[0], Point::new(2, 2));
        // down the left side first
        assert_eq!(outer.points[1], Point::new(2, 3));
        for corner in [(7, 2), (7, 7), (2, 7)] {
            assert!(outer.points.contains(&Point::new(corner.0, corner.1)));
        }

        let hole = &contours[1];
        assert_eq!(hole.border_type, BorderType::Hole);
        assert_eq!(hole.parent, Some(0));
        assert!(hole.points.contains(&Point::new(3, 4)));
        assert!(hole.points.contains(&Point::new(6, 4)));
        assert!(hole.points.contains(&Point::new(5, 6)));
        assert!(hole.points.contains(&Point::new(5, 3)));
        Ok(())
    }

    #[test]
    fn test_single_pixel() -> Result<(), ImageError> {
        let mut img = canvas(5)?;
        img.set_pixel(2, 2, 0, 255)?;

        let contours = find_contours(&img, 0);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points, vec![Point::new(2, 2)]);
        assert_eq!(contours[0].border_type, BorderType::Outer);
        Ok(())
    }

    #[test]
    fn test_nested_contours() -> Result<(), ImageError> {
        let mut img = canvas(20)?;
        fill(&mut img, 2, 17, 2, 17, 255)?;
        fill(&mut img, 5, 14, 5, 14, 0)?;
        fill(&mut img, 8, 11, 8, 11, 255)?;

        let contours = find_contours(&img, 0);
        assert_eq!(contours.len(), 3);
        assert_eq!(contours[0].border_type, BorderType::Outer);
        assert_eq!(contours[1].border_type, BorderType::Hole);
        assert_eq!(contours[1].parent, Some(0));
        assert_eq!(contours[2].border_type, BorderType::Outer);
        assert_eq!(contours[2].parent, Some(1));

        let external = find_external_contours(&img, 0);
        assert_eq!(external.len(), 1);
        assert_eq!(external[0], contours[0]);
        Ok(())
    }

    #[test]
    fn test_regions_touching_the_border() -> Result<(), ImageError> {
        let mut img = canvas(8)?;
        fill(&mut img, 0, 2, 0, 7, 255)?;
        fill(&mut img, 5, 7, 3, 4, 255)?;

        let external = find_external_contours(&img, 0);
        assert_eq!(external.len(), 2);

        let left = chain_approx_simple(&external[0].points);
        assert_eq!(
            left,
            vec![
                Point::new(0, 0),
                Point::new(0, 7),
                Point::new(2, 7),
                Point::new(2, 0)
            ]
        );
        assert_eq!(contour_area(&left), 14.0);
        Ok(())
    }

    #[test]
    fn test_block_area_and_length() -> Result<(), ImageError> {
        let mut img = canvas(20)?;
        fill(&mut img, 5, 14, 5, 14, 200)?;

        let external = find_external_contours(&img, 0);
        assert_eq!(external.len(), 1);
        let corners = chain_approx_simple(&external[0].points);
        assert_eq!(corners.len(), 4);
        assert_eq!(contour_area(&corners), 81.0);
        assert_eq!(arc_length(&corners, true), 36.0);
        assert_eq!(arc_length(&corners, false), 27.0);
        // the compressed ring has the same length as the full trace
        assert_eq!(arc_length(&external[0].points, true), 36.0);
        Ok(())
    }

    #[test]
    fn test_threshold_and_empty_image() -> Result<(), ImageError> {
        let mut img = canvas(6)?;
        fill(&mut img, 1, 3, 1, 3, 100)?;
        assert_eq!(find_contours(&img, 100).len(), 0);
        assert_eq!(find_contours(&img, 99).len(), 1);

        let empty = Image::<u8, 1>::new([0, 0].into(), vec![])?;
        assert!(find_contours(&empty, 0).is_empty());
        Ok(())
    }
}
