use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use geo::algorithm::buffer::{Buffer, BufferStyle, LineJoin};
use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon, Validation};
use kurbo::Point;
use trimline_core::{DegradeReason, Outcome};

use crate::sample::SampledPolygon;

/// Default miter limit, as a ratio of the offset distance.
pub const DEFAULT_MITER_LIMIT: f64 = 2.0;

/// Offset regions smaller than this fraction of the input area are treated as vanished.
const MIN_REGION_FRACTION: f64 = 1e-9;

/// What to keep when an offset splits a shape into several regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IslandPolicy {
    /// Keep only the region with the largest area.
    #[default]
    KeepLargest,
    /// Keep every region, largest first.
    KeepAll,
}

impl IslandPolicy {
    /// The kebab-case name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            IslandPolicy::KeepLargest => "keep-largest",
            IslandPolicy::KeepAll => "keep-all",
        }
    }
}

impl std::fmt::Display for IslandPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown island policy name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown island policy {0:?}, expected keep-largest or keep-all")]
pub struct ParseIslandPolicyError(pub String);

impl FromStr for IslandPolicy {
    type Err = ParseIslandPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "keep-largest" => Ok(IslandPolicy::KeepLargest),
            "keep-all" => Ok(IslandPolicy::KeepAll),
            _ => Err(ParseIslandPolicyError(s.to_string())),
        }
    }
}

/// Parameters of [`offset_polygon`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Corners whose miter would reach further than this ratio of the distance
    /// are clipped at that length. Values below `1` act as `1`.
    pub miter_limit: f64,
    /// Which regions survive a split.
    pub island_policy: IslandPolicy,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            miter_limit: DEFAULT_MITER_LIMIT,
            island_policy: IslandPolicy::default(),
        }
    }
}

/// The closed rings left after offsetting a polygon, largest area first.
///
/// Every ring repeats its first point at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetPolygon {
    rings: Vec<Vec<Point>>,
}

impl OffsetPolygon {
    /// Create an offset polygon from closed rings.
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        Self { rings }
    }

    /// The rings.
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// Consume and return the rings.
    pub fn into_rings(self) -> Vec<Vec<Point>> {
        self.rings
    }

    /// Whether there is no ring.
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Sum of the unsigned areas of the rings.
    pub fn area(&self) -> f64 {
        self.rings.iter().map(|ring| ring_polygon(ring).unsigned_area()).sum()
    }
}

fn ring_polygon(points: &[Point]) -> Polygon<f64> {
    let exterior: LineString<f64> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    Polygon::new(exterior, vec![])
}

/// The smallest corner angle, in radians, that a miter `limit` keeps sharp.
///
/// A corner of angle `a` has a miter of `distance / sin(a / 2)`.
fn miter_angle(limit: f64) -> f64 {
    2.0 * (1.0 / limit.max(1.0)).asin()
}

fn buffer_repaired(polygon: Polygon<f64>, distance: f64, miter_limit: f64) -> MultiPolygon<f64> {
    // zero distance normalization of bow ties and other invalid rings
    let repaired = if polygon.is_valid() {
        MultiPolygon::new(vec![polygon])
    } else {
        polygon.union(&MultiPolygon::<f64>::new(vec![]))
    };

    let style = BufferStyle::new(distance).line_join(LineJoin::Miter(miter_angle(miter_limit)));
    repaired.buffer_with_style(style)
}

/// Offset a closed ring by a signed `distance`, negative values shrinking it.
///
/// Self-intersecting rings are repaired first. Corners use mitered joins bounded
/// by [`OffsetOptions::miter_limit`]. When the offset splits the shape the
/// [`IslandPolicy`] decides which regions are kept. Only outer boundaries are
/// returned.
///
/// The result is degraded, carrying the input ring unchanged, when:
///
/// * the ring has fewer than three distinct points, or the geometry kernel fails
///   ([`DegradeReason::InvalidGeometry`]);
/// * nothing is left after the offset ([`DegradeReason::OffsetCollapsed`]).
///
/// # Example
///
/// ```
/// use kurbo::Point;
/// use trimline_vector::offset::{offset_polygon, OffsetOptions};
/// use trimline_vector::sample::SampledPolygon;
///
/// let square = SampledPolygon::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ]);
///
/// let shrunk = offset_polygon(&square, -2.0, &OffsetOptions::default());
/// assert!(!shrunk.is_degraded());
/// assert!((shrunk.value().area() - 36.0).abs() < 1e-3);
///
/// let gone = offset_polygon(&square, -6.0, &OffsetOptions::default());
/// assert!(gone.is_degraded());
/// ```
pub fn offset_polygon(
    polygon: &SampledPolygon,
    distance: f64,
    options: &OffsetOptions,
) -> Outcome<OffsetPolygon> {
    let fallback = |reason: DegradeReason| {
        log::warn!("offset by {distance} kept the input ring: {reason}");
        Outcome::Degraded {
            value: OffsetPolygon::new(vec![polygon.points().to_vec()]),
            reason,
        }
    };

    let distinct = polygon.distinct_count();
    if distinct < 3 {
        return fallback(DegradeReason::InvalidGeometry(format!(
            "ring has {distinct} distinct points"
        )));
    }

    let input = ring_polygon(polygon.points());
    let min_area = input.unsigned_area() * MIN_REGION_FRACTION;
    let miter_limit = options.miter_limit;
    let buffered = catch_unwind(AssertUnwindSafe(|| {
        buffer_repaired(input, distance, miter_limit)
    }));
    let regions = match buffered {
        Ok(regions) => regions,
        Err(_) => {
            return fallback(DegradeReason::InvalidGeometry(
                "geometry kernel panicked".to_string(),
            ))
        }
    };

    let mut regions: Vec<(f64, Polygon<f64>)> = regions
        .into_iter()
        .map(|p| (p.unsigned_area(), p))
        .filter(|(area, _)| *area > min_area && *area > 0.0)
        .collect();

    if regions.is_empty() {
        return fallback(DegradeReason::OffsetCollapsed { distance });
    }

    regions.sort_by(|a, b| b.0.total_cmp(&a.0));
    if regions.len() > 1 {
        log::debug!(
            "offset split the shape into {} regions, policy {}",
            regions.len(),
            options.island_policy
        );
    }
    if options.island_policy == IslandPolicy::KeepLargest {
        regions.truncate(1);
    }

    let rings = regions
        .iter()
        .map(|(_, p)| p.exterior().coords().map(|c| Point::new(c.x, c.y)).collect())
        .collect();

    Outcome::Complete(OffsetPolygon::new(rings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(points: &[(f64, f64)]) -> SampledPolygon {
        SampledPolygon::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn bounds(points: &[Point]) -> (f64, f64, f64, f64) {
        points.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }

    #[test]
    fn test_square_shrinks_and_grows() {
        let square = ring(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let options = OffsetOptions::default();

        let shrunk = offset_polygon(&square, -10.0, &options);
        assert!(!shrunk.is_degraded());
        let (x0, y0, x1, y1) = bounds(&shrunk.value().rings()[0]);
        assert_relative_eq!(x0, 10.0, epsilon = 1e-4);
        assert_relative_eq!(y0, 10.0, epsilon = 1e-4);
        assert_relative_eq!(x1, 90.0, epsilon = 1e-4);
        assert_relative_eq!(y1, 90.0, epsilon = 1e-4);

        // right angles stay sharp under a miter limit of 2
        let grown = offset_polygon(&square, 5.0, &options);
        assert_relative_eq!(grown.value().area(), 110.0 * 110.0, epsilon = 1e-2);
    }

    #[test]
    fn test_collapse_returns_input() {
        let square = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        for distance in [-5.0, -7.5, -100.0] {
            let outcome = offset_polygon(&square, distance, &OffsetOptions::default());
            assert_eq!(
                outcome.reason(),
                Some(&DegradeReason::OffsetCollapsed { distance })
            );
            assert_eq!(outcome.value().rings(), &[square.points().to_vec()]);
        }
    }

    #[test]
    fn test_degenerate_rings_degrade() {
        for points in [
            vec![],
            vec![(1.0, 1.0)],
            vec![(0.0, 0.0), (5.0, 5.0)],
            vec![(0.0, 0.0), (5.0, 5.0), (0.0, 0.0)],
        ] {
            let outcome = offset_polygon(&ring(&points), -1.0, &OffsetOptions::default());
            assert!(matches!(
                outcome.reason(),
                Some(DegradeReason::InvalidGeometry(_))
            ));
        }

        // collinear: three distinct points but no area
        let line = ring(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        assert!(offset_polygon(&line, -1.0, &OffsetOptions::default()).is_degraded());
    }

    #[test]
    fn test_bow_tie_is_repaired() {
        let bow_tie = ring(&[(0.0, 0.0), (40.0, 40.0), (40.0, 0.0), (0.0, 40.0)]);
        let options = OffsetOptions {
            island_policy: IslandPolicy::KeepAll,
            ..Default::default()
        };
        let outcome = offset_polygon(&bow_tie, -1.0, &options);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.value().rings().len(), 2);
        assert!(outcome.value().area() < 800.0);
    }

    #[test]
    fn test_island_policy() {
        // two lobes joined by a 2 unit wide neck
        let dumbbell = ring(&[
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 14.0),
            (40.0, 14.0),
            (40.0, 0.0),
            (60.0, 0.0),
            (60.0, 30.0),
            (40.0, 30.0),
            (40.0, 16.0),
            (30.0, 16.0),
            (30.0, 30.0),
            (0.0, 30.0),
        ]);

        let largest = offset_polygon(&dumbbell, -3.0, &OffsetOptions::default());
        assert_eq!(largest.value().rings().len(), 1);
        let (x0, _, x1, _) = bounds(&largest.value().rings()[0]);
        assert_relative_eq!(x0, 3.0, epsilon = 1e-4);
        assert_relative_eq!(x1, 27.0, epsilon = 1e-4);

        let all = offset_polygon(
            &dumbbell,
            -3.0,
            &OffsetOptions {
                island_policy: IslandPolicy::KeepAll,
                ..Default::default()
            },
        );
        let rings = all.value().rings();
        assert_eq!(rings.len(), 2);
        assert!(ring_polygon(&rings[0]).unsigned_area() >= ring_polygon(&rings[1]).unsigned_area());
    }

    #[test]
    fn test_near_zero_area_sliver() {
        let sliver = ring(&[(0.0, 0.0), (100.0, 0.0), (100.0, 1e-9)]);
        let outcome = offset_polygon(&sliver, -1.0, &OffsetOptions::default());
        assert!(outcome.is_degraded());
    }

    #[test]
    fn test_small_units_are_kept() {
        // a 0.05 x 0.05 square, as found in unit viewBoxes
        let square = ring(&[(0.0, 0.0), (0.05, 0.0), (0.05, 0.05), (0.0, 0.05)]);
        let outcome = offset_polygon(&square, -0.01, &OffsetOptions::default());
        assert!(!outcome.is_degraded());
        assert_relative_eq!(outcome.value().area(), 0.03 * 0.03, max_relative = 1e-3);
    }

    #[test]
    fn test_miter_angle() {
        assert_relative_eq!(miter_angle(2.0), std::f64::consts::FRAC_PI_3, epsilon = 1e-12);
        assert_relative_eq!(miter_angle(1.0), std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(miter_angle(0.5), std::f64::consts::PI, epsilon = 1e-12);
        assert!(miter_angle(1e6) < 1e-5);
    }

    #[test]
    fn test_right_angles_stay_sharp() {
        let square = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let grown = offset_polygon(&square, 5.0, &OffsetOptions::default());
        assert!(!grown.is_degraded());
        assert_relative_eq!(grown.value().area(), 400.0, max_relative = 1e-4);
        let (x0, y0, x1, y1) = bounds(&grown.value().rings()[0]);
        assert_relative_eq!(x0, -5.0, epsilon = 1e-4);
        assert_relative_eq!(y0, -5.0, epsilon = 1e-4);
        assert_relative_eq!(x1, 15.0, epsilon = 1e-4);
        assert_relative_eq!(y1, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_acute_corner_is_clipped() {
        // isosceles triangle with a 30 degree apex and 75 degree base corners
        let half_base = 100.0 * 15f64.to_radians().tan();
        let triangle = ring(&[(-half_base, 0.0), (half_base, 0.0), (0.0, 100.0)]);

        let grown = offset_polygon(&triangle, 2.0, &OffsetOptions::default());
        assert!(!grown.is_degraded());
        let (_, y0, _, y1) = bounds(&grown.value().rings()[0]);
        // an unlimited miter would reach 100 + 2 / sin(15deg), about 107.7
        assert!(y1 > 100.0 && y1 < 106.0, "apex reaches {y1}");
        assert_relative_eq!(y0, -2.0, epsilon = 1e-4);

        // a large enough limit keeps the apex sharp
        let sharp = offset_polygon(
            &triangle,
            2.0,
            &OffsetOptions {
                miter_limit: 10.0,
                ..Default::default()
            },
        );
        let (_, _, _, y1) = bounds(&sharp.value().rings()[0]);
        assert_relative_eq!(y1, 100.0 + 2.0 / 15f64.to_radians().sin(), max_relative = 1e-3);
    }

    #[test]
    fn test_reflex_corner_stays_sharp_when_shrinking() {
        let l_shape = ring(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 50.0),
            (50.0, 50.0),
            (50.0, 100.0),
            (0.0, 100.0),
        ]);
        let shrunk = offset_polygon(&l_shape, -5.0, &OffsetOptions::default());
        assert!(!shrunk.is_degraded());
        // 90 x 40 + 40 x 50, a beveled inner corner leaves more
        assert_relative_eq!(shrunk.value().area(), 5600.0, max_relative = 1e-5);
    }

    #[test]
    fn test_policy_names()-> Result<(), ParseIslandPolicyError> {
        assert_eq!("keep_all".parse::<IslandPolicy>()?, IslandPolicy::KeepAll);
        assert_eq!(IslandPolicy::default().to_string(), "keep-largest");
        assert!("largest".parse::<IslandPolicy>().is_err());
        Ok(())
    }
}
