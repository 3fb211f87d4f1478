//! Geometry primitives shared by the subject ring and the clip region.
//!
//! Points are `geo::Coord<f64>` and compare with exact coordinate equality.
//! No epsilon is applied anywhere in the clipper.

use std::fmt;

use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{Coord, Line};

/// A 2D point. Equality is exact coordinate equality.
pub type Point = Coord<f64>;

/// Vertex ordering of a ring (y axis pointing up).
///
/// The winding fixes which side of a directed edge is the interior: the
/// right-hand side for clockwise rings, the left-hand side for
/// counter-clockwise ones. Subject and region must use the same winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

impl WindingOrder {
    /// Winding of a ring from the sign of its shoelace area.
    ///
    /// Returns `None` when the signed area is zero (empty or collinear rings).
    pub fn of_points(points: &[Point]) -> Option<Self> {
        let area = twice_signed_area(points);
        if area > 0.0 {
            Some(Self::CounterClockwise)
        } else if area < 0.0 {
            Some(Self::Clockwise)
        } else {
            None
        }
    }

    /// Winding of a ring given as flat `[x0, y0, x1, y1, ...]` coordinates.
    pub fn of_flat(coords: &[f64]) -> Option<Self> {
        let points: Vec<Point> = points_from_flat(coords).collect();
        Self::of_points(&points)
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// The orientation of `(a, b, p)` when `p` is on the interior side of `a -> b`.
    pub fn interior(self) -> Orientation {
        match self {
            Self::Clockwise => Orientation::Clockwise,
            Self::CounterClockwise => Orientation::CounterClockwise,
        }
    }
}

impl fmt::Display for WindingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "clockwise"),
            Self::CounterClockwise => write!(f, "counter-clockwise"),
        }
    }
}

/// Twice the signed shoelace area; positive for counter-clockwise rings.
fn twice_signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Iterate a flat `[x0, y0, x1, y1, ...]` slice as points.
///
/// A trailing unpaired value is ignored; callers validate the length first.
pub fn points_from_flat(coords: &[f64]) -> impl Iterator<Item = Point> + '_ {
    coords.chunks_exact(2).map(|c| Coord { x: c[0], y: c[1] })
}

/// Flatten points back into `[x0, y0, x1, y1, ...]`.
pub fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Turn direction of `a -> b -> c`, computed with robust predicates.
#[inline]
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    RobustKernel::orient2d(a, b, c)
}

#[inline]
fn cross(u: Point, v: Point) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Intersection point of two closed segments.
///
/// Only crossings count: collinear (including overlapping) segments never
/// intersect. Touching at an endpoint does. When either segment is
/// axis-parallel, its fixed coordinate is copied into the result exactly, so
/// points computed against a rectangle edge lie exactly on it.
pub fn segment_intersect(a: Line<f64>, b: Line<f64>) -> Option<Point> {
    let o1 = orientation(a.start, a.end, b.start);
    let o2 = orientation(a.start, a.end, b.end);
    if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
        return None;
    }
    let o3 = orientation(b.start, b.end, a.start);
    let o4 = orientation(b.start, b.end, a.end);
    if o1 == o2 || o3 == o4 {
        return None;
    }

    let r = a.delta();
    let s = b.delta();
    let t = cross(b.start - a.start, s) / cross(r, s);
    let mut point = a.start + r * t;

    if s.x == 0.0 {
        point.x = b.start.x;
    }
    if s.y == 0.0 {
        point.y = b.start.y;
    }
    if r.x == 0.0 {
        point.x = a.start.x;
    }
    if r.y == 0.0 {
        point.y = a.start.y;
    }
    Some(point)
}

/// Number of distinct points, comparing coordinates exactly (`-0.0 == 0.0`).
pub fn distinct_points(points: &[Point]) -> usize {
    let mut seen = std::collections::HashSet::with_capacity(points.len());
    for p in points {
        seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()));
    }
    seen.len()
}
