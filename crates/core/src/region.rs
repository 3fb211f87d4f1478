//! The clip region: an axis-aligned rectangle walked as four directed axes.
//!
//! Corners are laid out in the region's winding order so the region is
//! traversed with the same orientation convention as the subject:
//!
//! ```text
//!   clockwise                counter-clockwise
//!
//!   1 ---> 2                 3 <--- 2
//!   ^      |                 |      ^
//!   |      v                 v      |
//!   0 <--- 3                 0 ---> 1
//! ```
//!
//! Corner `i` is ring node `i`, and axis `i` runs from corner `i` to corner `i + 1`.

use geo::kernels::Orientation;
use geo::{coord, Line, Rect};

use crate::geom::{flatten, orientation, segment_intersect, Point, WindingOrder};
use crate::ring::{Direction, Ring};

/// One directed edge of the clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    index: usize,
    start: Point,
    end: Point,
    interior: Orientation,
}

impl Axis {
    /// Position of this axis in the region, `0..4`.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    /// A point exactly on the axis line counts as outside.
    fn is_interior_side(&self, point: Point) -> bool {
        orientation(self.start, self.end, point) == self.interior
    }

    /// Whether a direction vector points from the exterior half-plane into the interior one.
    fn points_inward(&self, direction: Point) -> bool {
        orientation(self.start, self.end, self.start + direction) == self.interior
    }

    /// Where `edge` crosses this axis, if it does.
    ///
    /// The edge must go from one side of the axis line to the other; an
    /// endpoint lying on the line counts as outside, so an edge that only
    /// touches the line from outside never crosses it.
    pub fn intersect(&self, edge: Line<f64>) -> Option<Point> {
        if self.is_interior_side(edge.start) == self.is_interior_side(edge.end) {
            return None;
        }
        segment_intersect(edge, self.line())
    }

    /// Whether `edge` enters the region where it crosses this axis.
    pub fn is_inward(&self, edge: Line<f64>) -> bool {
        self.points_inward(edge.delta())
    }

    /// Distance from the axis start, measured along the axis.
    fn offset(&self, point: Point) -> f64 {
        (point.x - self.start.x).abs() + (point.y - self.start.y).abs()
    }
}

/// The clip rectangle, its axes, and the circular corner sequence crossings are spliced into.
#[derive(Debug, Clone)]
pub struct Region {
    bounds: Rect<f64>,
    axes: [Axis; 4],
    ring: Ring,
}

impl Region {
    /// Build the region spanned by `min` and `max`.
    ///
    /// The corners are normalised, so swapped corners describe the same rectangle.
    pub fn new(winding: WindingOrder, min: Point, max: Point) -> Self {
        let bounds = Rect::new(min, max);
        let (lo, hi) = (bounds.min(), bounds.max());
        let corners = match winding {
            WindingOrder::Clockwise => [
                lo,
                coord! { x: lo.x, y: hi.y },
                hi,
                coord! { x: hi.x, y: lo.y },
            ],
            WindingOrder::CounterClockwise => [
                lo,
                coord! { x: hi.x, y: lo.y },
                hi,
                coord! { x: lo.x, y: hi.y },
            ],
        };
        let axes = std::array::from_fn(|i| Axis {
            index: i,
            start: corners[i],
            end: corners[(i + 1) % 4],
            interior: winding.interior(),
        });

        Self {
            bounds,
            axes,
            ring: Ring::new(corners),
        }
    }

    /// The four axes in winding order. Each call starts over from the first.
    pub fn axes(&self) -> std::slice::Iter<'_, Axis> {
        self.axes.iter()
    }

    /// Whether `point` lies strictly inside the rectangle. The boundary is outside.
    pub fn contains(&self, point: Point) -> bool {
        let (lo, hi) = (self.bounds.min(), self.bounds.max());
        point.x > lo.x && point.x < hi.x && point.y > lo.y && point.y < hi.y
    }

    /// Whether an edge crossing the boundary at `point` really passes into
    /// (for `Inward`) or out of (for `Outward`) the open rectangle there.
    ///
    /// Crossings found through a single axis are always admitted unless
    /// `point` is a corner: an edge that merely grazes a corner, or runs
    /// along the boundary, crosses one axis line without ever being inside.
    pub fn admits(&self, point: Point, edge: Line<f64>, direction: Direction) -> bool {
        let heading = match direction {
            Direction::Inward => edge.delta(),
            Direction::Outward => -edge.delta(),
        };
        self.axes.iter().all(|axis| {
            let side = orientation(axis.start, axis.end, point);
            side == axis.interior || (side == Orientation::Collinear && axis.points_inward(heading))
        })
    }

    /// The four original corners, in winding order.
    pub fn sentinel_points(&self) -> [Point; 4] {
        self.axes.map(|axis| axis.start)
    }

    /// Splice `point` into the corner sequence at its place along `axis`.
    ///
    /// Nodes already on the axis stay ordered by distance from the axis start.
    /// A node already at `point`, corners included, is returned instead of
    /// inserting a duplicate.
    pub fn insert_between(&mut self, axis: &Axis, point: Point) -> usize {
        let end = (axis.index + 1) % 4;
        let target = axis.offset(point);

        let mut current = axis.index;
        if self.ring.point(current) == point {
            return current;
        }
        loop {
            let next = self.ring.next(current);
            let next_point = self.ring.point(next);
            if next_point == point {
                return next;
            }
            if next == end || axis.offset(next_point) > target {
                break;
            }
            current = next;
        }
        self.ring.insert_after(current, point)
    }

    pub fn mark_crossing(&mut self, index: usize, direction: Direction, twin: usize) -> Direction {
        self.ring.mark_crossing(index, direction, twin)
    }

    /// The current sequence, crossings included, as flat coordinates.
    pub fn line_string(&self) -> Vec<f64> {
        flatten(&self.ring.points())
    }

    /// Add a second node at the point of `index` for a pinch crossing.
    ///
    /// Walking the region, a pinch is reached on its inward node and left
    /// from its outward one, so an inward node goes before `index` and an
    /// outward one after it.
    pub fn insert_pinch(&mut self, index: usize, direction: Direction) -> usize {
        let point = self.ring.point(index);
        match direction {
            Direction::Inward => self.ring.link_before(index, point),
            Direction::Outward => self.ring.link_after(index, point),
        }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }
}
