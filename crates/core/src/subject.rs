//! The subject ring: the polygon boundary being clipped.

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Line, LineString, Polygon};

use crate::geom::{orientation, points_from_flat, Point, WindingOrder};
use crate::ring::{Direction, Ring};
use crate::{Error, Result};

/// Subject polygon vertices as a circular sequence that crossings are spliced into.
#[derive(Debug, Clone)]
pub struct Subject {
    ring: Ring,
    vertices: usize,
    winding: WindingOrder,
    /// False when the signed area is zero.
    has_area: bool,
    /// The ring as built, for containment tests that must ignore crossings.
    outline: Polygon<f64>,
}

impl Subject {
    /// Build a subject from flat `[x0, y0, x1, y1, ...]` coordinates.
    ///
    /// The ring may be given open or closed; an explicit closing vertex equal
    /// to the first is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedInput`] if the coordinate count is odd, a coordinate
    /// is not finite, or fewer than three vertices remain.
    pub fn new(winding: WindingOrder, coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(Error::MalformedInput(format!(
                "odd number of coordinates ({})",
                coords.len()
            )));
        }
        if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
            return Err(Error::MalformedInput(format!(
                "non-finite coordinate at index {}",
                index
            )));
        }

        let mut points: Vec<Point> = points_from_flat(coords).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(Error::MalformedInput(format!(
                "need at least 3 vertices, got {}",
                points.len()
            )));
        }

        let detected = WindingOrder::of_points(&points);
        if let Some(actual) = detected.filter(|actual| *actual != winding) {
            log::warn!(
                "subject declared {} but its vertices wind {}; clipped rings will be wrong",
                winding,
                actual
            );
        }

        let outline = Polygon::new(LineString::from(points.clone()), vec![]);
        Ok(Self {
            vertices: points.len(),
            ring: Ring::new(points),
            winding,
            has_area: detected.is_some(),
            outline,
        })
    }

    /// Number of original vertices; crossings are not counted.
    pub fn len(&self) -> usize {
        self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices == 0
    }

    /// Whether the ring has a non-zero signed area.
    pub fn has_area(&self) -> bool {
        self.has_area
    }

    /// Whether the original vertex at `index` turns away from the interior.
    ///
    /// Inserted nodes are never reflex.
    pub fn is_reflex(&self, index: usize) -> bool {
        if index >= self.vertices {
            return false;
        }
        let n = self.vertices;
        let prev = self.ring.point((index + n - 1) % n);
        let next = self.ring.point((index + 1) % n);
        orientation(prev, self.ring.point(index), next) == self.winding.reverse().interior()
    }

    /// Consecutive vertex pairs (edges), one lap in ring order.
    pub fn pairs(&self) -> Pairs {
        Pairs {
            index: 0,
            len: self.vertices,
        }
    }

    /// The segment joining a pair's original vertices.
    pub fn edge(&self, pair: Pair) -> Line<f64> {
        Line::new(self.ring.point(pair.start), self.ring.point(pair.end))
    }

    /// Splice `point` in right after node `after`, reusing a node already there.
    pub fn insert_between(&mut self, after: usize, point: Point) -> usize {
        self.ring.insert_after(after, point)
    }

    pub fn mark_crossing(&mut self, index: usize, direction: Direction, twin: usize) -> Direction {
        self.ring.mark_crossing(index, direction, twin)
    }

    /// Add a second node at the point of `index` for a pinch crossing.
    ///
    /// The subject leaves at a pinch before it re-enters, so an outward node
    /// goes before `index` and an inward one after it.
    pub fn insert_pinch(&mut self, index: usize, direction: Direction) -> usize {
        let point = self.ring.point(index);
        match direction {
            Direction::Inward => self.ring.link_after(index, point),
            Direction::Outward => self.ring.link_before(index, point),
        }
    }

    /// Whether `point` is inside the subject or on its boundary.
    ///
    /// Uses the original vertices only.
    pub fn contains(&self, point: Point) -> bool {
        self.outline.coordinate_position(&point) != CoordPos::Outside
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }
}

/// One edge of the subject, as indices of its two original vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub start: usize,
    pub end: usize,
}

/// Edges of the subject, starting at vertex 0 and wrapping back to it once.
///
/// Holds only its position, so the subject can be mutated while iterating.
#[derive(Debug, Clone)]
pub struct Pairs {
    index: usize,
    len: usize,
}

impl Iterator for Pairs {
    type Item = Pair;

    fn next(&mut self) -> Option<Pair> {
        if self.index >= self.len {
            return None;
        }
        let start = self.index;
        self.index += 1;
        Some(Pair {
            start,
            end: self.index % self.len,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn triangle() -> Subject {
        Subject::new(WindingOrder::Clockwise, &[2.0, 2.0, 2.0, 8.0, 8.0, 2.0]).unwrap()
    }

    // ========== Construction Tests ==========

    #[test]
    fn test_new_rejects_odd_coordinate_count() {
        let result = Subject::new(WindingOrder::Clockwise, &[0.0, 0.0, 1.0, 1.0, 2.0]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_new_rejects_too_few_vertices() {
        let result = Subject::new(WindingOrder::Clockwise, &[0.0, 0.0, 1.0, 1.0]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));

        // Closed ring of two distinct vertices
        let result = Subject::new(WindingOrder::Clockwise, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_new_rejects_non_finite() {
        let result = Subject::new(WindingOrder::Clockwise, &[0.0, 0.0, f64::NAN, 1.0, 2.0, 0.0]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_new_drops_closing_vertex() {
        let subject = Subject::new(
            WindingOrder::Clockwise,
            &[0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 0.0, 0.0],
        )
        .unwrap();
        assert_eq!(subject.len(), 3);
        assert!(subject.has_area());
    }

    #[test]
    fn test_new_accepts_zero_area() {
        let subject =
            Subject::new(WindingOrder::Clockwise, &[-5.0, 5.0, 15.0, 5.0, 5.0, 5.0]).unwrap();
        assert_eq!(subject.len(), 3);
        assert!(!subject.has_area());
    }

    // ========== Vertex Shape Tests ==========

    #[test]
    fn test_is_reflex_follows_winding() {
        // A notch at (5, 0) reaching down from the top.
        let notch = [-5.0, -5.0, 15.0, -5.0, 15.0, 8.0, 5.0, 0.0, -5.0, 8.0];
        let ccw = Subject::new(WindingOrder::CounterClockwise, &notch).unwrap();
        assert!(ccw.is_reflex(3));
        assert!(!ccw.is_reflex(2));

        let reversed: Vec<f64> = notch.chunks_exact(2).rev().flatten().copied().collect();
        let cw = Subject::new(WindingOrder::Clockwise, &reversed).unwrap();
        assert!(cw.is_reflex(1));
        assert!(!cw.is_reflex(0));
    }

    #[test]
    fn test_insert_pinch_orders_outward_first() {
        let mut subject = triangle();
        let inward = subject.insert_pinch(1, Direction::Inward);
        let outward = subject.insert_pinch(1, Direction::Outward);
        assert!(!subject.is_reflex(inward));
        let order: Vec<usize> = subject.ring().lap(0).collect();
        assert_eq!(order, vec![0, outward, 1, inward, 2]);
        assert_eq!(subject.ring().point(outward), subject.ring().point(inward));
    }

    // ========== Pair Iteration Tests ==========

    #[test]
    fn test_pairs_wrap_once() {
        let subject = triangle();
        let pairs: Vec<(usize, usize)> = subject.pairs().map(|p| (p.start, p.end)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_pairs_survive_insertions() {
        let mut subject = triangle();
        let mut seen = Vec::new();
        for pair in subject.pairs() {
            let edge = subject.edge(pair);
            subject.insert_between(pair.start, (edge.start + edge.end) / 2.0);
            seen.push(pair);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(subject.len(), 3);
        assert_eq!(subject.ring().len(), 6);
        assert_eq!(
            subject.edge(seen[0]),
            Line::new(coord! { x: 2.0, y: 2.0 }, coord! { x: 2.0, y: 8.0 })
        );
    }

    // ========== Containment Tests ==========

    #[test]
    fn test_contains_interior_and_boundary() {
        let subject = triangle();
        assert!(subject.contains(coord! { x: 3.0, y: 3.0 }));
        assert!(subject.contains(coord! { x: 2.0, y: 5.0 }));
        assert!(subject.contains(coord! { x: 2.0, y: 2.0 }));
        assert!(!subject.contains(coord! { x: 7.0, y: 7.0 }));
    }

    #[test]
    fn test_contains_ignores_insertions() {
        let mut subject = triangle();
        // An inserted point off the original boundary must not change the outline.
        subject.insert_between(0, coord! { x: 0.0, y: 5.0 });
        assert!(!subject.contains(coord! { x: 1.0, y: 5.0 }));
    }
}
