//! Index-addressed circular vertex sequences.
//!
//! The subject ring and the clip region each keep their vertices in a
//! [`Ring`]: an arena of nodes linked into a cycle by index. Indices never
//! change once assigned, so a crossing refers to its twin node in the other
//! ring by index alone.

use crate::geom::Point;

/// Whether a crossing enters or leaves the clip region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inward,
    Outward,
}

/// What a ring node stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// A plain vertex.
    Vertex,
    /// A point where the subject boundary crosses the region boundary.
    ///
    /// `twin` is the index of the node at the same point in the other ring.
    Crossing { direction: Direction, twin: usize },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub point: Point,
    pub kind: NodeKind,
    next: usize,
    prev: usize,
}

impl Node {
    /// Direction and twin index, if this node is a crossing.
    pub fn crossing(&self) -> Option<(Direction, usize)> {
        match self.kind {
            NodeKind::Crossing { direction, twin } => Some((direction, twin)),
            NodeKind::Vertex => None,
        }
    }
}

/// A circular, doubly linked sequence of points stored in an arena.
///
/// The points passed to [`Ring::new`] occupy indices `0..n` in order;
/// inserted nodes are appended after them.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    nodes: Vec<Node>,
}

impl Ring {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        let points: Vec<Point> = points.into_iter().collect();
        let n = points.len();
        let nodes = points
            .into_iter()
            .enumerate()
            .map(|(i, point)| Node {
                point,
                kind: NodeKind::Vertex,
                next: (i + 1) % n,
                prev: (i + n - 1) % n,
            })
            .collect();
        Self { nodes }
    }

    /// Total node count, inserted nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn point(&self, index: usize) -> Point {
        self.nodes[index].point
    }

    pub fn next(&self, index: usize) -> usize {
        self.nodes[index].next
    }

    pub fn prev(&self, index: usize) -> usize {
        self.nodes[index].prev
    }

    /// Insert `point` immediately after `after` and return its index.
    ///
    /// If `after` or its successor already sits at `point`, that node is
    /// returned and nothing is inserted.
    pub fn insert_after(&mut self, after: usize, point: Point) -> usize {
        if self.nodes[after].point == point {
            return after;
        }
        let next = self.nodes[after].next;
        if self.nodes[next].point == point {
            return next;
        }
        self.link_after(after, point)
    }

    /// Insert a new node for `point` right after `after`, even if a
    /// neighbour already sits at the same point.
    pub fn link_after(&mut self, after: usize, point: Point) -> usize {
        let next = self.nodes[after].next;
        let index = self.nodes.len();
        self.nodes.push(Node {
            point,
            kind: NodeKind::Vertex,
            next,
            prev: after,
        });
        self.nodes[after].next = index;
        self.nodes[next].prev = index;
        index
    }

    /// Insert a new node for `point` right before `before`.
    pub fn link_before(&mut self, before: usize, point: Point) -> usize {
        self.link_after(self.nodes[before].prev, point)
    }

    /// Tag a node as a crossing and return the direction it ends up with.
    ///
    /// An inward tag is never downgraded: a vertex the subject touches from
    /// inside is reached by an outward crossing and then left by an inward
    /// one, and must stay a walk start. Vertices where the subject leaves and
    /// re-enters get a second node from [`Ring::link_after`] or
    /// [`Ring::link_before`] instead.
    pub fn mark_crossing(&mut self, index: usize, direction: Direction, twin: usize) -> Direction {
        let node = &mut self.nodes[index];
        if let NodeKind::Crossing {
            direction: Direction::Inward,
            ..
        } = node.kind
        {
            return Direction::Inward;
        }
        node.kind = NodeKind::Crossing { direction, twin };
        direction
    }

    /// Indices of one full lap, starting at `start`.
    pub fn lap(&self, start: usize) -> Lap<'_> {
        Lap {
            ring: self,
            start,
            next: (start < self.nodes.len()).then_some(start),
        }
    }

    /// Current points in ring order, starting from the first original point.
    pub fn points(&self) -> Vec<Point> {
        self.lap(0).map(|i| self.nodes[i].point).collect()
    }
}

/// Iterator over one lap of a [`Ring`].
#[derive(Debug, Clone)]
pub struct Lap<'a> {
    ring: &'a Ring,
    start: usize,
    next: Option<usize>,
}

impl Iterator for Lap<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        let following = self.ring.next(current);
        self.next = (following != self.start).then_some(following);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn square() -> Ring {
        Ring::new([
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 10.0 },
            coord! { x: 10.0, y: 10.0 },
            coord! { x: 10.0, y: 0.0 },
        ])
    }

    #[test]
    fn test_ring_is_circular_both_ways() {
        let ring = square();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.next(3), 0);
        assert_eq!(ring.prev(0), 3);
        assert_eq!(ring.lap(2).collect::<Vec<_>>(), vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_insert_after_splices_between_neighbours() {
        let mut ring = square();
        let i = ring.insert_after(0, coord! { x: 0.0, y: 5.0 });
        assert_eq!(i, 4);
        assert_eq!(ring.next(0), 4);
        assert_eq!(ring.next(4), 1);
        assert_eq!(ring.prev(1), 4);
        assert_eq!(ring.prev(4), 0);
        assert_eq!(ring.points()[1], coord! { x: 0.0, y: 5.0 });
    }

    #[test]
    fn test_insert_after_reuses_existing_points() {
        let mut ring = square();
        assert_eq!(ring.insert_after(0, coord! { x: 0.0, y: 10.0 }), 1);
        assert_eq!(ring.insert_after(0, coord! { x: 0.0, y: 0.0 }), 0);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_link_inserts_duplicates() {
        let mut ring = square();
        let after = ring.link_after(1, coord! { x: 0.0, y: 10.0 });
        let before = ring.link_before(1, coord! { x: 0.0, y: 10.0 });
        assert_eq!((after, before), (4, 5));
        assert_eq!(ring.lap(0).collect::<Vec<_>>(), vec![0, 5, 1, 4, 2, 3]);
        assert_eq!(ring.prev(4), 1);
        assert_eq!(ring.next(5), 1);
        assert_eq!(ring.points()[1], ring.points()[2]);
    }

    #[test]
    fn test_mark_crossing_keeps_inward() {
        let mut ring = square();
        assert_eq!(ring.mark_crossing(1, Direction::Outward, 7), Direction::Outward);
        assert_eq!(ring.mark_crossing(1, Direction::Inward, 7), Direction::Inward);
        assert_eq!(ring.mark_crossing(1, Direction::Outward, 7), Direction::Inward);
        assert_eq!(ring.node(1).crossing(), Some((Direction::Inward, 7)));
        assert_eq!(ring.node(0).crossing(), None);
    }

    #[test]
    fn test_empty_ring_lap() {
        let ring = Ring::default();
        assert!(ring.is_empty());
        assert!(ring.points().is_empty());
    }
}
