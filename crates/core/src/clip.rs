//! Polygon ring clipping to an axis-aligned rectangle.
//!
//! [`clip_ring`] runs the clipper on one flat coordinate ring. The `geo`
//! wrappers ([`clip_polygon`], [`clip_multipolygon`], [`clip_geometry`])
//! clip every ring of a polygon with its own winding and reassemble the
//! pieces into polygons.
//!
//! # Algorithm
//!
//! 1. **Scan**: every subject edge is tested against the four region axes.
//!    Crossings are spliced into both the subject and the region sequences,
//!    in order along the edge and along the axis. Inbound crossings are
//!    recorded in a [`Registry`].
//! 2. **Resolve**: a subject with every vertex strictly inside is returned
//!    as given. With no inbound crossings the result is either the whole
//!    rectangle (the subject covers it) or nothing.
//! 3. **Walk**: from each unconsumed inbound crossing, follow the subject
//!    until it leaves the region, then the region until the subject enters
//!    again, and so on until the start is reached. Each walk emits one ring.

use geo::{
    BooleanOps, Contains, Geometry, InteriorPoint, Line, LineString, MultiPolygon, Polygon, Rect,
};

use crate::geom::{distinct_points, flatten, points_from_flat, Point, WindingOrder};
use crate::intersect::{Crossing, Registry};
use crate::region::{Axis, Region};
use crate::ring::Direction;
use crate::subject::Subject;
use crate::{Error, Result};

/// Clip a flat `[x0, y0, x1, y1, ...]` ring to the rectangle spanned by `min` and `max`.
///
/// `winding` is the vertex order of `subject`; output rings keep it. The
/// subject may be given open or closed.
///
/// Returns zero or more rings in the same flat layout, without a repeated
/// closing vertex. A subject lying entirely inside the rectangle is returned
/// exactly as given.
///
/// # Errors
///
/// [`Error::MalformedInput`] if the subject has an odd number of
/// coordinates, a non-finite coordinate, or fewer than three vertices.
///
/// # Examples
///
/// ```
/// use tileclip_core::{clip_ring, Point, WindingOrder};
///
/// let min = Point { x: 0.0, y: 0.0 };
/// let max = Point { x: 10.0, y: 10.0 };
///
/// // Fully outside
/// let rings = clip_ring(WindingOrder::Clockwise, &[20.0, 20.0, 20.0, 30.0, 30.0, 20.0], min, max).unwrap();
/// assert!(rings.is_empty());
/// ```
pub fn clip_ring(
    winding: WindingOrder,
    subject: &[f64],
    min: Point,
    max: Point,
) -> Result<Vec<Vec<f64>>> {
    Ok(Clipper::new(winding, subject, min, max)?.run())
}

/// A candidate crossing found on one subject edge.
#[derive(Debug, Clone, Copy)]
struct Hit {
    point: Point,
    axis: Axis,
    direction: Direction,
    /// Squared distance from the edge start; orders hits along the edge.
    distance: f64,
}

/// Which sequence a walk is currently following.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Track {
    Subject,
    Region,
}

struct Clipper<'a> {
    input: &'a [f64],
    subject: Subject,
    region: Region,
    registry: Registry,
}

impl<'a> Clipper<'a> {
    fn new(winding: WindingOrder, input: &'a [f64], min: Point, max: Point) -> Result<Self> {
        Ok(Self {
            input,
            subject: Subject::new(winding, input)?,
            region: Region::new(winding, min, max),
            registry: Registry::new(),
        })
    }

    fn run(mut self) -> Vec<Vec<f64>> {
        if !self.subject.has_area() {
            log::debug!("subject has zero area; nothing to keep");
            return Vec::new();
        }

        if self.scan() {
            log::debug!("subject lies inside the clip region");
            return vec![self.input.to_vec()];
        }

        if self.registry.is_empty() {
            return self.enclosed_region().into_iter().collect();
        }

        let rings = self.walk_all();
        log::debug!(
            "walked {} inbound crossings into {} rings",
            self.registry.len(),
            rings.len()
        );
        rings
    }

    /// Splice every crossing into both sequences.
    ///
    /// Returns whether every subject vertex is strictly inside the region.
    fn scan(&mut self) -> bool {
        let mut all_inside = true;
        for pair in self.subject.pairs() {
            let edge = self.subject.edge(pair);
            if !self.region.contains(edge.start) {
                all_inside = false;
            }

            let mut after = pair.start;
            for hit in self.crossings_on(edge) {
                after = self.splice(after, hit);
            }
        }
        all_inside
    }

    /// Crossings of `edge` with the region boundary, ordered along the edge.
    fn crossings_on(&self, edge: Line<f64>) -> Vec<Hit> {
        let mut hits: Vec<Hit> = Vec::with_capacity(2);
        for axis in self.region.axes() {
            let Some(point) = axis.intersect(edge) else {
                continue;
            };
            let direction = if axis.is_inward(edge) {
                Direction::Inward
            } else {
                Direction::Outward
            };
            if !self.region.admits(point, edge, direction) {
                continue;
            }
            // Through a corner, both axes report the same point.
            if hits.iter().any(|h| h.point == point) {
                continue;
            }
            let offset = point - edge.start;
            hits.push(Hit {
                point,
                axis: *axis,
                direction,
                distance: offset.x * offset.x + offset.y * offset.y,
            });
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Insert one crossing into both sequences and link the two nodes.
    ///
    /// A boundary vertex crossed both ways collapses into one inward node,
    /// unless it is reflex: there the subject really leaves and re-enters,
    /// and each crossing gets its own pair of nodes.
    ///
    /// Returns the subject node, which the next crossing on the same edge follows.
    fn splice(&mut self, after: usize, hit: Hit) -> usize {
        let s = self.subject.insert_between(after, hit.point);
        let (s, r) = match self.subject.ring().node(s).crossing() {
            Some((existing, twin)) if existing != hit.direction && self.subject.is_reflex(s) => {
                log::trace!("pinch at ({}, {})", hit.point.x, hit.point.y);
                (
                    self.subject.insert_pinch(s, hit.direction),
                    self.region.insert_pinch(twin, hit.direction),
                )
            }
            _ => (s, self.region.insert_between(&hit.axis, hit.point)),
        };
        let direction = self.subject.mark_crossing(s, hit.direction, r);
        self.region.mark_crossing(r, direction, s);

        log::trace!(
            "{:?} crossing at ({}, {}) on axis {} (subject node {}, region node {})",
            direction,
            hit.point.x,
            hit.point.y,
            hit.axis.index(),
            s,
            r
        );

        if direction == Direction::Inward {
            self.registry.push_inbound(Crossing {
                point: hit.point,
                subject: s,
                region: r,
            });
        }
        s
    }

    /// The whole region, when the subject never enters it but covers it.
    fn enclosed_region(&self) -> Option<Vec<f64>> {
        if let Some(corner) = self
            .region
            .sentinel_points()
            .into_iter()
            .find(|corner| !self.subject.contains(*corner))
        {
            log::debug!(
                "no inbound crossings and corner ({}, {}) is outside the subject; nothing to keep",
                corner.x,
                corner.y
            );
            return None;
        }

        let ring = self.region.line_string();
        let points: Vec<Point> = points_from_flat(&ring).collect();
        if distinct_points(&points) < 3 {
            log::debug!("clip region is degenerate; nothing to keep");
            return None;
        }
        log::debug!("subject covers the clip region");
        Some(ring)
    }

    fn walk_all(&mut self) -> Vec<Vec<f64>> {
        let mut rings = Vec::new();
        let mut starts = self.registry.starts();
        while let Some(start) = starts.next_unconsumed(&self.registry) {
            self.registry.consume(start.subject);
            if let Some(ring) = self.walk(start) {
                rings.push(ring);
            }
        }
        rings
    }

    /// Trace one output ring from an inbound crossing back to itself.
    fn walk(&mut self, start: Crossing) -> Option<Vec<f64>> {
        let budget = self.subject.ring().len() + self.region.ring().len();
        let mut points = vec![start.point];
        let mut track = Track::Subject;
        let mut cursor = start.subject;

        for _ in 0..=budget {
            let ring = match track {
                Track::Subject => self.subject.ring(),
                Track::Region => self.region.ring(),
            };
            cursor = ring.next(cursor);
            let node = ring.node(cursor);

            let Some((direction, twin)) = node.crossing() else {
                push_distinct(&mut points, node.point);
                continue;
            };

            let back_at_start = match track {
                Track::Subject => cursor == start.subject,
                Track::Region => cursor == start.region,
            };
            if back_at_start {
                return close_ring(points);
            }

            push_distinct(&mut points, node.point);
            let subject_node = match track {
                Track::Subject => cursor,
                Track::Region => twin,
            };
            self.registry.consume(subject_node);

            match (direction, track) {
                (Direction::Inward, Track::Region) => {
                    track = Track::Subject;
                    cursor = twin;
                }
                (Direction::Outward, Track::Subject) => {
                    track = Track::Region;
                    cursor = twin;
                }
                _ => {}
            }
        }

        log::warn!(
            "walk from ({}, {}) did not close within {} steps; dropping ring",
            start.point.x,
            start.point.y,
            budget
        );
        None
    }
}

fn push_distinct(points: &mut Vec<Point>, point: Point) {
    if points.last() != Some(&point) {
        points.push(point);
    }
}

/// Drop a trailing copy of the first point and reject rings that enclose nothing.
fn close_ring(mut points: Vec<Point>) -> Option<Vec<f64>> {
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if distinct_points(&points) < 3 {
        log::debug!("dropping walked ring with fewer than 3 distinct points");
        return None;
    }
    Some(flatten(&points))
}

/// Clip one closed `geo` ring, detecting its winding.
///
/// Rings with zero signed area are skipped.
pub fn clip_line_string(ring: &LineString<f64>, bounds: Rect<f64>) -> Result<Vec<LineString<f64>>> {
    let coords: Vec<f64> = ring.coords().flat_map(|c| [c.x, c.y]).collect();
    let Some(winding) = WindingOrder::of_flat(&coords) else {
        log::debug!("skipping ring with zero area");
        return Ok(Vec::new());
    };

    let rings = clip_ring(winding, &coords, bounds.min(), bounds.max())?;
    Ok(rings
        .iter()
        .map(|r| LineString::from(points_from_flat(r).collect::<Vec<_>>()))
        .collect())
}

/// Clip a polygon, holes included, to `bounds`.
///
/// Holes strictly inside the rectangle are attached to the clipped piece
/// containing them. Holes reaching the rectangle boundary are subtracted
/// from the pieces.
///
/// Returns `None` when nothing of the polygon lies inside `bounds`.
pub fn clip_polygon(polygon: &Polygon<f64>, bounds: Rect<f64>) -> Result<Option<MultiPolygon<f64>>> {
    let shells: Vec<Polygon<f64>> = clip_line_string(polygon.exterior(), bounds)?
        .into_iter()
        .map(|ring| Polygon::new(ring, vec![]))
        .collect();
    if shells.is_empty() {
        return Ok(None);
    }

    let mut pieces = MultiPolygon::new(shells);
    let mut cuts: Vec<Polygon<f64>> = Vec::new();

    for hole in polygon.interiors() {
        for ring in clip_line_string(hole, bounds)? {
            if !ring.coords().all(|c| strictly_inside(&bounds, *c)) {
                cuts.push(Polygon::new(ring, vec![]));
                continue;
            }
            let Some(anchor) = Polygon::new(ring.clone(), vec![]).interior_point() else {
                continue;
            };
            match pieces.0.iter_mut().find(|piece| piece.contains(&anchor)) {
                Some(piece) => piece.interiors_push(ring),
                None => log::debug!("hole lies outside every clipped piece; dropping it"),
            }
        }
    }

    if !cuts.is_empty() {
        pieces = pieces.difference(&MultiPolygon::new(cuts));
    }

    Ok((!pieces.0.is_empty()).then_some(pieces))
}

/// Clip every polygon of a multipolygon, collecting the pieces.
pub fn clip_multipolygon(
    multi: &MultiPolygon<f64>,
    bounds: Rect<f64>,
) -> Result<Option<MultiPolygon<f64>>> {
    let mut pieces = Vec::new();
    for polygon in &multi.0 {
        if let Some(clipped) = clip_polygon(polygon, bounds)? {
            pieces.extend(clipped.0);
        }
    }
    Ok((!pieces.is_empty()).then(|| MultiPolygon::new(pieces)))
}

/// Clip an areal geometry to `bounds`.
///
/// A single surviving piece comes back as a `Polygon`, several as a
/// `MultiPolygon`.
///
/// # Errors
///
/// [`Error::UnsupportedGeometry`] for points, lines and collections.
pub fn clip_geometry(geometry: &Geometry<f64>, bounds: Rect<f64>) -> Result<Option<Geometry<f64>>> {
    let clipped = match geometry {
        Geometry::Polygon(polygon) => clip_polygon(polygon, bounds)?,
        Geometry::MultiPolygon(multi) => clip_multipolygon(multi, bounds)?,
        Geometry::Rect(rect) => clip_polygon(&rect.to_polygon(), bounds)?,
        Geometry::Triangle(triangle) => clip_polygon(&triangle.to_polygon(), bounds)?,
        other => {
            return Err(Error::UnsupportedGeometry(format!(
                "{} is not areal",
                geometry_name(other)
            )))
        }
    };

    Ok(clipped.map(|mut pieces| match pieces.0.len() {
        1 => Geometry::Polygon(pieces.0.remove(0)),
        _ => Geometry::MultiPolygon(pieces),
    }))
}

fn strictly_inside(bounds: &Rect<f64>, point: Point) -> bool {
    let (min, max) = (bounds.min(), bounds.max());
    point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
