//! WKB decoding into clip subjects.
//!
//! Polygon features usually arrive as Well-Known Binary. This module decodes
//! WKB into `geo::Geometry` and flattens polygon rings into the
//! `[x0, y0, x1, y1, ...]` layout taken by [`clip_ring`](crate::clip_ring).
//!
//! # Examples
//!
//! ```
//! use geo::{polygon, Geometry};
//! use tileclip_core::wkb::{geometry_to_wkb, subject_rings_from_wkb};
//!
//! let square = Geometry::Polygon(polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 0.0, y: 4.0),
//!     (x: 4.0, y: 4.0),
//!     (x: 4.0, y: 0.0),
//! ]);
//! let wkb = geometry_to_wkb(&square).unwrap();
//! let rings = subject_rings_from_wkb(&wkb).unwrap();
//!
//! assert_eq!(rings.len(), 1);
//! assert_eq!(rings[0], vec![0.0, 0.0, 0.0, 4.0, 4.0, 4.0, 4.0, 0.0, 0.0, 0.0]);
//! ```

use geo::{Geometry, LineString, Polygon};
use geozero::wkb::Wkb;
use geozero::{CoordDimensions, ToGeo, ToWkb};

use crate::{Error, Result};

/// Serialize a geometry to WKB bytes.
///
/// Uses standard OGC WKB format with XY coordinates (no Z or M dimensions).
pub fn geometry_to_wkb(geom: &Geometry<f64>) -> Result<Vec<u8>> {
    geom.to_wkb(CoordDimensions::xy())
        .map_err(|e| Error::GeometryEncode(e.to_string()))
}

/// Deserialize WKB bytes back to a geometry.
pub fn wkb_to_geometry(wkb: &[u8]) -> Result<Geometry<f64>> {
    Wkb(wkb.to_vec())
        .to_geo()
        .map_err(|e| Error::GeometryDecode(e.to_string()))
}

/// Every ring of an areal geometry as flat coordinates.
///
/// Each polygon contributes its exterior followed by its holes. Rings keep
/// their closing vertex and their stored winding.
///
/// # Errors
///
/// [`Error::UnsupportedGeometry`] for points, lines and collections.
pub fn subject_rings(geometry: &Geometry<f64>) -> Result<Vec<Vec<f64>>> {
    let mut rings = Vec::new();
    match geometry {
        Geometry::Polygon(polygon) => push_polygon(&mut rings, polygon),
        Geometry::MultiPolygon(multi) => {
            for polygon in &multi.0 {
                push_polygon(&mut rings, polygon);
            }
        }
        Geometry::Rect(rect) => push_polygon(&mut rings, &rect.to_polygon()),
        Geometry::Triangle(triangle) => push_polygon(&mut rings, &triangle.to_polygon()),
        _ => {
            return Err(Error::UnsupportedGeometry(
                "only polygonal geometries have subject rings".to_string(),
            ))
        }
    }
    Ok(rings)
}

/// Decode WKB and flatten its rings; see [`subject_rings`].
pub fn subject_rings_from_wkb(wkb: &[u8]) -> Result<Vec<Vec<f64>>> {
    subject_rings(&wkb_to_geometry(wkb)?)
}

fn push_polygon(rings: &mut Vec<Vec<f64>>, polygon: &Polygon<f64>) {
    rings.push(flat_ring(polygon.exterior()));
    rings.extend(polygon.interiors().iter().map(flat_ring));
}

fn flat_ring(ring: &LineString<f64>) -> Vec<f64> {
    ring.coords().flat_map(|c| [c.x, c.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, MultiPolygon};

    // ========== Decoding Tests ==========

    #[test]
    fn test_polygon_with_hole_round_trip() {
        let original = Geometry::Polygon(polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ],
            interiors: [
                [(x: 2.0, y: 2.0), (x: 2.0, y: 8.0), (x: 8.0, y: 8.0), (x: 8.0, y: 2.0)],
            ],
        ));
        let wkb = geometry_to_wkb(&original).expect("encode should succeed");
        let restored = wkb_to_geometry(&wkb).expect("decode should succeed");

        match restored {
            Geometry::Polygon(poly) => {
                assert_eq!(poly.exterior().0.len(), 5);
                assert_eq!(poly.interiors().len(), 1);
            }
            _ => panic!("Expected Polygon, got {:?}", restored),
        }
    }

    #[test]
    fn test_decode_invalid_wkb() {
        let result = wkb_to_geometry(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(Error::GeometryDecode(_))));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(wkb_to_geometry(&[]).is_err());
    }

    // ========== Subject Ring Tests ==========

    #[test]
    fn test_subject_rings_include_holes() {
        let holed = Geometry::Polygon(polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0)],
            interiors: [[(x: 6.0, y: 2.0), (x: 8.0, y: 2.0), (x: 8.0, y: 4.0)]],
        ));
        let rings = subject_rings(&holed).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0], vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0]);
        assert_eq!(rings[1], vec![6.0, 2.0, 8.0, 2.0, 8.0, 4.0, 6.0, 2.0]);
    }

    #[test]
    fn test_subject_rings_from_multipolygon_wkb() {
        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0)],
        ]));
        let wkb = geometry_to_wkb(&multi).unwrap();
        let rings = subject_rings_from_wkb(&wkb).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], 5.0);
    }

    #[test]
    fn test_subject_rings_reject_non_areal() {
        let point = Geometry::Point(point!(x: 1.0, y: 2.0));
        assert!(matches!(
            subject_rings(&point),
            Err(Error::UnsupportedGeometry(_))
        ));

        let line = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]);
        let wkb = geometry_to_wkb(&line).unwrap();
        assert!(matches!(
            subject_rings_from_wkb(&wkb),
            Err(Error::UnsupportedGeometry(_))
        ));
    }
}
