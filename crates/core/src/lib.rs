//! Core library for clipping polygon rings to rectangular tile regions.
//!
//! The clipper is a Weiler-Atherton walk specialised for axis-aligned
//! rectangles: every crossing between the subject ring and the rectangle is
//! spliced into both boundaries, and output rings are traced by switching
//! between the two at each crossing.
//!
//! # Examples
//!
//! ```
//! use tileclip_core::{clip_ring, Point, WindingOrder};
//!
//! // A square hanging off the lower-left corner of the clip rectangle.
//! let subject = [-5.0, -5.0, -5.0, 5.0, 5.0, 5.0, 5.0, -5.0];
//! let rings = clip_ring(
//!     WindingOrder::Clockwise,
//!     &subject,
//!     Point { x: 0.0, y: 0.0 },
//!     Point { x: 10.0, y: 10.0 },
//! )
//! .unwrap();
//!
//! assert_eq!(rings, vec![vec![0.0, 5.0, 5.0, 5.0, 5.0, 0.0, 0.0, 0.0]]);
//! ```

use thiserror::Error;

pub mod clip;
pub mod geom;
pub mod intersect;
pub mod region;
pub mod ring;
pub mod subject;
pub mod tile;
pub mod wkb;

pub use clip::{clip_geometry, clip_multipolygon, clip_polygon, clip_ring};
pub use geom::{Point, WindingOrder};
pub use tile::{TileConfig, TileCoord};

/// Errors that can occur while preparing or clipping a geometry
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed subject ring: {0}")]
    MalformedInput(String),

    #[error("Failed to decode geometry: {0}")]
    GeometryDecode(String),

    #[error("Failed to encode geometry: {0}")]
    GeometryEncode(String),

    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Invalid tile address: {0}")]
    InvalidTile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
