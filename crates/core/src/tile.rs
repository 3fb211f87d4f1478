//! Tile addressing and the clip rectangle of a tile.
//!
//! Geometry is projected from lng/lat into a tile's pixel space (Web
//! Mercator, origin at the top-left corner, y pointing down) and clipped to
//! the tile extent grown by a buffer on every side.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use geo::{coord, Geometry, MapCoords, Rect};

use crate::geom::Point;
use crate::{Error, Result};

/// Default buffer in screen pixels (1 pixel = 1/256th of the tile width)
pub const DEFAULT_BUFFER_PIXELS: u32 = 8;

/// Default tile extent in pixels
pub const DEFAULT_EXTENT: u32 = 4096;

/// Highest zoom level a [`TileCoord`] can address.
pub const MAX_ZOOM: u8 = 30;

/// Latitude limit of the Web Mercator square.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Tile extent and buffer used to build the clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    /// Pixels along each side of a tile.
    pub extent: u32,
    /// Buffer around the tile in screen pixels.
    pub buffer_pixels: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            extent: DEFAULT_EXTENT,
            buffer_pixels: DEFAULT_BUFFER_PIXELS,
        }
    }
}

impl TileConfig {
    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_buffer(mut self, buffer_pixels: u32) -> Self {
        self.buffer_pixels = buffer_pixels;
        self
    }

    /// The buffer converted to tile pixels.
    pub fn buffer(&self) -> f64 {
        self.buffer_pixels as f64 * self.extent as f64 / 256.0
    }

    /// The rectangle geometry is clipped to, in tile pixels.
    pub fn clip_bounds(&self) -> Rect<f64> {
        let buffer = self.buffer();
        let far = self.extent as f64 + buffer;
        Rect::new(coord! { x: -buffer, y: -buffer }, coord! { x: far, y: far })
    }
}

/// Tile coordinates: x, y, and zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    /// Create a new tile coordinate
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Whether the zoom is addressable and x/y fall inside its grid.
    pub fn is_valid(&self) -> bool {
        if self.z > MAX_ZOOM {
            return false;
        }
        let n = 1u64 << self.z;
        (self.x as u64) < n && (self.y as u64) < n
    }

    /// Get the bounding box of this tile in geographic coordinates (lng/lat)
    pub fn bounds(&self) -> Rect<f64> {
        let n = 2_f64.powi(self.z as i32);
        let lng_min = (self.x as f64) / n * 360.0 - 180.0;
        let lng_max = (self.x as f64 + 1.0) / n * 360.0 - 180.0;

        let lat_deg = |y: f64| {
            let y_rad = PI * (1.0 - 2.0 * y / n);
            y_rad.sinh().atan().to_degrees()
        };

        Rect::new(
            coord! { x: lng_min, y: lat_deg(self.y as f64 + 1.0) },
            coord! { x: lng_max, y: lat_deg(self.y as f64) },
        )
    }

    /// Project a lng/lat coordinate into this tile's pixel space.
    ///
    /// `(0, 0)` is the tile's top-left corner and `(extent, extent)` its
    /// bottom-right. Points outside the tile map outside that square.
    /// Latitudes are clamped to the Web Mercator limit.
    pub fn project(&self, lng_lat: Point, extent: u32) -> Point {
        let n = 2_f64.powi(self.z as i32);
        let lat = lng_lat.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let world_x = (lng_lat.x + 180.0) / 360.0 * n;
        let world_y = (1.0 - lat.tan().asinh() / PI) / 2.0 * n;

        coord! {
            x: (world_x - self.x as f64) * extent as f64,
            y: (world_y - self.y as f64) * extent as f64,
        }
    }

    /// Project every coordinate of a lng/lat geometry into tile pixels.
    pub fn project_geometry(&self, geometry: &Geometry<f64>, extent: u32) -> Geometry<f64> {
        geometry.map_coords(|c| self.project(c, extent))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = Error;

    /// Parse a `z/x/y` tile address.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        let [z, x, y] = parts.as_slice() else {
            return Err(Error::InvalidTile(format!("expected z/x/y, got '{}'", s)));
        };

        let parse = |part: &str, name: &str| {
            part.parse::<u32>()
                .map_err(|e| Error::InvalidTile(format!("bad {} '{}': {}", name, part, e)))
        };
        let z = parse(*z, "zoom")?;
        let z = u8::try_from(z)
            .map_err(|_| Error::InvalidTile(format!("zoom {} exceeds {}", z, MAX_ZOOM)))?;
        let tile = TileCoord::new(parse(*x, "x")?, parse(*y, "y")?, z);

        if !tile.is_valid() {
            return Err(Error::InvalidTile(format!(
                "{} is outside the tile grid at zoom {}",
                tile, tile.z
            )));
        }
        Ok(tile)
    }
}

/// Convert longitude/latitude to tile coordinates at a given zoom level
///
/// Uses Web Mercator projection (EPSG:3857)
pub fn lng_lat_to_tile(lng: f64, lat: f64, zoom: u8) -> TileCoord {
    let n = 2_f64.powi(zoom as i32);

    let x = ((lng + 180.0) / 360.0 * n).floor() as u32;

    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u32;

    TileCoord::new(x, y, zoom)
}
