//! Slippy-map tile math.
//!
//! The station directory is indexed by Web Mercator tiles; a position is
//! reduced to the tile containing it before the directory is queried.

use std::f64::consts::PI;
use std::fmt;

/// Web Mercator latitude limit; the projection diverges beyond it.
pub const MAX_LAT: f64 = 85.05112878;
pub const MAX_LON: f64 = 180.0;
pub const MAX_ZOOM: u8 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub zoom: u8,
    /// Column, 0 at the antimeridian going east.
    pub x: u32,
    /// Row, 0 at the northern edge.
    pub y: u32,
}

impl TileCoord {
    /// Directory path segment, `{zoom}/{x}/{y}`.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.zoom, self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileError {
    /// Latitude or longitude is NaN or infinite.
    NonFinite { latitude: f64, longitude: f64 },
    InvalidZoom(u8),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::NonFinite {
                latitude,
                longitude,
            } => write!(
                f,
                "Position is not finite: latitude {} longitude {}",
                latitude, longitude
            ),
            TileError::InvalidZoom(zoom) => write!(
                f,
                "Invalid zoom level: {} (must be between 0 and {})",
                zoom, MAX_ZOOM
            ),
        }
    }
}

impl std::error::Error for TileError {}

/// Converts a geographic position to the tile containing it.
///
/// Latitude is clamped to the Web Mercator range and longitude to
/// [-180, 180], so polar or out-of-range fixes land on the edge tiles
/// instead of producing indices outside `[0, 2^zoom)`.
pub fn locate(latitude: f64, longitude: f64, zoom: u8) -> Result<TileCoord, TileError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(TileError::NonFinite {
            latitude,
            longitude,
        });
    }
    if zoom > MAX_ZOOM {
        return Err(TileError::InvalidZoom(zoom));
    }

    let latitude = latitude.clamp(-MAX_LAT, MAX_LAT);
    let longitude = longitude.clamp(-MAX_LON, MAX_LON);
    let n = 2.0_f64.powi(i32::from(zoom));

    let lat_rad = latitude * PI / 180.0;
    let x = ((longitude + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();

    Ok(TileCoord {
        zoom,
        x: clamp_index(x, n),
        y: clamp_index(y, n),
    })
}

fn clamp_index(value: f64, n: f64) -> u32 {
    value.clamp(0.0, n - 1.0) as u32
}
