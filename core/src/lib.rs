pub mod exclusion;
pub mod listing;
pub mod observation;
pub mod position;
pub mod tile;
pub mod units;

pub use exclusion::ExclusionList;
pub use listing::StationListing;
pub use observation::{Observation, PathValue, RawReading, Station};
pub use position::Position;
pub use tile::{TileCoord, TileError, locate};

/// Zoom level of the tiles indexing the station directory.
pub const DIRECTORY_ZOOM: u8 = 8;
/// Root of every published path: `observations.windy.<station>.<leaf>`.
pub const PUBLISH_NAMESPACE: &str = "observations.windy";
pub const STATION_INFO_URL: &str = "https://www.windy.com/station";
