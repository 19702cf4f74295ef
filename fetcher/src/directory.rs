use crate::{
    api::{Api, status_of},
    logging,
};
use windy_core::{StationListing, TileCoord};

pub(crate) fn tile_path(tile: &TileCoord) -> String {
    format!("/tiles/{}", tile.path())
}

/// Station identifiers listed for `tile`.
///
/// A failed or undecodable directory request yields no stations for this
/// cycle; the next cycle asks again.
pub(crate) async fn list_stations<A: Api>(api: &A, tile: &TileCoord) -> Vec<String> {
    let listing = match api.get_json::<StationListing>(&tile_path(tile)).await {
        Ok(listing) => listing,
        Err(err) => {
            let mut logger = logging::Logger::new()
                .tile(tile)
                .error_text(err.to_string());
            if let Some(status) = status_of(&err) {
                logger = logger.status(status);
            }
            logger.error(
                "directory.fetch_failed",
                &err,
                "Failed to fetch station directory",
            );
            return Vec::new();
        }
    };

    let ids = listing.station_ids();
    logging::Logger::new()
        .tile(tile)
        .count(ids.len())
        .info("directory.listed", "Station directory decoded");
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use serde_json::json;

    const TILE: TileCoord = TileCoord {
        zoom: 8,
        x: 41,
        y: 90,
    };

    #[tokio::test]
    async fn lists_ids_using_provider_width() {
        let api = FakeApi::new().with(
            "/tiles/8/41/90",
            json!({
                "items": 7,
                "data": [
                    "ABC", 47.1, -122.3, 5, 7, 90, 20,
                    "DEF", 47.2, -122.4, 3, 4, 180, 18,
                ],
            }),
        );
        let ids = list_stations(&api, &TILE).await;
        assert_eq!(ids, vec!["ABC", "DEF"]);
        assert_eq!(api.requests(), vec!["/tiles/8/41/90"]);
    }

    #[tokio::test]
    async fn failed_request_yields_no_stations() {
        let api = FakeApi::new();
        assert!(list_stations(&api, &TILE).await.is_empty());
        assert_eq!(api.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_yields_no_stations() {
        let api = FakeApi::new().with("/tiles/8/41/90", json!({"items": "seven", "data": []}));
        assert!(list_stations(&api, &TILE).await.is_empty());
    }
}
