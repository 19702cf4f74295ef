use crate::{
    api::Api, directory::list_stations, logging, publish::Publisher, station::fetch_observation,
};
use futures::StreamExt;
use windy_core::{DIRECTORY_ZOOM, ExclusionList, Position, Station, TileCoord, locate};

const DEFAULT_CONCURRENCY: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub tile: Option<String>,
    pub stations_found: usize,
    pub stations_excluded: usize,
    pub stations_published: usize,
    pub errors: usize,
}

/// One discovery, fetch and publish pass around a position.
pub struct Pipeline<A, P> {
    api: A,
    publisher: P,
    exclusions: ExclusionList,
    zoom: u8,
    concurrency: usize,
}

impl<A: Api, P: Publisher> Pipeline<A, P> {
    pub fn new(api: A, publisher: P, exclusions: ExclusionList) -> Self {
        Self {
            api,
            publisher,
            exclusions,
            zoom: DIRECTORY_ZOOM,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn tile_for(&self, position: &Position) -> Option<TileCoord> {
        match locate(position.latitude, position.longitude, self.zoom) {
            Ok(tile) => Some(tile),
            Err(err) => {
                logging::Logger::new().error_text(err.to_string()).error(
                    "cycle.invalid_position",
                    &err,
                    "Cannot locate tile for position",
                );
                None
            }
        }
    }

    /// Runs a full cycle. Each observation is published as soon as its
    /// fetch completes; fetches run with bounded concurrency.
    pub async fn run_cycle(&self, position: Position) -> CycleReport {
        let Some(tile) = self.tile_for(&position) else {
            return CycleReport {
                tile: None,
                stations_found: 0,
                stations_excluded: 0,
                stations_published: 0,
                errors: 0,
            };
        };

        let stations: Vec<Station> = list_stations(&self.api, &tile)
            .await
            .into_iter()
            .map(|id| Station::new(id, &self.exclusions))
            .collect();
        let stations_found = stations.len();

        let (excluded, included): (Vec<_>, Vec<_>) =
            stations.into_iter().partition(|station| station.excluded);
        for station in &excluded {
            logging::Logger::new()
                .station(&station.id)
                .info("station.excluded", "Skipping excluded station");
        }

        let stations_included = included.len();
        let api = &self.api;
        let mut stations_published = 0usize;
        let mut fetches = futures::stream::iter(included)
            .map(move |station| async move { fetch_observation(api, &station).await })
            .buffer_unordered(self.concurrency);
        while let Some(result) = fetches.next().await {
            if let Some(observation) = result {
                self.publisher
                    .publish(&observation.station, observation.path_values());
                stations_published += 1;
            }
        }

        let report = CycleReport {
            tile: Some(tile.to_string()),
            stations_found,
            stations_excluded: excluded.len(),
            stations_published,
            errors: stations_included - stations_published,
        };
        logging::Logger::new()
            .tile(tile)
            .count(report.stations_published)
            .info(
                "cycle.completed",
                &format!(
                    "Published {} of {} stations ({} excluded, {} failed)",
                    report.stations_published,
                    report.stations_found,
                    report.stations_excluded,
                    report.errors
                ),
            );
        report
    }
}
