use crate::{
    api::{Api, status_of},
    logging,
};
use windy_core::{Observation, RawReading, Station};

pub(crate) fn station_path(station: &Station) -> String {
    format!("/stations/{}", station.path_segment())
}

/// Fetches one station's reading and normalizes it.
///
/// Excluded stations return `None` without touching the network. Request
/// failures are logged and also return `None`.
pub(crate) async fn fetch_observation<A: Api>(api: &A, station: &Station) -> Option<Observation> {
    if station.excluded {
        return None;
    }

    match api.get_json::<RawReading>(&station_path(station)).await {
        Ok(reading) => Some(Observation::from_reading(station, reading)),
        Err(err) => {
            let mut logger = logging::Logger::new()
                .station(&station.id)
                .error_text(err.to_string());
            if let Some(status) = status_of(&err) {
                logger = logger.status(status);
            }
            logger.error(
                "station.fetch_failed",
                &err,
                "Error fetching data for station",
            );
            None
        }
    }
}
