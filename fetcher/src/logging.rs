use tracing::{error, info, warn};

pub(crate) const TARGET: &str = "windy_fetcher";

#[derive(Clone, Default)]
pub(crate) struct Logger {
    station: Option<String>,
    tile: Option<String>,
    status: Option<u16>,
    count: Option<usize>,
    error_text: Option<String>,
}

impl Logger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub(crate) fn tile(mut self, tile: impl ToString) -> Self {
        self.tile = Some(tile.to_string());
        self
    }

    pub(crate) fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub(crate) fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub(crate) fn error_text(mut self, error_text: impl Into<String>) -> Self {
        self.error_text = Some(error_text.into());
        self
    }

    pub(crate) fn info(&self, event: &'static str, message: &str) {
        info!(
            target: TARGET,
            event,
            station = self.station.as_deref(),
            tile = self.tile.as_deref(),
            status = self.status,
            count = self.count,
            error_text = ?self.error_text,
            "{}",
            message
        );
    }

    pub(crate) fn warn(&self, event: &'static str, message: &str) {
        warn!(
            target: TARGET,
            event,
            station = self.station.as_deref(),
            tile = self.tile.as_deref(),
            status = self.status,
            count = self.count,
            error_text = ?self.error_text,
            "{}",
            message
        );
    }

    pub(crate) fn error<E: std::fmt::Debug>(&self, event: &'static str, err: &E, message: &str) {
        error!(
            target: TARGET,
            event,
            station = self.station.as_deref(),
            tile = self.tile.as_deref(),
            status = self.status,
            count = self.count,
            error_text = ?self.error_text,
            error = ?err,
            "{}",
            message
        );
    }
}
