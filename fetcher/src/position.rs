use crate::logging;
use std::sync::{Arc, RwLock};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use windy_core::Position;

/// Source of the vessel's current position.
pub trait PositionProvider: Send + Sync + 'static {
    /// `None` while no fix is available yet.
    fn current(&self) -> Option<Position>;
}

/// Latest fix, shared between the feeder and the scheduler.
#[derive(Clone, Default)]
pub struct SharedPosition {
    inner: Arc<RwLock<Option<Position>>>,
}

impl SharedPosition {
    pub fn new(initial: Option<Position>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn update(&self, position: Position) {
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(position),
            Err(poisoned) => *poisoned.into_inner() = Some(position),
        }
    }
}

impl PositionProvider for SharedPosition {
    fn current(&self) -> Option<Position> {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Feeds `position` from newline-delimited fixes until `reader` is exhausted.
///
/// Each line is `lat,lon` or `{"latitude":..,"longitude":..}`; anything
/// else is logged and skipped.
pub async fn feed_lines<R>(reader: R, position: SharedPosition)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match Position::parse(&line) {
                    Some(fix) => position.update(fix),
                    None => logging::Logger::new()
                        .error_text(line)
                        .warn("position.parse_failed", "Ignoring unparsable position"),
                }
            }
            Ok(None) => {
                logging::Logger::new().info("position.input_closed", "Position input closed");
                return;
            }
            Err(err) => {
                logging::Logger::new().error(
                    "position.read_failed",
                    &err,
                    "Failed to read position input",
                );
                return;
            }
        }
    }
}
