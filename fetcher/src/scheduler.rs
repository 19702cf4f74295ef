//! Polling schedule.
//!
//! A one-shot warm-up timer gives the position source time to produce a
//! first fix, then a recurring timer drives one pipeline cycle per tick:
//!
//! - no position: the tick is skipped;
//! - previous cycle still running: the tick is skipped;
//! - otherwise a cycle is spawned and the timer goes back to waiting.
//!
//! Cancelling the shutdown token stops both timers. Cycles already in
//! flight are left to finish on their own.

use crate::{
    api::Api,
    logging,
    pipeline::{CycleReport, Pipeline},
    position::PositionProvider,
    publish::Publisher,
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const WARMUP_DELAY: Duration = Duration::from_secs(5);
pub const POLL_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub struct Scheduler<A, P, L> {
    pipeline: Arc<Pipeline<A, P>>,
    position: L,
    warmup: Duration,
    interval: Duration,
    busy: Arc<AtomicBool>,
}

/// Clears the busy flag when a cycle ends, even if it panicked.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: Api, P: Publisher, L: PositionProvider> Scheduler<A, P, L> {
    pub fn new(pipeline: Pipeline<A, P>, position: L) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            position,
            warmup: WARMUP_DELAY,
            interval: POLL_INTERVAL,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handles one timer firing, returning the spawned cycle if one started.
    pub fn fire(&self) -> Option<JoinHandle<CycleReport>> {
        let Some(position) = self.position.current() else {
            logging::Logger::new().info(
                "cycle.skipped_no_position",
                "No position available yet, skipping cycle",
            );
            return None;
        };

        if self.busy.swap(true, Ordering::AcqRel) {
            logging::Logger::new().warn(
                "cycle.skipped_busy",
                "Previous cycle still running, skipping cycle",
            );
            return None;
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let pipeline = Arc::clone(&self.pipeline);
        Some(tokio::spawn(async move {
            let _guard = guard;
            pipeline.run_cycle(position).await
        }))
    }

    /// Runs until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        logging::Logger::new().info(
            "scheduler.started",
            &format!(
                "Polling every {}s after a {}s warm-up",
                self.interval.as_secs(),
                self.warmup.as_secs()
            ),
        );

        let start = Instant::now();
        let warmup = tokio::time::sleep_until(start + self.warmup);
        tokio::pin!(warmup);
        let mut warmed_up = false;

        let mut interval = tokio::time::interval_at(start + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    logging::Logger::new().info("scheduler.stopped", "Scheduler shutting down");
                    break;
                }

                _ = &mut warmup, if !warmed_up => {
                    warmed_up = true;
                    self.fire();
                }

                _ = interval.tick() => {
                    self.fire();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::fake::FakeApi, position::SharedPosition, publish::recording::RecordingPublisher,
    };
    use serde_json::json;
    use windy_core::{ExclusionList, Position};

    const TILE_PATH: &str = "/tiles/8/41/90";

    fn fixture(
        position: SharedPosition,
    ) -> (
        Arc<FakeApi>,
        Scheduler<Arc<FakeApi>, Arc<RecordingPublisher>, SharedPosition>,
    ) {
        let api = Arc::new(
            FakeApi::new()
                .with(
                    TILE_PATH,
                    json!({"items": 7, "data": ["ABC", 0, 0, 0, 0, 0, 0]}),
                )
                .with("/stations/ABC", json!({"temp": 20})),
        );
        let pipeline = Pipeline::new(
            api.clone(),
            Arc::new(RecordingPublisher::default()),
            ExclusionList::default(),
        );
        (api, Scheduler::new(pipeline, position))
    }

    fn directory_requests(api: &FakeApi) -> usize {
        api.requests()
            .iter()
            .filter(|path| path.as_str() == TILE_PATH)
            .count()
    }

    fn at_sea() -> SharedPosition {
        SharedPosition::new(Some(Position::new(47.0, -122.0)))
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_before_warmup() {
        let (api, scheduler) = fixture(at_sea());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(directory_requests(&api), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(directory_requests(&api), 1);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn one_cycle_per_interval_tick() {
        let (api, scheduler) = fixture(at_sea());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(directory_requests(&api), 1);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(directory_requests(&api), 2);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(directory_requests(&api), 3);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn no_cycles_after_stop() {
        let (api, scheduler) = fixture(at_sea());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(6)).await;
        shutdown.cancel();
        handle.await.unwrap();
        let before = directory_requests(&api);

        tokio::time::sleep(POLL_INTERVAL * 4).await;
        assert_eq!(directory_requests(&api), before);
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_wait_for_a_position() {
        let position = SharedPosition::default();
        let (api, scheduler) = fixture(position.clone());
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(shutdown.clone()));

        tokio::time::sleep(POLL_INTERVAL + Duration::from_secs(10)).await;
        assert!(api.requests().is_empty());

        position.update(Position::new(47.0, -122.0));
        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(directory_requests(&api), 1);

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn fire_skips_while_a_cycle_is_running() {
        let (api, scheduler) = fixture(at_sea());
        scheduler.busy.store(true, Ordering::Release);
        assert!(scheduler.fire().is_none());
        assert!(api.requests().is_empty());

        scheduler.busy.store(false, Ordering::Release);
        let report = scheduler.fire().unwrap().await.unwrap();
        assert_eq!(report.stations_published, 1);
        assert!(!scheduler.busy.load(Ordering::Acquire));
    }
}
