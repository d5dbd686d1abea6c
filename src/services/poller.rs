use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::track::TrackState;
use crate::infrastructure::relay_client::Publisher;
use crate::infrastructure::source::SnapshotSource;
use crate::services::extractor::Extractor;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Holds the last pushed state and decides whether a fresh scrape goes out.
#[derive(Debug)]
pub struct ChangeTracker {
    previous: TrackState,
}

impl ChangeTracker {
    pub fn new(initial: TrackState) -> Self {
        Self { previous: initial }
    }

    /// Returns the state to push, recording it as the new baseline. The
    /// baseline moves even if the push later fails.
    pub fn observe(&mut self, next: TrackState) -> Option<TrackState> {
        if !next.should_push(&self.previous) {
            return None;
        }
        self.previous = next.clone();
        Some(next)
    }
}

pub struct Poller {
    source: Box<dyn SnapshotSource>,
    extractor: Extractor,
    publisher: Arc<dyn Publisher>,
    interval: Duration,
}

/// Stops a running poller. Dropping the handle leaves the loop running.
pub struct PollerHandle {
    cancel: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        self.cancel.notify_one();
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Poller task failed: {e}");
        }
    }
}

impl Poller {
    pub fn new(
        source: Box<dyn SnapshotSource>,
        extractor: Extractor,
        publisher: Arc<dyn Publisher>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            extractor,
            publisher,
            interval,
        }
    }

    pub fn spawn(self) -> PollerHandle {
        let cancel = Arc::new(Notify::new());
        let cancel_clone = cancel.clone();
        let task = tokio::spawn(async move { self.run(cancel_clone).await });
        PollerHandle { cancel, task }
    }

    async fn run(self, cancel: Arc<Notify>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick fires immediately, so a page that is already loaded
        // starts without delay.
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel.notified() => return,
            }
            if self.source.is_ready().await {
                break;
            }
            tracing::debug!("Waiting for {} to load", self.source.describe());
        }

        tracing::info!("Initializing scraper on {}", self.source.describe());
        let initial = self.extractor.scrape(self.source.as_ref()).await;
        self.dispatch(initial.clone());
        let mut tracker = ChangeTracker::new(initial);
        tracing::info!("Polling started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = cancel.notified() => {
                    tracing::info!("Polling stopped");
                    return;
                }
            }

            let next = self.extractor.scrape(self.source.as_ref()).await;
            if let Some(state) = tracker.observe(next) {
                tracing::debug!("Sending update: {state}");
                self.dispatch(state);
            }
        }
    }

    // Pushes are not awaited or ordered; the relay keeps whichever lands last.
    fn dispatch(&self, state: TrackState) {
        let publisher = self.publisher.clone();
        tokio::spawn(async move {
            publisher.publish(&state).await;
        });
    }
}
