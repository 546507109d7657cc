use finfun_core::{derive_listing, Competition, DisplayCompetition};
use log::{debug, info};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use time::OffsetDateTime;
use tokio::{
    sync::watch,
    time::{interval, MissedTickBehavior},
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// Source of wall-clock time for the recompute loop
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// One published derivation of the listing
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub computed_at: OffsetDateTime,
    pub items: Arc<[DisplayCompetition]>,
}

impl ListingSnapshot {
    fn empty(computed_at: OffsetDateTime) -> Self {
        Self {
            computed_at,
            items: Arc::from(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Re-derives lifecycle state and countdowns for the latest fetched
/// competitions on a fixed tick and publishes each result as a whole.
///
/// Readers only ever see a complete snapshot. Missed ticks are skipped.
pub struct RecomputeScheduler {
    tick: Duration,
    clock: Arc<dyn Clock>,
    source: watch::Sender<Arc<[Competition]>>,
    published: watch::Sender<Arc<ListingSnapshot>>,
    /// Held from reading the source until the snapshot is published
    publishing: Mutex<()>,
    running: Mutex<Option<CancellationToken>>,
}

impl RecomputeScheduler {
    pub fn new(tick: Duration, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let (source, _) = watch::channel::<Arc<[Competition]>>(Arc::from(Vec::new()));
        let (published, _) = watch::channel(Arc::new(ListingSnapshot::empty(now)));
        Self {
            tick,
            clock,
            source,
            published,
            publishing: Mutex::new(()),
            running: Mutex::new(None),
        }
    }

    /// Replaces the fetched competitions and publishes a fresh derivation right away
    pub fn replace_source(&self, competitions: Vec<Competition>) {
        debug!("listing source replaced with {} competitions", competitions.len());
        let _publishing = self.publishing.lock().unwrap_or_else(PoisonError::into_inner);
        self.source.send_replace(Arc::from(competitions));
        self.derive_and_publish();
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn snapshot(&self) -> Arc<ListingSnapshot> {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ListingSnapshot>> {
        self.published.subscribe()
    }

    /// A single tick: derive from the current source at the clock's `now` and publish
    pub fn recompute(&self) -> Arc<ListingSnapshot> {
        let _publishing = self.publishing.lock().unwrap_or_else(PoisonError::into_inner);
        self.derive_and_publish()
    }

    fn derive_and_publish(&self) -> Arc<ListingSnapshot> {
        let source = self.source.borrow().clone();
        let computed_at = self.clock.now();
        let snapshot = Arc::new(ListingSnapshot {
            computed_at,
            items: Arc::from(derive_listing(&source, computed_at)),
        });
        self.published.send_replace(snapshot.clone());
        snapshot
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .map(|running| running.as_ref().is_some_and(|token| !token.is_cancelled()))
            .unwrap_or(false)
    }

    /// Spawns the tick loop on `tracker`. The loop ends on `stop` or when
    /// `shutdown` is cancelled. Starting an already running scheduler is a no-op.
    pub fn start(self: &Arc<Self>, tracker: &TaskTracker, shutdown: &CancellationToken) -> bool {
        let token = {
            let Ok(mut running) = self.running.lock() else {
                return false;
            };
            if running.as_ref().is_some_and(|token| !token.is_cancelled()) {
                return false;
            }
            let token = shutdown.child_token();
            *running = Some(token.clone());
            token
        };

        let scheduler = Arc::clone(self);
        tracker.spawn(async move {
            scheduler.run(token).await;
            info!("Successfully shutdown listing recompute scheduler");
        });
        true
    }

    pub fn stop(&self) {
        if let Ok(mut running) = self.running.lock() {
            if let Some(token) = running.take() {
                token.cancel();
            }
        }
    }

    async fn run(&self, cancel_token: CancellationToken) {
        info!("Starting listing recompute scheduler, tick every {:?}", self.tick);
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.recompute();
                }
                _ = cancel_token.cancelled() => {
                    info!("Listing recompute scheduler received cancellation");
                    break;
                }
            }
        }
    }
}
