//! Live contribution poller
//!
//! Periodically fetches the per-RT contribution totals for the live report.
//! At most one request is in flight: a tick that fires while the previous
//! fetch is still outstanding is skipped, not queued.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::models::LiveContribution;
use crate::api::{ApiClient, ClientError};

/// Default interval between polls (in seconds)
pub const DEFAULT_LIVE_INTERVAL_SECS: u64 = 10;

/// Totals at or above this are shown as high
pub const HIGH_NOMINAL_THRESHOLD: i64 = 1_000_000;

/// Where live figures come from
#[async_trait]
pub trait LiveSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<LiveContribution>, ClientError>;
}

#[async_trait]
impl LiveSource for ApiClient {
    async fn fetch(&self) -> Result<Vec<LiveContribution>, ClientError> {
        self.live_contributions().await
    }
}

/// Single-slot in-flight flag
#[derive(Debug, Clone, Default)]
pub struct PollGuard {
    in_flight: Arc<AtomicBool>,
}

/// Held while a poll request is outstanding; releases the guard on drop
#[derive(Debug)]
pub struct PollPermit {
    in_flight: Arc<AtomicBool>,
}

impl PollGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if a request is already outstanding
    pub fn try_acquire(&self) -> Option<PollPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollPermit {
                in_flight: self.in_flight.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for PollPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

/// One row of the live report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEntry {
    pub sumber: String,
    pub total: i64,
    /// First non-zero total seen for this source (equal to `total` on first sight)
    pub previous: i64,
}

impl LiveEntry {
    pub fn trending_up(&self) -> bool {
        self.total >= self.previous
    }

    pub fn delta(&self) -> i64 {
        self.total - self.previous
    }

    pub fn is_high(&self) -> bool {
        self.total >= HIGH_NOMINAL_THRESHOLD
    }
}

/// Remembers a baseline total per source to compute trends.
///
/// The baseline is the first non-zero total seen while the tracker lives; a
/// zero baseline is replaced by the next total.
#[derive(Debug, Default)]
pub struct LiveTracker {
    baselines: HashMap<String, i64>,
}

impl LiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, rows: Vec<LiveContribution>) -> Vec<LiveEntry> {
        rows.into_iter()
            .map(|row| {
                let baseline = self.baselines.entry(row.sumber.clone()).or_insert(row.total);
                if *baseline == 0 {
                    *baseline = row.total;
                }
                let previous = *baseline;
                LiveEntry {
                    sumber: row.sumber,
                    total: row.total,
                    previous,
                }
            })
            .collect()
    }
}

/// Counters for one poller
#[derive(Debug, Default)]
struct PollStats {
    started: AtomicU64,
    skipped: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Snapshot of the poll counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollCounts {
    pub started: u64,
    pub skipped: u64,
    pub completed: u64,
    pub failed: u64,
}

/// What a tick did
#[derive(Debug)]
pub enum TickOutcome {
    Started(JoinHandle<()>),
    Skipped,
}

pub struct LivePoller {
    source: Arc<dyn LiveSource>,
    interval_secs: u64,
    guard: PollGuard,
    tracker: Arc<Mutex<LiveTracker>>,
    stats: Arc<PollStats>,
    updates: Arc<watch::Sender<Vec<LiveEntry>>>,
    cancel: CancellationToken,
}

impl LivePoller {
    pub fn new(source: Arc<dyn LiveSource>) -> Self {
        Self::with_interval(source, DEFAULT_LIVE_INTERVAL_SECS)
    }

    pub fn with_interval(source: Arc<dyn LiveSource>, interval_secs: u64) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            source,
            interval_secs: interval_secs.max(1),
            guard: PollGuard::new(),
            tracker: Arc::new(Mutex::new(LiveTracker::new())),
            stats: Arc::new(PollStats::default()),
            updates: Arc::new(tx),
            cancel: CancellationToken::new(),
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Latest rows, pushed after every successful poll
    pub fn subscribe(&self) -> watch::Receiver<Vec<LiveEntry>> {
        self.updates.subscribe()
    }

    pub fn latest(&self) -> Vec<LiveEntry> {
        self.updates.borrow().clone()
    }

    pub fn counts(&self) -> PollCounts {
        PollCounts {
            started: self.stats.started.load(Ordering::Relaxed),
            skipped: self.stats.skipped.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop polling; an outstanding fetch is abandoned without publishing
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Start one poll unless the previous one is still outstanding
    pub fn tick(&self) -> TickOutcome {
        let Some(permit) = self.guard.try_acquire() else {
            self.stats.skipped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Previous live poll still outstanding, skipping tick");
            return TickOutcome::Skipped;
        };
        self.stats.started.fetch_add(1, Ordering::Relaxed);

        let source = self.source.clone();
        let tracker = self.tracker.clone();
        let stats = self.stats.clone();
        let updates = self.updates.clone();
        let cancel = self.cancel.clone();

        TickOutcome::Started(tokio::spawn(async move {
            let _permit = permit;
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = source.fetch() => result,
            };

            match result {
                Ok(rows) => {
                    let entries = tracker.lock().update(rows);
                    stats.completed.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(rows = entries.len(), "Live contributions updated");
                    updates.send_replace(entries);
                }
                Err(e) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %e, "Failed to poll live contributions");
                }
            }
        }))
    }

    /// Poll on a fixed interval until stopped. The first poll fires immediately.
    pub async fn run(&self) {
        tracing::info!(
            interval_secs = self.interval_secs,
            "Starting live contribution polling"
        );

        let mut tick = interval(Duration::from_secs(self.interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tick.tick() => {
                    self.tick();
                }
            }
        }

        let counts = self.counts();
        tracing::info!(
            started = counts.started,
            skipped = counts.skipped,
            failed = counts.failed,
            "Live polling stopped"
        );
    }
}

/// Spawn the polling loop in the background
pub fn spawn_live_poller(poller: Arc<LivePoller>) -> JoinHandle<()> {
    tokio::spawn(async move { poller.run().await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn row(sumber: &str, total: i64) -> LiveContribution {
        LiveContribution {
            sumber: sumber.into(),
            total,
        }
    }

    /// Source whose fetches block until released
    struct GatedSource {
        release: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LiveSource for GatedSource {
        async fn fetch(&self) -> Result<Vec<LiveContribution>, ClientError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            self.release.notified().await;
            Ok(vec![row("RT 01", 100 + n)])
        }
    }

    /// Source that takes a fixed time and records peak concurrency
    struct SlowSource {
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LiveSource for SlowSource {
        async fn fetch(&self) -> Result<Vec<LiveContribution>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![row("RT 02", 5)])
        }
    }

    #[test]
    fn test_guard_single_slot() {
        let guard = PollGuard::new();
        let permit = guard.try_acquire().unwrap();
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());
        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_tracker_trends() {
        let mut tracker = LiveTracker::new();

        let first = tracker.update(vec![row("RT 01", 500_000), row("RT 02", 1_200_000)]);
        assert_eq!(first[0].previous, 500_000);
        assert!(first[0].trending_up());
        assert!(first[1].is_high());

        let second = tracker.update(vec![row("RT 01", 650_000), row("RT 02", 1_100_000)]);
        assert_eq!(second[0].previous, 500_000);
        assert_eq!(second[0].delta(), 150_000);
        assert!(!second[1].trending_up());

        let third = tracker.update(vec![row("RT 01", 600_000), row("RT 02", 1_300_000)]);
        assert_eq!(third[0].previous, 500_000);
        assert!(third[0].trending_up());
        assert_eq!(third[1].previous, 1_200_000);
        assert!(third[1].trending_up());
    }

    #[test]
    fn test_tracker_replaces_zero_baseline() {
        let mut tracker = LiveTracker::new();

        assert_eq!(tracker.update(vec![row("RT 03", 0)])[0].previous, 0);

        let next = tracker.update(vec![row("RT 03", 40_000)]);
        assert_eq!(next[0].previous, 40_000);
        assert_eq!(next[0].delta(), 0);

        let later = tracker.update(vec![row("RT 03", 10_000)]);
        assert_eq!(later[0].previous, 40_000);
        assert!(!later[0].trending_up());
    }

    #[tokio::test]
    async fn test_tick_skips_while_outstanding() {
        let source = Arc::new(GatedSource {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let poller = LivePoller::with_interval(source.clone(), 10);

        let TickOutcome::Started(first) = poller.tick() else {
            panic!("first tick should start a poll");
        };
        assert!(matches!(poller.tick(), TickOutcome::Skipped));

        source.release.notify_one();
        first.await.unwrap();

        assert_eq!(poller.latest(), vec![LiveEntry {
            sumber: "RT 01".into(),
            total: 100,
            previous: 100,
        }]);
        let TickOutcome::Started(second) = poller.tick() else {
            panic!("tick after completion should start a poll");
        };
        source.release.notify_one();
        second.await.unwrap();

        let counts = poller.counts();
        assert_eq!(counts.started, 2);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.completed, 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(poller.latest()[0].total, 101);
        assert_eq!(poller.latest()[0].previous, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_never_overlaps() {
        let source = Arc::new(SlowSource {
            delay: Duration::from_secs(25),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        });
        let poller = Arc::new(LivePoller::with_interval(source.clone(), 10));
        let handle = spawn_live_poller(poller.clone());

        tokio::time::sleep(Duration::from_secs(61)).await;
        poller.stop();
        handle.await.unwrap();

        let counts = poller.counts();
        assert_eq!(source.peak.load(Ordering::SeqCst), 1);
        assert!(counts.skipped >= 2, "{:?}", counts);
        assert!(counts.started >= 2, "{:?}", counts);
        assert_eq!(counts.started, source.calls.load(Ordering::SeqCst) as u64);
    }

    #[tokio::test]
    async fn test_stopped_poller_does_not_publish() {
        let source = Arc::new(GatedSource {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let poller = LivePoller::with_interval(source.clone(), 10);

        let TickOutcome::Started(handle) = poller.tick() else {
            panic!("tick should start");
        };
        poller.stop();
        handle.await.unwrap();

        assert!(poller.latest().is_empty());
        assert_eq!(poller.counts().completed, 0);
        assert!(!poller.guard.is_busy());
    }

    #[test]
    fn test_interval_floor() {
        struct Never;
        #[async_trait]
        impl LiveSource for Never {
            async fn fetch(&self) -> Result<Vec<LiveContribution>, ClientError> {
                Ok(Vec::new())
            }
        }
        assert_eq!(LivePoller::with_interval(Arc::new(Never), 0).interval_secs(), 1);
        assert_eq!(LivePoller::new(Arc::new(Never)).interval_secs(), 10);
    }
}
