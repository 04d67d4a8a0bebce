//! Refresh controllers for the news and predicted-stock lists.
//!
//! A controller owns one snapshot (`loading`, `error`, `data`,
//! `last_updated`) behind a `tokio::sync::watch` channel. It refreshes on
//! mount, on demand and on a fixed timer. Each refresh takes a sequence number
//! when it is issued; only the latest-issued refresh may write its result, so
//! a slow early response cannot overwrite a newer one.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;

/// News auto-refresh period.
pub const NEWS_REFRESH_EVERY: Duration = Duration::from_secs(5 * 60);
/// Predicted stocks auto-refresh period (patterns change slower than news).
pub const STOCKS_REFRESH_EVERY: Duration = Duration::from_secs(10 * 60);

/// Something a controller can pull a fresh list from.
#[async_trait]
pub trait CollectionSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch(&self) -> Result<Vec<Self::Item>>;
    fn name(&self) -> &'static str;
}

/// Issue-order sequencing shared by controllers and the analysis loader.
#[derive(Debug, Default)]
pub struct Sequencer(AtomicU64);

impl Sequencer {
    /// Next sequence number; later calls always get larger numbers.
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.0.load(Ordering::SeqCst) == seq
    }

    /// Invalidate everything issued so far.
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// What watchers of a controller see.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Arc<Vec<T>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            error: self.error.clone(),
            data: Arc::clone(&self.data),
            last_updated: self.last_updated,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: Arc::new(Vec::new()),
            last_updated: None,
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "controller_refresh_total",
            "Completed refreshes by controller and outcome."
        );
        describe_counter!(
            "controller_stale_writes_total",
            "Refresh results dropped because a newer refresh was issued."
        );
        describe_gauge!(
            "controller_last_success_ts",
            "Unix ts of the last successful refresh."
        );
    });
}

struct Inner<S: CollectionSource> {
    source: S,
    state: watch::Sender<Snapshot<S::Item>>,
    seq: Sequencer,
    mounted: AtomicBool,
}

/// Stateful refresh owner for one collection. Cheap to clone; clones share state.
pub struct RefreshController<S: CollectionSource> {
    inner: Arc<Inner<S>>,
}

impl<S: CollectionSource> Clone for RefreshController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CollectionSource> fmt::Debug for RefreshController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.inner.state.borrow();
        f.debug_struct("RefreshController")
            .field("source", &self.inner.source.name())
            .field("loading", &snap.loading)
            .field("items", &snap.data.len())
            .finish()
    }
}

impl<S: CollectionSource> RefreshController<S> {
    pub fn new(source: S) -> Self {
        ensure_metrics_described();
        let (state, _rx) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(Inner {
                source,
                state,
                seq: Sequencer::default(),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.source.name()
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot<S::Item> {
        self.inner.state.borrow().clone()
    }

    /// Change notifications for presentation code.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Item>> {
        self.inner.state.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// Fetch once and apply the result. Returns when this refresh has settled.
    pub async fn refresh(&self) {
        let Some(seq) = self.begin() else { return };
        let res = self.inner.source.fetch().await;
        self.commit(seq, res);
    }

    /// Fire-and-forget refresh (timer ticks, manual refresh buttons). The
    /// snapshot shows `loading` before this returns.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let this = self.clone();
        let seq = self.begin();
        tokio::spawn(async move {
            if let Some(seq) = seq {
                let res = this.inner.source.fetch().await;
                this.commit(seq, res);
            }
        })
    }

    /// Issue a sequence number and flag the snapshot as loading. `None` once
    /// unmounted.
    fn begin(&self) -> Option<u64> {
        if !self.is_mounted() {
            return None;
        }
        let mut seq = 0;
        self.inner.state.send_modify(|s| {
            // issued under the channel lock, so no newer commit can land in between
            seq = self.inner.seq.issue();
            s.loading = true;
            s.error = None;
        });
        Some(seq)
    }

    fn commit(&self, seq: u64, res: Result<Vec<S::Item>>) {
        let name = self.name();
        if !self.is_mounted() {
            debug!(target: "controller", controller = name, seq, "unmounted, dropping result");
            return;
        }

        let outcome = if res.is_ok() { "ok" } else { "error" };
        let mut applied = false;
        self.inner.state.send_if_modified(|s| {
            // checked under the channel lock so a newer issue cannot interleave
            if !self.inner.seq.is_latest(seq) {
                return false;
            }
            applied = true;
            s.loading = false;
            match res {
                Ok(items) => {
                    s.data = Arc::new(items);
                    s.error = None;
                    s.last_updated = Some(Utc::now());
                }
                // keep the previous list; only record the error
                Err(e) => s.error = Some(e.to_string()),
            }
            true
        });

        if !applied {
            counter!("controller_stale_writes_total", "controller" => name).increment(1);
            debug!(target: "controller", controller = name, seq, "superseded by a newer refresh");
            return;
        }

        counter!("controller_refresh_total", "controller" => name, "outcome" => outcome)
            .increment(1);
        let snap = self.inner.state.borrow();
        match (&snap.error, snap.last_updated) {
            (Some(err), _) => {
                warn!(target: "controller", controller = name, error = %err, kept = snap.data.len(), "refresh failed")
            }
            (None, Some(ts)) => {
                gauge!("controller_last_success_ts", "controller" => name).set(ts.timestamp() as f64);
                info!(target: "controller", controller = name, items = snap.data.len(), "refreshed");
            }
            (None, None) => {}
        }
    }

    /// Fetch right away, then start the refresh timer. Dropping the handle
    /// stops the timer and unmounts.
    pub fn mount(&self, every: Duration) -> ControllerHandle<S> {
        self.inner.mounted.store(true, Ordering::SeqCst);
        self.spawn_refresh();
        let this = self.clone();
        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // overlapping refreshes are allowed; sequencing decides the winner
                this.spawn_refresh();
            }
        });
        info!(target: "controller", controller = self.name(), every_secs = every.as_secs_f64(), "mounted");
        ControllerHandle {
            controller: self.clone(),
            timer: Some(timer),
        }
    }

    fn unmount(&self) {
        if self.inner.mounted.swap(false, Ordering::SeqCst) {
            info!(target: "controller", controller = self.name(), "unmounted");
        }
    }
}

/// Owns a mounted controller's timer.
pub struct ControllerHandle<S: CollectionSource> {
    controller: RefreshController<S>,
    timer: Option<JoinHandle<()>>,
}

impl<S: CollectionSource> ControllerHandle<S> {
    pub fn controller(&self) -> &RefreshController<S> {
        &self.controller
    }

    /// Stop the timer; in-flight requests finish but their results are dropped.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(t) = self.timer.take() {
            t.abort();
        }
        self.controller.unmount();
    }
}

impl<S: CollectionSource> Drop for ControllerHandle<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
