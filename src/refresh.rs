//! Live-refresh reconciliation loop
//!
//! A single owner task polls the snapshot source on a fixed cadence,
//! rebuilds the derived view after every successful pass, and publishes it
//! as a committed snapshot through a watch channel. One writer, any number
//! of readers, no locks. Passes are serialized by the task itself, so a
//! tick landing mid-fetch is absorbed instead of stacking a second request,
//! and responses can never commit out of order.

use crate::classify::QueuePartition;
use crate::fetch::SnapshotSource;
use crate::model::Barista;
use crate::stats::DerivedStats;
use chrono::NaiveDateTime;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Message shown while the backend is unreachable
const FETCH_FAILED_MESSAGE: &str = "Cannot reach the backend. It will be retried automatically.";

/// Message published when the session credential is rejected
const UNAUTHORIZED_MESSAGE: &str = "Session expired. Please sign in again.";

/// State of the refresh loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPhase {
    /// Not started yet
    #[default]
    Idle,
    /// A pass is in flight; previously published data remains valid
    Loading,
    /// At least one snapshot has been committed
    Ready,
    /// The last pass failed; previous good data, if any, remains visible
    Error,
    /// The session credential was rejected; no further passes are scheduled
    Unauthorized,
}

impl RefreshPhase {
    /// Check whether the loop has stopped for good
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// The committed view exposed to the presentation layer
///
/// Cloned out of the watch channel; a reader always observes a fully
/// consistent pass, never a half-updated one.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub phase: RefreshPhase,
    pub queue: QueuePartition,
    pub baristas: Vec<Barista>,
    pub stats: DerivedStats,
    /// User-facing message for the most recent failure, if any
    pub error: Option<String>,
    /// Wall-clock time of the last successful refresh
    pub last_refresh: Option<NaiveDateTime>,
}

impl DashboardView {
    /// Check whether a successful pass has ever been committed
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.last_refresh.is_some()
    }
}

enum Command {
    Refresh,
    Stop,
}

/// Handle to a running refresh loop
///
/// Dropping the handle stops the loop: the command channel closes and the
/// owner task exits, leaving no scheduled work behind.
pub struct DashboardHandle {
    view_rx: watch::Receiver<DashboardView>,
    cmd_tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    /// Clone the current committed view
    #[must_use]
    pub fn view(&self) -> DashboardView {
        self.view_rx.borrow().clone()
    }

    /// Subscribe to view changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.view_rx.clone()
    }

    /// Request an out-of-band refresh pass
    ///
    /// Runs the same path as a timer tick without resetting the timer. If
    /// the loop is mid-pass or already stopped this is a no-op.
    pub fn refresh_now(&self) {
        let _ = self.cmd_tx.try_send(Command::Refresh);
    }

    /// Stop the loop and wait for the owner task to finish
    pub async fn stop(self) {
        let _ = self.cmd_tx.send(Command::Stop).await;
        let _ = self.task.await;
    }
}

/// Builder for the refresh loop
pub struct RefreshLoop<S> {
    source: S,
    interval: Duration,
}

impl<S: SnapshotSource + 'static> RefreshLoop<S> {
    /// Create a loop over a snapshot source with the given tick period
    #[must_use]
    pub fn new(source: S, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Start the owner task and return its handle
    ///
    /// The first pass runs immediately; subsequent passes follow the tick
    /// period until the handle is stopped or the session expires.
    #[must_use]
    pub fn spawn(self) -> DashboardHandle {
        let (view_tx, view_rx) = watch::channel(DashboardView::default());
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let task = tokio::spawn(run_loop(self.source, self.interval, view_tx, cmd_rx));
        DashboardHandle {
            view_rx,
            cmd_tx,
            task,
        }
    }
}

async fn run_loop<S: SnapshotSource>(
    source: S,
    interval: Duration,
    view_tx: watch::Sender<DashboardView>,
    mut cmd_rx: mpsc::Receiver<Command>,
) {
    let mut ticker = time::interval(interval);
    // A tick that lands while a pass is in flight is delayed, not stacked:
    // the loop never runs two fetches at the 5-second cadence.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if run_pass(&source, &view_tx).await.is_terminal() {
                    return;
                }
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Refresh) => {
                    debug!("manual refresh requested");
                    if run_pass(&source, &view_tx).await.is_terminal() {
                        return;
                    }
                }
                Some(Command::Stop) | None => {
                    debug!("refresh loop stopping");
                    return;
                }
            }
        }
    }
}

/// Run one fetch-classify-aggregate pass and publish the outcome
async fn run_pass<S: SnapshotSource>(
    source: &S,
    view_tx: &watch::Sender<DashboardView>,
) -> RefreshPhase {
    view_tx.send_modify(|view| view.phase = RefreshPhase::Loading);

    match source.fetch_snapshot().await {
        Ok(snapshot) => {
            let now = chrono::Local::now().naive_local();
            let queue = QueuePartition::from_orders(snapshot.orders);
            if queue.unrecognized > 0 {
                warn!(
                    count = queue.unrecognized,
                    "snapshot contained orders with unrecognized status"
                );
            }
            let stats = DerivedStats::live(&queue, now);
            // Full replacement of the previous view, never an incremental
            // patch.
            view_tx.send_replace(DashboardView {
                phase: RefreshPhase::Ready,
                queue,
                baristas: snapshot.baristas,
                stats,
                error: None,
                last_refresh: Some(now),
            });
            RefreshPhase::Ready
        }
        Err(err) if err.is_unauthorized() => {
            tracing::error!("session rejected by backend, stopping refresh loop");
            view_tx.send_modify(|view| {
                view.phase = RefreshPhase::Unauthorized;
                view.error = Some(UNAUTHORIZED_MESSAGE.to_string());
            });
            RefreshPhase::Unauthorized
        }
        Err(err) => {
            warn!(error = %err, "refresh pass failed, keeping previous data");
            view_tx.send_modify(|view| {
                view.phase = RefreshPhase::Error;
                view.error = Some(FETCH_FAILED_MESSAGE.to_string());
            });
            RefreshPhase::Error
        }
    }
}
