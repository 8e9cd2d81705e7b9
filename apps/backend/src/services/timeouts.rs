//! Periodic sweep that resolves judging phases whose vote deadline passed.
//!
//! Judging that times out is resolved as `landed`, so an unresponsive
//! judge can never hand the defender a letter or stall a game.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::repos::games;
use crate::services::game_flow::{GameFlowOutcome, GameFlowService};
use crate::services::publish::publish_outcome;
use crate::state::app_state::AppState;

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(50);

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Games found past their vote deadline.
    pub scanned: usize,
    pub resolved: usize,
    /// Games that were no longer due once locked.
    pub skipped: usize,
    pub failed: usize,
    /// Set when the sweep did not run because another was in progress.
    pub overlapped: bool,
}

impl SweepReport {
    pub fn skipped_overlap() -> Self {
        Self {
            overlapped: true,
            ..Self::default()
        }
    }
}

struct Worker {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the sweep loop; `start`, `stop` and `force_run` are its whole lifecycle.
pub struct JudgingTimeoutScheduler {
    state: AppState,
    interval: Duration,
    running: AtomicBool,
    worker: Mutex<Option<Worker>>,
}

/// Clears the running flag even if a sweep unwinds.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl JudgingTimeoutScheduler {
    /// Uses the sweep interval from the state's game config.
    pub fn new(state: AppState) -> Arc<Self> {
        let interval = state.game_config.sweep_interval;
        Self::with_interval(state, interval)
    }

    pub fn with_interval(state: AppState, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            state,
            interval: interval.max(MIN_SWEEP_INTERVAL),
            running: AtomicBool::new(false),
            worker: Mutex::new(None),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_started(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Spawns the sweep loop. Returns `false` if it was already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let this = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let report = this.force_run().await;
                        if report.resolved > 0 || report.failed > 0 {
                            info!(
                                scanned = report.scanned,
                                resolved = report.resolved,
                                skipped = report.skipped,
                                failed = report.failed,
                                "judging timeout sweep"
                            );
                        }
                    }
                }
            }
            debug!("judging timeout scheduler stopped");
        });

        *worker = Some(Worker { cancel, task });
        info!(interval_ms = self.interval.as_millis() as u64, "judging timeout scheduler started");
        true
    }

    /// Cancels the loop and waits for an in-flight sweep to finish.
    pub async fn stop(&self) {
        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            return;
        };
        worker.cancel.cancel();
        if let Err(err) = worker.task.await {
            warn!(error = %err, "judging timeout scheduler task ended abnormally");
        }
    }

    /// Runs one sweep now, unless one is already in progress.
    pub async fn force_run(&self) -> SweepReport {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sweep already in progress; skipping");
            return SweepReport::skipped_overlap();
        }
        let _running = RunningGuard(&self.running);
        self.sweep(OffsetDateTime::now_utc()).await
    }

    async fn sweep(&self, now: OffsetDateTime) -> SweepReport {
        let mut report = SweepReport::default();

        let due = match games::find_expired_judgments(&self.state.db, now).await {
            Ok(ids) => ids,
            Err(err) => {
                error!(error = %err, "could not load expired judgments");
                report.failed += 1;
                return report;
            }
        };
        report.scanned = due.len();

        for game_id in due {
            match self.resolve_game(game_id, now).await {
                Ok(Some(outcome)) => {
                    report.resolved += 1;
                    publish_outcome(&self.state, &outcome).await;
                }
                Ok(None) => report.skipped += 1,
                Err(err) => {
                    report.failed += 1;
                    error!(game_id, error = %err, "failed to resolve expired judgment");
                }
            }
        }

        self.state.locks.prune_idle();
        self.state.rooms.prune_empty();
        report
    }

    async fn resolve_game(
        &self,
        game_id: i64,
        now: OffsetDateTime,
    ) -> Result<Option<GameFlowOutcome>, AppError> {
        let _guard = self.state.locks.acquire(game_id).await;
        let flow = GameFlowService::new(self.state.game_config);
        with_txn(&self.state, move |txn| {
            Box::pin(async move { flow.resolve_expired_judgment(txn, game_id, now).await })
        })
        .await
    }
}
