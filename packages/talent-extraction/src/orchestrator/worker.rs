//! Long-lived workers pulling from the shared task queue.
//!
//! ```text
//! submit ──► TaskBoard.queue ──► worker 1..=max_concurrent
//!                                   ├─► claim (Pending → Processing)
//!                                   ├─► adapter.extract(locator)
//!                                   ├─► settle (→ Completed | Failed)
//!                                   └─► callbacks, then claim again
//! ```
//!
//! The worker count is the concurrency bound. A worker that settles a task
//! goes straight back to the queue, so freed capacity is refilled at once.

use futures::FutureExt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::board::{ClaimedTask, Settlement, TaskBoard};
use crate::adapters::ExtractionAdapters;
use crate::error::ExtractionError;
use crate::types::records::ExtractionResult;

/// State shared between the orchestrator handle and its workers.
pub(crate) struct Shared {
    pub board: Mutex<TaskBoard>,
    /// Serialises callback delivery so progress counts arrive in order
    callback_gate: Mutex<()>,
    /// Signalled when tasks are queued
    pub wakeup: Notify,
    /// Signalled after every settlement
    pub settled: Notify,
    pub adapters: Arc<ExtractionAdapters>,
    pub max_concurrent: usize,
}

impl Shared {
    pub fn new(adapters: Arc<ExtractionAdapters>, max_concurrent: usize) -> Self {
        Self {
            board: Mutex::new(TaskBoard::default()),
            callback_gate: Mutex::new(()),
            wakeup: Notify::new(),
            settled: Notify::new(),
            adapters,
            max_concurrent,
        }
    }

    pub fn board(&self) -> MutexGuard<'_, TaskBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until a task can be claimed.
    async fn next_task(&self) -> ClaimedTask {
        loop {
            let (claimed, more_queued) = {
                let mut board = self.board();
                let claimed = board.claim_next(self.max_concurrent);
                (claimed, board.queued() > 0)
            };
            if let Some(claimed) = claimed {
                if more_queued {
                    self.wakeup.notify_one();
                }
                return claimed;
            }
            self.wakeup.notified().await;
        }
    }

    /// Record an outcome, then deliver callbacks outside the board lock.
    fn finish(&self, claimed: &ClaimedTask, outcome: Result<ExtractionResult, ExtractionError>) {
        if let Err(e) = &outcome {
            warn!(
                job_id = %claimed.job_id,
                task_id = %claimed.task_id,
                locator = %claimed.locator,
                error = %e,
                "task failed"
            );
        }

        // Gate before board: a callback holding the gate may read the board.
        let gate = self.callback_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let settlement = self
            .board()
            .settle(claimed.task_id, outcome.map_err(|e| e.to_string()));
        let Some(settlement) = settlement else {
            warn!(task_id = %claimed.task_id, "settled a task that was not in flight");
            return;
        };

        debug!(
            job_id = %settlement.job_id,
            task_id = %claimed.task_id,
            settled = settlement.settled,
            total = settlement.total,
            "task settled"
        );
        if settlement.job_complete() {
            info!(job_id = %settlement.job_id, total = settlement.total, "bulk job complete");
        }

        deliver(&settlement);
        drop(gate);

        self.settled.notify_waiters();
    }
}

fn deliver(settlement: &Settlement) {
    let callbacks = &settlement.callbacks;

    if let (Some(on_item_complete), Some(result)) =
        (callbacks.on_item_complete.as_ref(), settlement.result.as_ref())
    {
        let delivered =
            catch_unwind(AssertUnwindSafe(|| on_item_complete(&settlement.locator, result)));
        if delivered.is_err() {
            warn!(job_id = %settlement.job_id, "on_item_complete callback panicked");
        }
    }

    if let Some(on_progress) = callbacks.on_progress.as_ref() {
        let delivered = catch_unwind(AssertUnwindSafe(|| {
            on_progress(settlement.settled, settlement.total)
        }));
        if delivered.is_err() {
            warn!(job_id = %settlement.job_id, "on_progress callback panicked");
        }
    }
}

/// Worker loop. Runs until `shutdown` is cancelled while idle.
pub(crate) async fn run_worker(worker_id: usize, shared: Arc<Shared>, shutdown: CancellationToken) {
    debug!(worker_id, "worker started");

    loop {
        let claimed = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            claimed = shared.next_task() => claimed,
        };

        debug!(
            worker_id,
            job_id = %claimed.job_id,
            task_id = %claimed.task_id,
            platform = %claimed.platform,
            locator = %claimed.locator,
            "dispatching task"
        );

        let outcome = AssertUnwindSafe(
            shared
                .adapters
                .extract_for_platform(claimed.platform, &claimed.locator),
        )
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            Err(ExtractionError::ExtractionFailed {
                locator: claimed.locator.clone(),
                diagnostic: "adapter panicked".into(),
            })
        });

        shared.finish(&claimed, outcome);
    }

    debug!(worker_id, "worker stopped");
}
