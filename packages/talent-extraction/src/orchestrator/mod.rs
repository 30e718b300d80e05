//! Bulk job orchestration with bounded concurrency.
//!
//! A bulk job is a batch of locators submitted together. Each locator
//! becomes a [`ScrapingTask`] that is classified, queued in submission
//! order, and run by one of `max_concurrent` workers through the adapter
//! its platform maps to. A failing task is recorded on that task only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use talent_extraction::{BulkJobOrchestrator, JobCallbacks, PipelineConfig};
//!
//! let orchestrator = BulkJobOrchestrator::from_config(&PipelineConfig::default());
//! let job_id = orchestrator.submit(
//!     ["https://linkedin.com/in/jane", "https://github.com/jane"],
//!     JobCallbacks::new().on_progress(|done, total| println!("{done}/{total}")),
//! )?;
//!
//! let status = orchestrator.wait_for_completion(job_id.as_str()).await?;
//! assert!(status.is_complete);
//! ```

mod board;
mod callbacks;
mod worker;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::ExtractionAdapters;
use crate::classifier::PlatformClassifier;
use crate::error::{ExtractionError, Result};
use crate::types::config::PipelineConfig;
use crate::types::status::BulkJobStatus;
use crate::types::task::{JobId, ScrapingTask};

pub use callbacks::{ItemCompleteFn, JobCallbacks, ProgressFn};
use worker::{run_worker, Shared};

/// Runs batches of extraction tasks through a fixed worker pool.
///
/// Each orchestrator owns its tasks, queue and job index. Workers stop
/// once the orchestrator is dropped and they are idle.
pub struct BulkJobOrchestrator {
    shared: Arc<Shared>,
    classifier: PlatformClassifier,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for BulkJobOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let board = self.shared.board();
        f.debug_struct("BulkJobOrchestrator")
            .field("max_concurrent", &self.shared.max_concurrent)
            .field("jobs", &board.job_ids().len())
            .field("in_flight", &board.in_flight())
            .field("queued", &board.queued())
            .finish()
    }
}

impl BulkJobOrchestrator {
    /// Start an orchestrator with `max_concurrent` workers.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime, since the workers are
    /// spawned immediately.
    pub fn new(adapters: Arc<ExtractionAdapters>, max_concurrent: usize) -> Self {
        let max_concurrent = if max_concurrent == 0 {
            warn!("max_concurrent of 0 would never run a task, using 1");
            1
        } else {
            max_concurrent
        };

        let shared = Arc::new(Shared::new(adapters, max_concurrent));
        let shutdown = CancellationToken::new();

        for worker_id in 0..max_concurrent {
            tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&shared),
                shutdown.child_token(),
            ));
        }

        Self {
            shared,
            classifier: PlatformClassifier::new(),
            shutdown,
        }
    }

    /// Orchestrator over simulated adapters built from `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            Arc::new(ExtractionAdapters::simulated(config)),
            config.max_concurrent,
        )
    }

    /// Replace the classifier used at submission.
    pub fn with_classifier(mut self, classifier: PlatformClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.shared.max_concurrent
    }

    pub fn adapters(&self) -> &Arc<ExtractionAdapters> {
        &self.shared.adapters
    }

    /// Queue a batch and return its job id without waiting for any task.
    ///
    /// Fails with `InvalidArgument` on an empty batch, in which case no job
    /// is created.
    pub fn submit<I, S>(&self, locators: I, callbacks: JobCallbacks) -> Result<JobId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tasks: Vec<ScrapingTask> = locators
            .into_iter()
            .map(|locator| {
                let locator = locator.into();
                let platform = self.classifier.classify(&locator);
                ScrapingTask::new(locator, platform)
            })
            .collect();

        if tasks.is_empty() {
            return Err(ExtractionError::invalid_argument("batch must contain at least one locator"));
        }

        let job_id = JobId::generate();
        let count = tasks.len();
        self.shared.board().add_job(job_id.clone(), tasks, callbacks);

        info!(job_id = %job_id, tasks = count, "bulk job submitted");

        // Each idle worker takes one wakeup. A worker that claims while more
        // work is queued passes the wakeup on.
        for _ in 0..count.min(self.shared.max_concurrent) {
            self.shared.wakeup.notify_one();
        }

        Ok(job_id)
    }

    /// Current aggregate status of a job.
    pub fn get_status(&self, job_id: &str) -> Result<BulkJobStatus> {
        self.shared
            .board()
            .status(job_id)
            .ok_or_else(|| job_not_found(job_id))
    }

    /// Snapshots of every task in a job, in submission order.
    pub fn tasks(&self, job_id: &str) -> Result<Vec<ScrapingTask>> {
        self.shared
            .board()
            .tasks(job_id)
            .ok_or_else(|| job_not_found(job_id))
    }

    /// Every job id submitted so far, oldest first.
    pub fn job_ids(&self) -> Vec<JobId> {
        self.shared.board().job_ids()
    }

    /// Suspend until every task of the job is terminal.
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<BulkJobStatus> {
        loop {
            let notified = self.shared.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let status = self.get_status(job_id)?;
            if status.is_complete {
                return Ok(status);
            }

            notified.await;
        }
    }
}

impl Drop for BulkJobOrchestrator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn job_not_found(job_id: &str) -> ExtractionError {
    ExtractionError::JobNotFound {
        job_id: job_id.to_string(),
    }
}
