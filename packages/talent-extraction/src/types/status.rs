//! Aggregate read model for a bulk job.

use serde::{Deserialize, Serialize};

use super::records::ExtractionResult;
use super::task::{JobId, ScrapingTask, TaskStatus};

/// A completed task's locator and result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedItem {
    pub locator: String,
    pub result: ExtractionResult,
}

/// Progress snapshot of a bulk job, computed from current task state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkJobStatus {
    pub job_id: JobId,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub processing: usize,
    pub pending: usize,
    pub is_complete: bool,
    /// Completed tasks in submission order
    pub results: Vec<CompletedItem>,
}

impl BulkJobStatus {
    /// Aggregate a job's tasks, given in submission order.
    pub fn from_tasks<'a>(job_id: JobId, tasks: impl IntoIterator<Item = &'a ScrapingTask>) -> Self {
        let mut status = Self {
            job_id,
            total: 0,
            completed: 0,
            failed: 0,
            processing: 0,
            pending: 0,
            is_complete: false,
            results: Vec::new(),
        };

        for task in tasks {
            status.total += 1;
            match task.status {
                TaskStatus::Pending => status.pending += 1,
                TaskStatus::Processing => status.processing += 1,
                TaskStatus::Failed => status.failed += 1,
                TaskStatus::Completed => {
                    status.completed += 1;
                    if let Some(result) = &task.result {
                        status.results.push(CompletedItem {
                            locator: task.locator.clone(),
                            result: result.clone(),
                        });
                    }
                }
            }
        }

        status.is_complete = status.completed + status.failed == status.total;
        status
    }

    /// Tasks that reached a terminal state.
    pub fn settled(&self) -> usize {
        self.completed + self.failed
    }
}
