//! Task state owned by one orchestrator.
//!
//! Holds the task records, the FIFO queue, the in-flight set and the
//! job → task index. All mutation goes through the methods here, under the
//! orchestrator's lock.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};

use super::callbacks::JobCallbacks;
use crate::types::platform::Platform;
use crate::types::records::ExtractionResult;
use crate::types::status::BulkJobStatus;
use crate::types::task::{JobId, ScrapingTask, TaskId};

/// Tasks of one job, in submission order.
#[derive(Debug)]
struct JobEntry {
    task_ids: Vec<TaskId>,
    settled: usize,
    callbacks: JobCallbacks,
}

/// A task handed to a worker.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClaimedTask {
    pub job_id: JobId,
    pub task_id: TaskId,
    pub locator: String,
    pub platform: Platform,
}

/// What a worker reports after settling a task.
#[derive(Debug)]
pub(crate) struct Settlement {
    pub job_id: JobId,
    pub locator: String,
    pub settled: usize,
    pub total: usize,
    pub result: Option<ExtractionResult>,
    pub callbacks: JobCallbacks,
}

impl Settlement {
    pub fn job_complete(&self) -> bool {
        self.settled == self.total
    }
}

#[derive(Debug, Default)]
pub(crate) struct TaskBoard {
    tasks: HashMap<TaskId, ScrapingTask>,
    task_jobs: HashMap<TaskId, JobId>,
    queue: VecDeque<TaskId>,
    in_flight: HashSet<TaskId>,
    jobs: IndexMap<JobId, JobEntry>,
}

impl TaskBoard {
    /// Register a job's pending tasks and queue them in order.
    pub fn add_job(&mut self, job_id: JobId, tasks: Vec<ScrapingTask>, callbacks: JobCallbacks) {
        let task_ids: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();

        for task in tasks {
            self.task_jobs.insert(task.id, job_id.clone());
            self.queue.push_back(task.id);
            self.tasks.insert(task.id, task);
        }

        self.jobs.insert(
            job_id,
            JobEntry {
                task_ids,
                settled: 0,
                callbacks,
            },
        );
    }

    /// Dequeue the oldest pending task and mark it processing.
    ///
    /// Returns `None` when the queue is empty or `limit` tasks are already
    /// in flight.
    pub fn claim_next(&mut self, limit: usize) -> Option<ClaimedTask> {
        if self.in_flight.len() >= limit {
            return None;
        }

        while let Some(task_id) = self.queue.pop_front() {
            let Some(task) = self.tasks.get_mut(&task_id) else {
                continue;
            };
            if !task.start() {
                continue;
            }
            let Some(job_id) = self.task_jobs.get(&task_id) else {
                continue;
            };

            self.in_flight.insert(task_id);
            return Some(ClaimedTask {
                job_id: job_id.clone(),
                task_id,
                locator: task.locator.clone(),
                platform: task.platform,
            });
        }

        None
    }

    /// Record a processing task's outcome and release its slot.
    ///
    /// Returns `None` if the task was not in flight.
    pub fn settle(
        &mut self,
        task_id: TaskId,
        outcome: Result<ExtractionResult, String>,
    ) -> Option<Settlement> {
        if !self.in_flight.remove(&task_id) {
            return None;
        }

        let task = self.tasks.get_mut(&task_id)?;
        if !task.settle(outcome) {
            return None;
        }
        let locator = task.locator.clone();
        let result = task.result.clone();

        let job_id = self.task_jobs.get(&task_id)?.clone();
        let entry = self.jobs.get_mut(&job_id)?;
        entry.settled += 1;

        Some(Settlement {
            job_id,
            locator,
            settled: entry.settled,
            total: entry.task_ids.len(),
            result,
            callbacks: entry.callbacks.clone(),
        })
    }

    /// Aggregate status of a job, or `None` if unknown.
    pub fn status(&self, job_id: &str) -> Option<BulkJobStatus> {
        let (job_id, entry) = self.jobs.get_key_value(job_id)?;
        let tasks = entry.task_ids.iter().filter_map(|id| self.tasks.get(id));
        Some(BulkJobStatus::from_tasks(job_id.clone(), tasks))
    }

    /// Snapshots of a job's tasks in submission order.
    pub fn tasks(&self, job_id: &str) -> Option<Vec<ScrapingTask>> {
        let entry = self.jobs.get(job_id)?;
        Some(
            entry
                .task_ids
                .iter()
                .filter_map(|id| self.tasks.get(id).cloned())
                .collect(),
        )
    }

    pub fn job_ids(&self) -> Vec<JobId> {
        self.jobs.keys().cloned().collect()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::WebpageRecord;
    use crate::types::task::TaskStatus;

    fn page(locator: &str) -> ExtractionResult {
        ExtractionResult::Webpage(WebpageRecord {
            locator: locator.into(),
            title: None,
            description: None,
            content: String::new(),
            links: vec![],
        })
    }

    fn board_with(locators: &[&str]) -> (TaskBoard, JobId) {
        let mut board = TaskBoard::default();
        let job_id = JobId::generate();
        let tasks = locators
            .iter()
            .map(|l| ScrapingTask::new(*l, Platform::Unknown))
            .collect();
        board.add_job(job_id.clone(), tasks, JobCallbacks::default());
        (board, job_id)
    }

    #[test]
    fn test_claims_in_fifo_order_up_to_limit() {
        let (mut board, _) = board_with(&["a", "b", "c"]);

        let first = board.claim_next(2).unwrap();
        let second = board.claim_next(2).unwrap();
        assert_eq!(first.locator, "a");
        assert_eq!(second.locator, "b");
        assert!(board.claim_next(2).is_none());
        assert_eq!(board.in_flight(), 2);
        assert_eq!(board.queued(), 1);

        board.settle(first.task_id, Ok(page("a"))).unwrap();
        let third = board.claim_next(2).unwrap();
        assert_eq!(third.locator, "c");
    }

    #[test]
    fn test_settlement_counts_and_status() {
        let (mut board, job_id) = board_with(&["a", "b"]);

        let a = board.claim_next(5).unwrap();
        let b = board.claim_next(5).unwrap();

        let status = board.status(job_id.as_str()).unwrap();
        assert_eq!((status.processing, status.pending), (2, 0));

        let s = board.settle(b.task_id, Err("boom".into())).unwrap();
        assert_eq!((s.settled, s.total), (1, 2));
        assert!(s.result.is_none());
        assert!(!s.job_complete());

        let s = board.settle(a.task_id, Ok(page("a"))).unwrap();
        assert_eq!((s.settled, s.total), (2, 2));
        assert!(s.result.is_some());
        assert!(s.job_complete());

        let status = board.status(job_id.as_str()).unwrap();
        assert!(status.is_complete);
        assert_eq!((status.completed, status.failed), (1, 1));
        assert_eq!(board.in_flight(), 0);
    }

    #[test]
    fn test_double_settle_ignored() {
        let (mut board, job_id) = board_with(&["a"]);
        let a = board.claim_next(1).unwrap();
        assert!(board.settle(a.task_id, Ok(page("a"))).is_some());
        assert!(board.settle(a.task_id, Err("late".into())).is_none());

        let tasks = board.tasks(job_id.as_str()).unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Completed);
    }

    #[test]
    fn test_jobs_are_isolated() {
        let mut board = TaskBoard::default();
        let first = JobId::generate();
        let second = JobId::generate();
        board.add_job(
            first.clone(),
            vec![ScrapingTask::new("a", Platform::Unknown)],
            JobCallbacks::default(),
        );
        board.add_job(
            second.clone(),
            vec![
                ScrapingTask::new("b", Platform::Unknown),
                ScrapingTask::new("c", Platform::Unknown),
            ],
            JobCallbacks::default(),
        );

        assert_eq!(board.status(first.as_str()).unwrap().total, 1);
        assert_eq!(board.status(second.as_str()).unwrap().total, 2);
        assert_eq!(board.job_ids(), vec![first, second]);
        assert!(board.status("missing").is_none());
        assert!(board.tasks("missing").is_none());
    }
}
