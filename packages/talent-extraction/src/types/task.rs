//! Task and job identifiers and the per-task lifecycle record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

use super::platform::Platform;
use super::records::ExtractionResult;

/// Identifier of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh, time-ordered job id.
    pub fn generate() -> Self {
        Self(format!("bulk_{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task_{}", self.0.simple())
    }
}

/// Lifecycle state of a task.
///
/// Transitions only move forward: Pending → Processing → Completed | Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One unit of extraction work bound to a single locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingTask {
    pub id: TaskId,
    pub locator: String,
    pub platform: Platform,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<ExtractionResult>,
    pub error: Option<String>,
}

impl ScrapingTask {
    /// Create a pending task.
    pub fn new(locator: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: TaskId::generate(),
            locator: locator.into(),
            platform,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// Move a pending task to processing.
    ///
    /// Returns false (and changes nothing) if the task already left Pending.
    pub fn start(&mut self) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::Processing;
        self.started_at = Some(Utc::now());
        true
    }

    /// Record the outcome of a processing task.
    ///
    /// Returns false (and changes nothing) unless the task is processing.
    pub fn settle(&mut self, outcome: Result<ExtractionResult, String>) -> bool {
        if self.status != TaskStatus::Processing {
            return false;
        }
        match outcome {
            Ok(result) => {
                self.status = TaskStatus::Completed;
                self.result = Some(result);
            }
            Err(error) => {
                self.status = TaskStatus::Failed;
                self.error = Some(error);
            }
        }
        self.completed_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::WebpageRecord;

    fn page() -> ExtractionResult {
        ExtractionResult::Webpage(WebpageRecord {
            locator: "https://example.com".into(),
            title: None,
            description: None,
            content: String::new(),
            links: vec![],
        })
    }

    #[test]
    fn test_lifecycle_moves_forward_only() {
        let mut task = ScrapingTask::new("https://example.com", Platform::Unknown);
        assert_eq!(task.status, TaskStatus::Pending);

        // Cannot settle before starting
        assert!(!task.settle(Ok(page())));

        assert!(task.start());
        assert!(task.started_at.is_some());
        assert!(!task.start());

        assert!(task.settle(Ok(page())));
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed_at.is_some());

        // Terminal tasks are immutable
        assert!(!task.settle(Err("late".into())));
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.error.is_none());
    }

    #[test]
    fn test_failed_task_keeps_error() {
        let mut task = ScrapingTask::new("https://example.com", Platform::Unknown);
        task.start();
        task.settle(Err("boom".into()));
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("boom"));
        assert!(task.result.is_none());
        assert!(task.status.is_terminal());
    }

    #[test]
    fn test_job_ids_are_unique_and_prefixed() {
        let a = JobId::generate();
        let b = JobId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("bulk_"));
    }
}
