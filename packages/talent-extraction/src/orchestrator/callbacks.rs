//! Optional per-job progress hooks.

use std::fmt;
use std::sync::Arc;

use crate::types::records::ExtractionResult;

/// Called with `(settled, total)` after every task settles.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Called with `(locator, result)` after a task completes successfully.
pub type ItemCompleteFn = dyn Fn(&str, &ExtractionResult) + Send + Sync;

/// Hooks attached to one submitted job.
///
/// Hooks fire in completion order, which is not submission order. They run
/// on a worker, outside the orchestrator's state lock, so they may call
/// back into the orchestrator.
#[derive(Clone, Default)]
pub struct JobCallbacks {
    pub(crate) on_progress: Option<Arc<ProgressFn>>,
    pub(crate) on_item_complete: Option<Arc<ItemCompleteFn>>,
}

impl JobCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `(settled, total)` after each task settles, success or not.
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(f));
        self
    }

    /// Report each successful task's locator and result.
    pub fn on_item_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &ExtractionResult) + Send + Sync + 'static,
    {
        self.on_item_complete = Some(Arc::new(f));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_progress.is_none() && self.on_item_complete.is_none()
    }
}

impl fmt::Debug for JobCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobCallbacks")
            .field("on_progress", &self.on_progress.is_some())
            .field("on_item_complete", &self.on_item_complete.is_some())
            .finish()
    }
}
