//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction
//! pipeline without real time, real parsers or real callbacks.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{DerivationError, DerivationResult};
use crate::orchestrator::JobCallbacks;
use crate::rate_limit::Clock;
use crate::traits::parser::{DerivedFields, ResumeParser};
use crate::types::records::ExtractionResult;

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Start the clock at `millis` since the epoch.
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// A resume parser that always fails.
#[derive(Debug, Default)]
pub struct FailingParser {
    calls: AtomicUsize,
}

impl FailingParser {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeParser for FailingParser {
    async fn derive(&self, _text: &str) -> DerivationResult<DerivedFields> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DerivationError::Service("derivation service unavailable".into()))
    }
}

/// A resume parser that panics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanickingParser;

#[async_trait]
impl ResumeParser for PanickingParser {
    async fn derive(&self, _text: &str) -> DerivationResult<DerivedFields> {
        panic!("malformed model response")
    }
}

/// Record of a callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Progress { done: usize, total: usize },
    ItemComplete { locator: String, result: ExtractionResult },
}

/// Collects orchestrator callbacks for assertions.
#[derive(Debug, Default, Clone)]
pub struct CallbackRecorder {
    events: Arc<RwLock<Vec<CallbackEvent>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks that append to this recorder.
    pub fn callbacks(&self) -> JobCallbacks {
        let progress = Arc::clone(&self.events);
        let items = Arc::clone(&self.events);
        JobCallbacks::new()
            .on_progress(move |done, total| {
                progress
                    .write()
                    .unwrap()
                    .push(CallbackEvent::Progress { done, total });
            })
            .on_item_complete(move |locator, result| {
                items.write().unwrap().push(CallbackEvent::ItemComplete {
                    locator: locator.to_string(),
                    result: result.clone(),
                });
            })
    }

    pub fn events(&self) -> Vec<CallbackEvent> {
        self.events.read().unwrap().clone()
    }

    /// `(done, total)` pairs in the order reported.
    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                CallbackEvent::Progress { done, total } => Some((*done, *total)),
                _ => None,
            })
            .collect()
    }

    /// Locators reported complete, in completion order.
    pub fn completed_locators(&self) -> Vec<String> {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                CallbackEvent::ItemComplete { locator, .. } => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }
}
