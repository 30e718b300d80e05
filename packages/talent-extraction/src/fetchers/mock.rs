//! Mock fetcher for testing.
//!
//! Provides a configurable mock implementation of the SourceFetcher trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{RawSource, SourceFetcher};
use crate::types::platform::SourceKind;

/// Mock fetcher for testing.
///
/// Serves canned sources, injects failures per locator, and records every
/// call. Locators without a canned source or failure get a source whose
/// content is the locator itself.
///
/// # Example
///
/// ```rust
/// use talent_extraction::fetchers::MockFetcher;
/// use talent_extraction::traits::fetcher::RawSource;
///
/// let mock = MockFetcher::new()
///     .with_source(RawSource::new("https://example.com", "# Hello"))
///     .with_failure("https://down.example", "HTTP 503");
/// ```
#[derive(Default)]
pub struct MockFetcher {
    /// Canned sources indexed by locator
    sources: Arc<RwLock<HashMap<String, RawSource>>>,
    /// Injected failures indexed by locator
    failures: Arc<RwLock<HashMap<String, FetchError>>>,
    /// Delay applied to every fetch
    latency: Duration,
    /// Track calls for verification
    calls: Arc<RwLock<Vec<(SourceKind, String)>>>,
    /// Fetches currently suspended
    active: Arc<AtomicUsize>,
    /// Highest number of overlapping fetches seen
    peak_active: Arc<AtomicUsize>,
}

impl MockFetcher {
    /// Create a new mock fetcher with no latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend every fetch for `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add a source that will be returned for its locator.
    pub fn add_source(&self, source: RawSource) {
        let mut sources = self.sources.write().unwrap();
        sources.insert(source.locator.clone(), source);
    }

    /// Builder form of [`add_source`](Self::add_source).
    pub fn with_source(self, source: RawSource) -> Self {
        self.add_source(source);
        self
    }

    /// Make fetches of `locator` fail as unavailable.
    pub fn with_failure(self, locator: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(locator.into(), FetchError::Unavailable(message.into()));
        self
    }

    /// Make fetches of `locator` fail with a specific error.
    pub fn with_error(self, locator: impl Into<String>, error: FetchError) -> Self {
        self.failures.write().unwrap().insert(locator.into(), error);
        self
    }

    /// Get the number of fetches made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get every `(kind, locator)` fetched, in call order.
    pub fn calls(&self) -> Vec<(SourceKind, String)> {
        self.calls.read().unwrap().clone()
    }

    /// Get the locators fetched as `kind`.
    pub fn calls_for(&self, kind: SourceKind) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, locator)| locator.clone())
            .collect()
    }

    /// Highest number of fetches that were in progress at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }

    /// Clear recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
        self.peak_active.store(0, Ordering::SeqCst);
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            sources: Arc::clone(&self.sources),
            failures: Arc::clone(&self.failures),
            latency: self.latency,
            calls: Arc::clone(&self.calls),
            active: Arc::clone(&self.active),
            peak_active: Arc::clone(&self.peak_active),
        }
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, kind: SourceKind, locator: &str) -> FetchResult<RawSource> {
        // Record the call
        self.calls
            .write()
            .unwrap()
            .push((kind, locator.to_string()));

        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now_active, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failures.read().unwrap().get(locator) {
            return Err(error.clone());
        }

        let canned = self.sources.read().unwrap().get(locator).cloned();
        Ok(canned.unwrap_or_else(|| RawSource::new(locator, locator)))
    }
}
