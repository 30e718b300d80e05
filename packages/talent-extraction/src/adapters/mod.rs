//! Extraction adapters, one per source kind.
//!
//! Every adapter follows the same contract:
//!
//! 1. reject an empty locator with `InvalidArgument`
//! 2. admit through the shared [`RateLimiter`] under its own category
//! 3. fetch the raw source (the slow part) and structure it
//!
//! Fetch failures surface as `ExtractionFailed`; limiter rejections pass
//! through unchanged.

pub mod document;
pub mod image;
pub mod job_board;
pub mod profile;
pub mod skills;
pub mod webpage;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::fetchers::SimulatedFetcher;
use crate::rate_limit::RateLimiter;
use crate::traits::fetcher::{RawSource, SourceFetcher};
use crate::traits::parser::{LabeledResumeParser, ResumeParser};
use crate::types::config::PipelineConfig;
use crate::types::platform::{Platform, SourceKind};
use crate::types::records::ExtractionResult;

pub use document::{fallback_parse, DocumentAdapter};
pub use image::ImageAdapter;
pub use job_board::JobBoardAdapter;
pub use profile::ProfileAdapter;
pub use webpage::WebpageAdapter;

/// A single extraction capability.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// The kind of source this adapter reads.
    fn kind(&self) -> SourceKind;

    /// Extract a structured record from `locator`.
    async fn extract(&self, locator: &str) -> Result<ExtractionResult>;
}

/// Shared front half of every adapter: validation, admission, fetch.
#[derive(Clone)]
pub struct AdapterContext {
    limiter: Arc<RateLimiter>,
    fetcher: Arc<dyn SourceFetcher>,
}

impl AdapterContext {
    pub fn new(limiter: Arc<RateLimiter>, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self { limiter, fetcher }
    }

    /// Validate, admit and fetch `locator` as `kind`.
    pub async fn acquire(&self, kind: SourceKind, locator: &str) -> Result<RawSource> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(ExtractionError::invalid_argument("locator must not be empty"));
        }

        self.limiter.admit(kind.category())?;

        debug!(%kind, locator, "fetching source");
        self.fetcher
            .fetch(kind, locator)
            .await
            .map_err(|e| extraction_failed(locator, e))
    }
}

/// Wrap any failure of the underlying work for `locator`.
pub(crate) fn extraction_failed(locator: &str, diagnostic: impl ToString) -> ExtractionError {
    ExtractionError::ExtractionFailed {
        locator: locator.to_string(),
        diagnostic: diagnostic.to_string(),
    }
}

/// Reject sources that came back without any text.
pub(crate) fn require_content(raw: RawSource) -> Result<RawSource> {
    if raw.has_content() {
        Ok(raw)
    } else {
        Err(extraction_failed(&raw.locator, "source returned no content"))
    }
}

/// The five adapters around one limiter and one fetcher.
pub struct ExtractionAdapters {
    limiter: Arc<RateLimiter>,
    profile: ProfileAdapter,
    job_board: JobBoardAdapter,
    document: DocumentAdapter,
    image: ImageAdapter,
    webpage: WebpageAdapter,
}

impl ExtractionAdapters {
    /// Build adapters over the given fetcher, parser and limiter.
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        parser: Arc<dyn ResumeParser>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        let context = AdapterContext::new(Arc::clone(&limiter), fetcher);
        Self {
            limiter,
            profile: ProfileAdapter::new(context.clone()),
            job_board: JobBoardAdapter::new(context.clone()),
            document: DocumentAdapter::new(context.clone(), parser),
            image: ImageAdapter::new(context.clone()),
            webpage: WebpageAdapter::new(context),
        }
    }

    /// Adapters backed by the simulated fetcher and the labelled-field parser.
    pub fn simulated(config: &PipelineConfig) -> Self {
        Self::new(
            Arc::new(SimulatedFetcher::new(config.simulated_latency)),
            Arc::new(LabeledResumeParser),
            Arc::new(RateLimiter::new(config.rate_limit_per_minute)),
        )
    }

    /// The limiter every adapter admits through.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Look up the adapter for a source kind.
    pub fn adapter(&self, kind: SourceKind) -> &dyn Extractor {
        match kind {
            SourceKind::Profile => &self.profile,
            SourceKind::JobBoard => &self.job_board,
            SourceKind::Document => &self.document,
            SourceKind::Image => &self.image,
            SourceKind::Webpage => &self.webpage,
        }
    }

    /// Run the adapter for `kind`.
    pub async fn extract(&self, kind: SourceKind, locator: &str) -> Result<ExtractionResult> {
        self.adapter(kind).extract(locator).await
    }

    /// Run the adapter a classified platform dispatches to.
    pub async fn extract_for_platform(
        &self,
        platform: Platform,
        locator: &str,
    ) -> Result<ExtractionResult> {
        self.extract(platform.adapter(), locator).await
    }

    pub async fn extract_profile(&self, locator: &str) -> Result<ExtractionResult> {
        self.profile.extract(locator).await
    }

    pub async fn extract_job_board(&self, locator: &str) -> Result<ExtractionResult> {
        self.job_board.extract(locator).await
    }

    pub async fn extract_document(&self, locator: &str) -> Result<ExtractionResult> {
        self.document.extract(locator).await
    }

    pub async fn extract_image(&self, locator: &str) -> Result<ExtractionResult> {
        self.image.extract(locator).await
    }

    pub async fn extract_webpage(&self, locator: &str) -> Result<ExtractionResult> {
        self.webpage.extract(locator).await
    }
}
