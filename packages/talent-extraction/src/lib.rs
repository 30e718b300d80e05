//! Candidate Source Extraction Library
//!
//! Turns candidate locators (profile URLs, resume documents, portfolio
//! pages, images) into structured records, and runs batches of them as bulk
//! jobs with a bounded number of extractions in flight.
//!
//! # Pieces
//!
//! - [`classifier`] maps a locator to a [`Platform`] (total, never fails)
//! - [`rate_limit`] admits requests per category per fixed one-minute window
//! - [`adapters`] extract one source kind each, behind the shared limiter
//! - [`orchestrator`] queues tasks, runs them on a worker pool and reports
//!   aggregate job status
//!
//! # Usage
//!
//! ```rust,ignore
//! use talent_extraction::{BulkJobOrchestrator, JobCallbacks, PipelineConfig};
//!
//! let config = PipelineConfig::from_env()?;
//! let orchestrator = BulkJobOrchestrator::from_config(&config);
//!
//! let job_id = orchestrator.submit(
//!     ["https://linkedin.com/in/jane", "https://jane.dev/resume.pdf"],
//!     JobCallbacks::new(),
//! )?;
//!
//! let status = orchestrator.wait_for_completion(job_id.as_str()).await?;
//! for item in &status.results {
//!     println!("{} -> {:?}", item.locator, item.result.source_kind());
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - seams for reading sources and deriving resume fields
//! - [`fetchers`] - simulated and mock source fetchers
//! - [`types`] - platforms, records, tasks, job status and configuration
//! - [`testing`] - clocks, parsers and callback recorders for tests

pub mod adapters;
pub mod classifier;
pub mod error;
pub mod fetchers;
pub mod orchestrator;
pub mod rate_limit;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use adapters::{ExtractionAdapters, Extractor};
pub use classifier::{classify, is_valid_profile_locator, PlatformClassifier};
pub use error::{ConfigError, DerivationError, ExtractionError, FetchError};
pub use fetchers::{MockFetcher, SimulatedFetcher};
pub use orchestrator::{BulkJobOrchestrator, JobCallbacks};
pub use rate_limit::{Clock, RateLimiter, SystemClock};
pub use traits::{
    fetcher::{RawSource, SourceFetcher},
    parser::{DerivedFields, LabeledResumeParser, ResumeParser},
};
pub use types::{
    config::PipelineConfig,
    platform::{Platform, SourceKind},
    records::{
        BoundingBox, Derivation, DocumentRecord, DocumentSection, ExperienceEntry,
        ExtractionResult, ImageRecord, JobPostingRecord, PersonalInfo, ProfileRecord, TextBlock,
        WebpageRecord,
    },
    status::{BulkJobStatus, CompletedItem},
    task::{JobId, ScrapingTask, TaskId, TaskStatus},
};
