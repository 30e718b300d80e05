//! Fetcher trait for the opaque, slow part of extraction.
//!
//! A fetcher stands for whatever actually reads a source: an HTTP client,
//! a PDF reader, an OCR engine. Adapters only see the [`RawSource`] it
//! returns and turn that into a structured record.
//!
//! # Usage
//!
//! ```rust,ignore
//! use talent_extraction::{SourceFetcher, SourceKind};
//!
//! let raw = fetcher.fetch(SourceKind::Webpage, "https://example.com").await?;
//! println!("{} bytes", raw.content_length());
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::FetchResult;
use crate::types::platform::SourceKind;

/// Raw source content before an adapter structures it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSource {
    /// Locator this content was read from
    pub locator: String,

    /// Text content (page text, document text or OCR lines)
    pub content: String,

    /// Title if the source has one
    pub title: Option<String>,

    /// SHA-256 hash of the content
    pub content_hash: String,

    /// When the content was fetched
    pub fetched_at: DateTime<Utc>,

    /// Source-specific fields (e.g. `headline`, `company`, `confidence`)
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl RawSource {
    /// Create a raw source with minimal fields.
    pub fn new(locator: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            locator: locator.into(),
            content_hash: hash_content(&content),
            content,
            title: None,
            fetched_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a metadata key-value pair.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata value, ignoring blank entries.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Get content length in bytes.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// Check if this source has content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Hex-encoded SHA-256 of some content.
pub fn hash_content(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Reads sources for the extraction adapters.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Read the source behind `locator` as the given kind.
    ///
    /// This is where latency lives; implementations should suspend rather
    /// than block.
    async fn fetch(&self, kind: SourceKind, locator: &str) -> FetchResult<RawSource>;
}

#[async_trait]
impl<F: SourceFetcher + ?Sized> SourceFetcher for std::sync::Arc<F> {
    async fn fetch(&self, kind: SourceKind, locator: &str) -> FetchResult<RawSource> {
        (**self).fetch(kind, locator).await
    }
}
