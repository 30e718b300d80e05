//! Core trait abstractions for the extraction pipeline.
//!
//! - [`fetcher::SourceFetcher`] - reads raw sources (network, documents, OCR)
//! - [`parser::ResumeParser`] - derives structured fields from document text

pub mod fetcher;
pub mod parser;
