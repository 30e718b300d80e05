//! Job-board posting adapter.

use async_trait::async_trait;

use super::{require_content, AdapterContext, Extractor};
use crate::error::Result;
use crate::traits::fetcher::RawSource;
use crate::types::platform::SourceKind;
use crate::types::records::{ExtractionResult, JobPostingRecord};

pub struct JobBoardAdapter {
    context: AdapterContext,
}

impl JobBoardAdapter {
    pub fn new(context: AdapterContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Extractor for JobBoardAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::JobBoard
    }

    async fn extract(&self, locator: &str) -> Result<ExtractionResult> {
        let raw = self.context.acquire(self.kind(), locator).await?;
        let raw = require_content(raw)?;
        Ok(ExtractionResult::JobPosting(structure_posting(&raw)))
    }
}

/// Build a posting record. Bullet lines become requirements.
pub fn structure_posting(raw: &RawSource) -> JobPostingRecord {
    let requirements = raw
        .content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(|req| req.trim().to_string())
        .filter(|req| !req.is_empty())
        .collect();

    let title = raw
        .title
        .clone()
        .or_else(|| {
            raw.content
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(String::from)
        })
        .unwrap_or_default();

    JobPostingRecord {
        locator: raw.locator.clone(),
        title,
        company: raw.meta("company").map(String::from),
        location: raw.meta("location").map(String::from),
        description: raw.content.trim().to_string(),
        requirements,
        salary: raw.meta("salary").map(String::from),
    }
}
