//! Generic webpage adapter; also the default for unclassified locators.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use super::{require_content, AdapterContext, Extractor};
use crate::error::Result;
use crate::traits::fetcher::RawSource;
use crate::types::platform::SourceKind;
use crate::types::records::{ExtractionResult, WebpageRecord};

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]]+"#).unwrap());

pub struct WebpageAdapter {
    context: AdapterContext,
}

impl WebpageAdapter {
    pub fn new(context: AdapterContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Extractor for WebpageAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Webpage
    }

    async fn extract(&self, locator: &str) -> Result<ExtractionResult> {
        let raw = self.context.acquire(self.kind(), locator).await?;
        let raw = require_content(raw)?;
        Ok(ExtractionResult::Webpage(structure_webpage(&raw)))
    }
}

/// Build a webpage record; links are de-duplicated in page order.
pub fn structure_webpage(raw: &RawSource) -> WebpageRecord {
    WebpageRecord {
        locator: raw.locator.clone(),
        title: raw.title.clone(),
        description: raw.meta("description").map(String::from),
        content: raw.content.trim().to_string(),
        links: extract_links(&raw.content),
    }
}

pub fn extract_links(content: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for m in RE_LINK.find_iter(content) {
        let link = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if !links.iter().any(|l| l == link) {
            links.push(link.to_string());
        }
    }
    links
}
