//! Document (resume) adapter.
//!
//! Documents go through two steps after the fetch: layout sectioning, which
//! cannot fail, and structured-field derivation through a [`ResumeParser`].
//! When derivation fails for any reason, including a panic inside the
//! parser, [`fallback_parse`] fills the fields instead and the extraction
//! still succeeds.

use async_trait::async_trait;
use futures::FutureExt;
use regex::Regex;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, LazyLock};
use tracing::warn;

use super::skills::scan_skills;
use super::{AdapterContext, Extractor};
use crate::error::{DerivationError, Result};
use crate::traits::parser::{DerivedFields, ResumeParser};
use crate::types::platform::SourceKind;
use crate::types::records::{
    Derivation, DocumentRecord, DocumentSection, ExtractionResult, PersonalInfo,
};

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}").unwrap()
});

pub struct DocumentAdapter {
    context: AdapterContext,
    parser: Arc<dyn ResumeParser>,
}

impl DocumentAdapter {
    pub fn new(context: AdapterContext, parser: Arc<dyn ResumeParser>) -> Self {
        Self { context, parser }
    }

    async fn derive_fields(&self, locator: &str, text: &str) -> (DerivedFields, Derivation) {
        let attempt = AssertUnwindSafe(self.parser.derive(text))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(DerivationError::Service("parser panicked".into())));

        match attempt {
            Ok(fields) => (fields, Derivation::Parser),
            Err(e) => {
                warn!(locator, error = %e, "structured derivation failed, using fallback");
                (fallback_parse(text), Derivation::Fallback)
            }
        }
    }
}

#[async_trait]
impl Extractor for DocumentAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Document
    }

    async fn extract(&self, locator: &str) -> Result<ExtractionResult> {
        let raw = self.context.acquire(self.kind(), locator).await?;
        let sections = split_sections(&raw.content);
        let (fields, derivation) = self.derive_fields(&raw.locator, &raw.content).await;

        let personal_info = Some(fields.personal_info).filter(|info| !info.is_empty());

        Ok(ExtractionResult::Document(DocumentRecord {
            locator: raw.locator,
            text: raw.content,
            sections,
            personal_info,
            skills: fields.skills,
            derivation,
        }))
    }
}

/// Pattern-based field extraction. Total: any input yields a value.
///
/// - email: first address-shaped match
/// - phone: first phone-shaped match
/// - name: first non-empty line
/// - skills: vocabulary scan, case-insensitive, de-duplicated
pub fn fallback_parse(text: &str) -> DerivedFields {
    let email = RE_EMAIL.find(text).map(|m| m.as_str().to_string());
    let phone = RE_PHONE.find(text).map(|m| m.as_str().trim().to_string());
    let name = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from);

    DerivedFields {
        personal_info: PersonalInfo { name, email, phone },
        skills: scan_skills(text),
    }
}

/// Split text into sections at heading lines.
///
/// A heading is a short line that is either all caps or ends with a colon.
/// Text before the first heading is not sectioned.
pub fn split_sections(text: &str) -> Vec<DocumentSection> {
    let mut sections: Vec<DocumentSection> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if is_heading(trimmed) {
            if let Some((heading, body)) = current.take() {
                sections.push(finish_section(heading, &body));
            }
            current = Some((trimmed.trim_end_matches(':').trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((heading, body)) = current {
        sections.push(finish_section(heading, &body));
    }

    sections
}

fn finish_section(heading: String, body: &[&str]) -> DocumentSection {
    DocumentSection {
        heading,
        content: body.join("\n").trim().to_string(),
    }
}

fn is_heading(line: &str) -> bool {
    if line.is_empty() || line.chars().count() > 40 {
        return false;
    }

    if let Some(label) = line.strip_suffix(':') {
        return !label.trim().is_empty() && !label.contains(':');
    }

    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}
