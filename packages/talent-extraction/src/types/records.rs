//! Structured records produced by the extraction adapters.

use serde::{Deserialize, Serialize};

use super::platform::SourceKind;

/// Output of a successful extraction, one variant per adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionResult {
    Profile(ProfileRecord),
    JobPosting(JobPostingRecord),
    Document(DocumentRecord),
    Image(ImageRecord),
    Webpage(WebpageRecord),
}

impl ExtractionResult {
    /// Which adapter produced this result.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            ExtractionResult::Profile(_) => SourceKind::Profile,
            ExtractionResult::JobPosting(_) => SourceKind::JobBoard,
            ExtractionResult::Document(_) => SourceKind::Document,
            ExtractionResult::Image(_) => SourceKind::Image,
            ExtractionResult::Webpage(_) => SourceKind::Webpage,
        }
    }

    pub fn as_profile(&self) -> Option<&ProfileRecord> {
        match self {
            ExtractionResult::Profile(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentRecord> {
        match self {
            ExtractionResult::Document(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_webpage(&self) -> Option<&WebpageRecord> {
        match self {
            ExtractionResult::Webpage(record) => Some(record),
            _ => None,
        }
    }
}

/// A professional-network profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub locator: String,
    pub name: String,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// One position listed on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: Option<String>,
}

/// A posting scraped from a job board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPostingRecord {
    pub locator: String,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub salary: Option<String>,
}

/// A parsed document such as a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub locator: String,
    pub text: String,
    #[serde(default)]
    pub sections: Vec<DocumentSection>,
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub derivation: Derivation,
}

/// A headed block of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub heading: String,
    pub content: String,
}

/// Contact details derived from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Where a document's structured fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// The structured parser succeeded
    Parser,
    /// The parser failed and pattern matching filled the fields
    Fallback,
}

/// OCR output for an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub locator: String,
    pub text: String,
    /// Mean block confidence in `0.0..=1.0`
    pub confidence: f32,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// A recognised line of text and where it sits in the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub confidence: f32,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A generic webpage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebpageRecord {
    pub locator: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub links: Vec<String>,
}
