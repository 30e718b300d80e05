//! Platform categories and adapter kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified source type of a locator, deciding adapter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Github,
    Portfolio,
    Resume,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Github => "github",
            Platform::Portfolio => "portfolio",
            Platform::Resume => "resume",
            Platform::Unknown => "unknown",
        }
    }

    /// Adapter that handles locators of this platform.
    ///
    /// Anything without a dedicated adapter is read as a plain webpage.
    pub fn adapter(&self) -> SourceKind {
        match self {
            Platform::Linkedin => SourceKind::Profile,
            Platform::Github | Platform::Portfolio => SourceKind::Webpage,
            Platform::Resume => SourceKind::Document,
            Platform::Unknown => SourceKind::Webpage,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "github" => Ok(Platform::Github),
            "portfolio" => Ok(Platform::Portfolio),
            "resume" => Ok(Platform::Resume),
            "unknown" => Ok(Platform::Unknown),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// The five extraction capabilities.
///
/// `category()` is also the rate-limit key each adapter admits under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Profile,
    JobBoard,
    Document,
    Image,
    Webpage,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Profile,
        SourceKind::JobBoard,
        SourceKind::Document,
        SourceKind::Image,
        SourceKind::Webpage,
    ];

    pub fn category(&self) -> &'static str {
        match self {
            SourceKind::Profile => "profile",
            SourceKind::JobBoard => "job_board",
            SourceKind::Document => "document",
            SourceKind::Image => "image",
            SourceKind::Webpage => "webpage",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}
