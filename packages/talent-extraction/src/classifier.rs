//! Platform classification for candidate locators.
//!
//! A locator is first checked against an allow-list of profile hosts. Only
//! locators that pass are inspected further; everything else is
//! [`Platform::Unknown`], which the orchestrator still extracts as a plain
//! webpage.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::types::platform::Platform;

/// Hosts accepted as candidate profile sources.
pub const DEFAULT_PROFILE_HOSTS: &[&str] = &[
    "linkedin.com",
    "github.com",
    "stackoverflow.com",
    "behance.net",
    "dribbble.com",
    "medium.com",
];

const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".rtf", ".txt", ".odt"];

const PORTFOLIO_KEYWORDS: &[&str] = &["portfolio", "personal", "website", "bio"];

static DEFAULT_CLASSIFIER: LazyLock<PlatformClassifier> = LazyLock::new(PlatformClassifier::new);

/// Classify a locator with the default allow-list.
pub fn classify(locator: &str) -> Platform {
    DEFAULT_CLASSIFIER.classify(locator)
}

/// Check a locator against the default allow-list.
pub fn is_valid_profile_locator(locator: &str) -> bool {
    DEFAULT_CLASSIFIER.is_valid_profile_locator(locator)
}

/// Lowercased host of a locator, if it parses as a URL.
pub fn host_of(locator: &str) -> Option<String> {
    url::Url::parse(locator.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Maps locators to platforms.
#[derive(Debug, Clone)]
pub struct PlatformClassifier {
    /// Accepted URL schemes
    allowed_schemes: HashSet<String>,

    /// Hosts (and their subdomains) accepted as profile sources
    allowed_hosts: HashSet<String>,
}

impl Default for PlatformClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformClassifier {
    /// Create a classifier with the default profile hosts.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            allowed_hosts: DEFAULT_PROFILE_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }

    /// Accept an additional profile host.
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into().to_ascii_lowercase());
        self
    }

    /// True when the locator is an http(s) URL on an allowed host.
    pub fn is_valid_profile_locator(&self, locator: &str) -> bool {
        let Ok(parsed) = url::Url::parse(locator.trim()) else {
            return false;
        };

        if !self.allowed_schemes.contains(parsed.scheme()) {
            return false;
        }

        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        self.allowed_hosts
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{allowed}")))
    }

    /// Classify a locator. Never fails.
    pub fn classify(&self, locator: &str) -> Platform {
        if !self.is_valid_profile_locator(locator) {
            return Platform::Unknown;
        }

        let lowered = locator.trim().to_ascii_lowercase();
        let host = host_of(&lowered).unwrap_or_default();

        if host.contains("linkedin.com") {
            Platform::Linkedin
        } else if host.contains("github.com") {
            Platform::Github
        } else if is_document_locator(&lowered) {
            Platform::Resume
        } else if PORTFOLIO_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            Platform::Portfolio
        } else {
            Platform::Unknown
        }
    }
}

fn is_document_locator(lowered: &str) -> bool {
    let path = lowered
        .split(['?', '#'])
        .next()
        .unwrap_or(lowered);
    DOCUMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) || lowered.contains("resume")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkedin_and_github() {
        assert_eq!(classify("https://linkedin.com/in/a"), Platform::Linkedin);
        assert_eq!(classify("https://www.linkedin.com/in/jane"), Platform::Linkedin);
        assert_eq!(classify("https://github.com/b"), Platform::Github);
        assert_eq!(classify("HTTPS://GitHub.com/B"), Platform::Github);
    }

    #[test]
    fn test_resume_on_allowed_host() {
        assert_eq!(
            classify("https://medium.com/@jane/files/cv.pdf"),
            Platform::Resume
        );
        assert_eq!(
            classify("https://behance.net/jane/resume"),
            Platform::Resume
        );
        assert_eq!(
            classify("https://dribbble.com/jane/cv.docx?download=1"),
            Platform::Resume
        );
    }

    #[test]
    fn test_portfolio_keywords() {
        assert_eq!(
            classify("https://behance.net/jane/portfolio"),
            Platform::Portfolio
        );
        assert_eq!(classify("https://medium.com/@jane/bio"), Platform::Portfolio);
    }

    #[test]
    fn test_allowed_host_without_signal_is_unknown() {
        assert_eq!(
            classify("https://stackoverflow.com/users/42"),
            Platform::Unknown
        );
    }

    #[test]
    fn test_invalid_or_disallowed_is_unknown() {
        assert_eq!(classify("https://bad"), Platform::Unknown);
        assert_eq!(classify("not a url"), Platform::Unknown);
        assert_eq!(classify(""), Platform::Unknown);
        assert_eq!(classify("ftp://github.com/x"), Platform::Unknown);
        // Keywords alone do not make a locator valid
        assert_eq!(classify("https://janedoe.dev/portfolio"), Platform::Unknown);
        assert_eq!(classify("https://example.com/resume.pdf"), Platform::Unknown);
    }

    #[test]
    fn test_lookalike_hosts_rejected() {
        assert!(!is_valid_profile_locator("https://notgithub.com/x"));
        assert!(!is_valid_profile_locator("https://github.com.evil.io/x"));
        assert!(is_valid_profile_locator("https://gist.github.com/x"));
    }

    #[test]
    fn test_custom_host() {
        let classifier = PlatformClassifier::new().allow_host("Janedoe.dev");
        assert_eq!(
            classifier.classify("https://janedoe.dev/portfolio"),
            Platform::Portfolio
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://WWW.Example.com/x").as_deref(), Some("www.example.com"));
        assert_eq!(host_of("nope"), None);
    }
}
