//! Simulated fetcher standing in for network, OCR and inference work.
//!
//! Every fetch suspends for the configured latency and then synthesises
//! deterministic content from the locator, so repeated runs over the same
//! batch produce the same records.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::trace;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{RawSource, SourceFetcher};
use crate::types::platform::SourceKind;

const HEADLINES: &[&str] = &[
    "Senior Software Engineer",
    "Product Designer",
    "Data Scientist",
    "Engineering Manager",
    "Full Stack Developer",
];

const LOCATIONS: &[&str] = &["Minneapolis, MN", "Berlin, DE", "Remote", "Toronto, ON", "Austin, TX"];

const SKILL_SETS: &[&str] = &[
    "Rust, PostgreSQL, Kubernetes",
    "Figma, UX Research, Prototyping",
    "Python, SQL, Machine Learning",
    "Leadership, Agile, Java",
    "TypeScript, React, Node.js",
];

/// Fetcher that fakes slow extraction work.
#[derive(Debug, Clone)]
pub struct SimulatedFetcher {
    latency: Duration,
}

impl SimulatedFetcher {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedFetcher {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[async_trait]
impl SourceFetcher for SimulatedFetcher {
    async fn fetch(&self, kind: SourceKind, locator: &str) -> FetchResult<RawSource> {
        trace!(%kind, locator, latency_ms = self.latency.as_millis() as u64, "simulating fetch");
        tokio::time::sleep(self.latency).await;

        let seed = seed_of(locator);
        match kind {
            SourceKind::Profile => simulate_profile(locator, seed),
            SourceKind::JobBoard => simulate_job_posting(locator, seed),
            SourceKind::Document => Ok(simulate_document(locator, seed)),
            SourceKind::Image => Ok(simulate_image(locator, seed)),
            SourceKind::Webpage => simulate_webpage(locator, seed),
        }
    }
}

fn seed_of(locator: &str) -> usize {
    let digest = Sha256::digest(locator.as_bytes());
    usize::from(digest[0]) << 8 | usize::from(digest[1])
}

fn pick<'a>(options: &[&'a str], seed: usize) -> &'a str {
    options[seed % options.len()]
}

fn parse_web(locator: &str) -> FetchResult<url::Url> {
    let parsed =
        url::Url::parse(locator).map_err(|e| FetchError::Unsupported(format!("{locator}: {e}")))?;
    if parsed.host_str().is_none() {
        return Err(FetchError::Unsupported(format!("{locator}: no host")));
    }
    Ok(parsed)
}

/// Last non-empty path segment, or the host.
fn handle_of(url: &url::Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(String::from))
        .or_else(|| url.host_str().map(String::from))
        .unwrap_or_default()
}

fn display_name(handle: &str) -> String {
    handle
        .trim_start_matches('@')
        .split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn simulate_profile(locator: &str, seed: usize) -> FetchResult<RawSource> {
    let url = parse_web(locator)?;
    let name = display_name(&handle_of(&url));
    let headline = pick(HEADLINES, seed);
    let content = format!(
        "About\n{name} is a {headline} focused on shipping reliable products.\n\n\
         Experience\n- {headline} at Northwind Labs\n- Software Engineer at Contoso\n\n\
         Skills\n{skills}\n",
        skills = pick(SKILL_SETS, seed),
    );

    Ok(RawSource::new(locator, content)
        .with_title(name)
        .with_metadata("headline", headline)
        .with_metadata("location", pick(LOCATIONS, seed / 7)))
}

fn simulate_job_posting(locator: &str, seed: usize) -> FetchResult<RawSource> {
    let url = parse_web(locator)?;
    let company = url
        .host_str()
        .and_then(|h| h.trim_start_matches("www.").split('.').next())
        .map(display_name)
        .unwrap_or_default();
    let title = pick(HEADLINES, seed);
    let content = format!(
        "{company} is hiring a {title}.\n\nRequirements\n- 3+ years of professional experience\n\
         - {skills}\n- Clear written communication\n",
        skills = pick(SKILL_SETS, seed),
    );

    Ok(RawSource::new(locator, content)
        .with_title(title)
        .with_metadata("company", company)
        .with_metadata("location", pick(LOCATIONS, seed / 3))
        .with_metadata("salary", format!("${}k - ${}k", 90 + seed % 40, 130 + seed % 40)))
}

fn simulate_document(locator: &str, seed: usize) -> RawSource {
    let name = "Jordan Rivera";
    let skills = pick(SKILL_SETS, seed);
    // Alternate between labelled and free-form layouts so both derivation paths see traffic.
    let content = if seed % 2 == 0 {
        format!(
            "Name: {name}\nEmail: jordan.rivera@example.com\nPhone: (612) 555-0142\nSkills: {skills}\n\n\
             EXPERIENCE\n{headline}, Northwind Labs (2019 - present)\n\n\
             EDUCATION\nB.S. Computer Science\n",
            headline = pick(HEADLINES, seed),
        )
    } else {
        format!(
            "{name}\njordan.rivera@example.com | 612-555-0142\n\n\
             SUMMARY\n{headline} with a background in {skills}.\n\n\
             EXPERIENCE\nNorthwind Labs (2019 - present)\n",
            headline = pick(HEADLINES, seed),
        )
    };
    RawSource::new(locator, content).with_title(format!("{name} resume"))
}

fn simulate_image(locator: &str, seed: usize) -> RawSource {
    let confidence = 0.80 + (seed % 20) as f32 / 100.0;
    let content = format!(
        "Jordan Rivera\n{headline}\n{skills}",
        headline = pick(HEADLINES, seed),
        skills = pick(SKILL_SETS, seed),
    );
    RawSource::new(locator, content).with_metadata("confidence", format!("{confidence:.2}"))
}

fn simulate_webpage(locator: &str, seed: usize) -> FetchResult<RawSource> {
    let url = parse_web(locator)?;
    let host = url.host_str().unwrap_or_default().to_string();
    let name = display_name(&handle_of(&url));
    let content = format!(
        "{name}\n\nWelcome to my corner of the web. I work as a {headline}.\n\n\
         Projects: https://{host}/projects\nContact: https://{host}/contact\n",
        headline = pick(HEADLINES, seed),
    );

    Ok(RawSource::new(locator, content)
        .with_title(format!("{name} | {host}"))
        .with_metadata("description", format!("{name} on {host}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_suspends_for_latency() {
        let fetcher = SimulatedFetcher::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        fetcher
            .fetch(SourceKind::Webpage, "https://example.com")
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deterministic_output() {
        let fetcher = SimulatedFetcher::new(Duration::from_millis(1));
        let a = fetcher
            .fetch(SourceKind::Profile, "https://linkedin.com/in/jane-doe")
            .await
            .unwrap();
        let b = fetcher
            .fetch(SourceKind::Profile, "https://linkedin.com/in/jane-doe")
            .await
            .unwrap();
        assert_eq!(a.content, b.content);
        assert_eq!(a.title.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_web_kinds_require_url() {
        let fetcher = SimulatedFetcher::new(Duration::from_millis(1));
        let err = fetcher
            .fetch(SourceKind::Webpage, "not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Unsupported(_)));

        // Documents and images accept plain paths
        assert!(fetcher
            .fetch(SourceKind::Document, "/uploads/cv.pdf")
            .await
            .is_ok());
        assert!(fetcher
            .fetch(SourceKind::Image, "/uploads/card.png")
            .await
            .is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("jane-doe"), "Jane Doe");
        assert_eq!(display_name("@sam_lee"), "Sam Lee");
        assert_eq!(display_name(""), "");
    }
}
