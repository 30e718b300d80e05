//! Professional-network profile adapter.

use async_trait::async_trait;

use super::skills::scan_skills;
use super::{require_content, AdapterContext, Extractor};
use crate::error::Result;
use crate::traits::fetcher::RawSource;
use crate::types::platform::SourceKind;
use crate::types::records::{ExperienceEntry, ExtractionResult, ProfileRecord};

pub struct ProfileAdapter {
    context: AdapterContext,
}

impl ProfileAdapter {
    pub fn new(context: AdapterContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Extractor for ProfileAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Profile
    }

    async fn extract(&self, locator: &str) -> Result<ExtractionResult> {
        let raw = self.context.acquire(self.kind(), locator).await?;
        let raw = require_content(raw)?;
        Ok(ExtractionResult::Profile(structure_profile(&raw)))
    }
}

/// Build a profile record from raw profile text.
///
/// Experience comes from `- Title at Company` bullets; the summary is the
/// first line after an `About` heading.
pub fn structure_profile(raw: &RawSource) -> ProfileRecord {
    let mut summary = None;
    let mut experience = Vec::new();
    let mut after_about = false;

    for line in raw.content.lines().map(str::trim) {
        if line.eq_ignore_ascii_case("about") {
            after_about = true;
            continue;
        }
        if after_about && !line.is_empty() {
            summary = Some(line.to_string());
            after_about = false;
        }
        if let Some(bullet) = line.strip_prefix("- ") {
            experience.push(parse_experience(bullet));
        }
    }

    ProfileRecord {
        locator: raw.locator.clone(),
        name: raw
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| handle_from_locator(&raw.locator)),
        headline: raw.meta("headline").map(String::from),
        location: raw.meta("location").map(String::from),
        summary,
        experience,
        skills: scan_skills(&raw.content),
    }
}

fn parse_experience(bullet: &str) -> ExperienceEntry {
    match bullet.rsplit_once(" at ") {
        Some((title, company)) => ExperienceEntry {
            title: title.trim().to_string(),
            company: Some(company.trim().to_string()),
        },
        None => ExperienceEntry {
            title: bullet.trim().to_string(),
            company: None,
        },
    }
}

fn handle_from_locator(locator: &str) -> String {
    locator
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(locator)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structures_profile_text() {
        let raw = RawSource::new(
            "https://linkedin.com/in/jane-doe",
            "About\nBuilds data platforms.\n\nExperience\n- Staff Engineer at Initech\n- Intern\n\nSkills\nRust, SQL",
        )
        .with_title("Jane Doe")
        .with_metadata("headline", "Staff Engineer");

        let record = structure_profile(&raw);
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.headline.as_deref(), Some("Staff Engineer"));
        assert_eq!(record.location, None);
        assert_eq!(record.summary.as_deref(), Some("Builds data platforms."));
        assert_eq!(
            record.experience,
            vec![
                ExperienceEntry {
                    title: "Staff Engineer".into(),
                    company: Some("Initech".into()),
                },
                ExperienceEntry {
                    title: "Intern".into(),
                    company: None,
                },
            ]
        );
        assert!(record.skills.contains(&"Rust".to_string()));
        assert!(record.skills.contains(&"SQL".to_string()));
    }

    #[test]
    fn test_name_falls_back_to_handle() {
        let raw = RawSource::new("https://linkedin.com/in/jdoe/", "Some text");
        assert_eq!(structure_profile(&raw).name, "jdoe");
    }
}
