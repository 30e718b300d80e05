//! Structured-field derivation for document text.
//!
//! In production this step is an inference call that reads a resume and
//! returns contact details and skills. It is allowed to fail; the document
//! adapter then falls back to pattern matching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DerivationError, DerivationResult};
use crate::types::records::PersonalInfo;

/// Fields derived from a document's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
}

/// Derives structured fields from document text.
#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn derive(&self, text: &str) -> DerivationResult<DerivedFields>;
}

#[async_trait]
impl<P: ResumeParser + ?Sized> ResumeParser for std::sync::Arc<P> {
    async fn derive(&self, text: &str) -> DerivationResult<DerivedFields> {
        (**self).derive(text).await
    }
}

/// Reads `Label: value` lines (`Name:`, `Email:`, `Phone:`, `Skills:`).
///
/// Fails with [`DerivationError::Unstructured`] when no label is present,
/// which sends free-form resumes down the fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabeledResumeParser;

#[async_trait]
impl ResumeParser for LabeledResumeParser {
    async fn derive(&self, text: &str) -> DerivationResult<DerivedFields> {
        let mut fields = DerivedFields::default();
        let mut found = false;

        for line in text.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match label.trim().to_ascii_lowercase().as_str() {
                "name" => fields.personal_info.name = Some(value.to_string()),
                "email" => fields.personal_info.email = Some(value.to_string()),
                "phone" => fields.personal_info.phone = Some(value.to_string()),
                "skills" => fields.skills.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                ),
                _ => continue,
            }
            found = true;
        }

        if found {
            Ok(fields)
        } else {
            Err(DerivationError::Unstructured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_labels() {
        let text = "Name: Jane Doe\nEmail: jane@example.com\nSkills: Rust, SQL , \n";
        let fields = LabeledResumeParser.derive(text).await.unwrap();
        assert_eq!(fields.personal_info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.personal_info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(fields.personal_info.phone, None);
        assert_eq!(fields.skills, vec!["Rust", "SQL"]);
    }

    #[tokio::test]
    async fn test_free_text_is_unstructured() {
        let err = LabeledResumeParser
            .derive("Jane Doe\njane@example.com\nRust developer")
            .await
            .unwrap_err();
        assert_eq!(err, DerivationError::Unstructured);
    }
}
