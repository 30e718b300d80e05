//! Fixed skill vocabulary and keyword scanning.

/// Skills recognised by keyword scanning, in reporting order.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Rust",
    "Go",
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "Ruby",
    "SQL",
    "PostgreSQL",
    "React",
    "Node.js",
    "Docker",
    "Kubernetes",
    "AWS",
    "Machine Learning",
    "Figma",
    "UX Research",
    "Prototyping",
    "Leadership",
    "Agile",
];

/// Vocabulary entries that occur in `text`, case-insensitively, each once.
///
/// Matching is plain substring search, so "Java" also matches inside
/// "JavaScript" and "Go" inside "Google".
pub fn scan_skills(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for skill in SKILL_VOCABULARY {
        if haystack.contains(&skill.to_lowercase()) && !found.iter().any(|s| s == skill) {
            found.push((*skill).to_string());
        }
    }

    found
}
