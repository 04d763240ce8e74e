//! Reference vocabulary: the keyword data every extractor matches against.
//!
//! The vocabulary is part of the scoring contract: adding or removing a skill
//! changes scores for existing résumés, so it carries a `version` that is
//! recorded alongside every analysis.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOCABULARY_VERSION: &str = "2024.1";

/// A named group of skill labels (languages, frameworks, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub version: String,
    pub skill_groups: Vec<SkillGroup>,
    pub education_keywords: Vec<String>,
    /// Words that open an experience section ("work", "employment", ...).
    pub experience_headers: Vec<String>,
    /// Optional words that may follow a header word ("experience", "history").
    pub experience_header_suffixes: Vec<String>,
}

const LANGUAGES: &[&str] = &[
    "python", "java", "javascript", "c++", "c#", "ruby", "php", "swift", "kotlin", "golang",
    "typescript", "scala", "perl", "r", "matlab", "bash", "shell", "sql", "html", "css",
];

const FRAMEWORKS: &[&str] = &[
    "react", "angular", "vue", "django", "flask", "spring", "express", "node.js", "tensorflow",
    "pytorch", "keras", "scikit-learn", "pandas", "numpy", "matplotlib", "bootstrap", "jquery",
];

const DATABASES: &[&str] = &[
    "mysql", "postgresql", "mongodb", "oracle", "sql server", "sqlite", "redis", "cassandra",
    "dynamodb", "firebase",
];

const CLOUD: &[&str] = &[
    "aws", "azure", "google cloud", "gcp", "heroku", "digitalocean", "kubernetes", "docker",
];

const TOOLS: &[&str] = &[
    "git", "jenkins", "jira", "confluence", "tableau", "power bi", "excel", "photoshop",
    "illustrator", "figma", "sketch", "invision",
];

const METHODOLOGIES: &[&str] = &[
    "agile", "scrum", "kanban", "waterfall", "devops", "ci/cd", "test-driven development", "tdd",
];

const SOFT_SKILLS: &[&str] = &[
    "communication", "teamwork", "leadership", "problem-solving", "critical thinking",
    "time management", "creativity", "adaptability", "emotional intelligence",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "diploma", "certificate", "degree", "b.tech",
    "m.tech", "b.e.", "m.e.", "b.sc", "m.sc", "b.a.", "m.a.", "mba", "bba", "college",
    "university", "institute", "school of", "academy",
];

const EXPERIENCE_HEADERS: &[&str] = &["work", "professional", "employment"];

const EXPERIENCE_HEADER_SUFFIXES: &[&str] = &["experience", "history"];

impl Default for Vocabulary {
    fn default() -> Self {
        let group = |name: &str, skills: &[&str]| SkillGroup {
            name: name.to_string(),
            skills: to_owned(skills),
        };

        Self {
            version: DEFAULT_VOCABULARY_VERSION.to_string(),
            skill_groups: vec![
                group("languages", LANGUAGES),
                group("frameworks", FRAMEWORKS),
                group("databases", DATABASES),
                group("cloud", CLOUD),
                group("tools", TOOLS),
                group("methodologies", METHODOLOGIES),
                group("soft_skills", SOFT_SKILLS),
            ],
            education_keywords: to_owned(EDUCATION_KEYWORDS),
            experience_headers: to_owned(EXPERIENCE_HEADERS),
            experience_header_suffixes: to_owned(EXPERIENCE_HEADER_SUFFIXES),
        }
    }
}

impl Vocabulary {
    /// Loads a vocabulary from a JSON file with the same shape as `Vocabulary`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary file '{}'", path.display()))?;
        let vocabulary: Vocabulary = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid vocabulary file '{}'", path.display()))?;
        Ok(vocabulary)
    }

    /// All skill labels flattened in vocabulary order, first occurrence wins.
    pub fn skills(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.skill_groups
            .iter()
            .flat_map(|g| g.skills.iter())
            .map(String::as_str)
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_seven_skill_groups() {
        let v = Vocabulary::default();
        let names: Vec<_> = v.skill_groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["languages", "frameworks", "databases", "cloud", "tools", "methodologies", "soft_skills"]
        );
    }

    #[test]
    fn test_skills_flatten_in_group_order() {
        let v = Vocabulary::default();
        let skills = v.skills();
        assert_eq!(skills.first(), Some(&"python"));
        assert_eq!(skills.last(), Some(&"emotional intelligence"));
        assert_eq!(skills.len(), 84);
    }

    #[test]
    fn test_skills_suppress_duplicates_across_groups() {
        let v = Vocabulary {
            skill_groups: vec![
                SkillGroup { name: "a".into(), skills: vec!["rust".into(), "go".into()] },
                SkillGroup { name: "b".into(), skills: vec!["go".into(), "zig".into()] },
            ],
            ..Vocabulary::default()
        };
        assert_eq!(v.skills(), vec!["rust", "go", "zig"]);
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        let mut v = Vocabulary::default();
        v.version = "custom-1".to_string();
        std::fs::write(&path, serde_json::to_string(&v).unwrap()).unwrap();

        let loaded = Vocabulary::from_json_file(&path).unwrap();
        assert_eq!(loaded.version, "custom-1");
        assert_eq!(loaded.education_keywords.len(), v.education_keywords.len());
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = Vocabulary::from_json_file(Path::new("/nonexistent/vocab.json")).unwrap_err();
        assert!(err.to_string().contains("Cannot read vocabulary file"));
    }
}
