use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::ResumeFeatures;

/// One row of `analysis_results`. List columns use the `join_list` codec.
#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub skills: String,
    pub education: String,
    pub experience: String,
    pub score: i32,
    pub suggestions: String,
    pub wordcloud_path: Option<String>,
    pub vocabulary_version: String,
    pub text_length: i64,
    pub created_at: DateTime<Utc>,
}

/// A persisted analysis with its lists decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    #[serde(flatten)]
    pub features: ResumeFeatures,
    pub score: u32,
    pub suggestions: Vec<String>,
    pub wordcloud_path: Option<String>,
    pub vocabulary_version: String,
    pub text_length: usize,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for StoredAnalysis {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            features: ResumeFeatures {
                skills: split_list(&row.skills),
                education: split_list(&row.education),
                experience: split_list(&row.experience),
            },
            score: u32::try_from(row.score).unwrap_or(0),
            suggestions: split_list(&row.suggestions),
            wordcloud_path: row.wordcloud_path,
            vocabulary_version: row.vocabulary_version,
            text_length: usize::try_from(row.text_length).unwrap_or(0),
            created_at: row.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List codec for TEXT columns
// ────────────────────────────────────────────────────────────────────────────
//
// Items are joined with '\n'. Inside an item '\' is written "\\" and a newline
// "\n"; an empty item is written "\e" so [""] and [] stay distinct.
// The empty list is the empty string.

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| escape_item(item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn split_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split('\n').map(unescape_item).collect()
}

fn escape_item(item: &str) -> String {
    if item.is_empty() {
        return r"\e".to_string();
    }
    let mut out = String::with_capacity(item.len());
    for c in item.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\n' => out.push_str(r"\n"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_item(raw: &str) -> String {
    if raw == r"\e" {
        return String::new();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            // Unknown escapes come from unescaped legacy rows; keep them verbatim.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(items: &[&str]) {
        let owned: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        assert_eq!(split_list(&join_list(&owned)), owned, "{items:?}");
    }

    #[test]
    fn test_empty_list_is_empty_string() {
        assert_eq!(join_list::<String>(&[]), "");
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_plain_items_joined_by_newline() {
        assert_eq!(join_list(&["python", "sql"]), "python\nsql");
        assert_eq!(split_list("python\nsql"), vec!["python", "sql"]);
    }

    #[test]
    fn test_multiline_snippets_roundtrip() {
        roundtrip(&["Work Experience\nAcme 2019 - 2021", "Globex\n\n03/2016"]);
    }

    #[test]
    fn test_backslashes_and_escape_lookalikes_roundtrip() {
        roundtrip(&[r"C:\new\path", r"\e", r"trailing\", r"\\n"]);
    }

    #[test]
    fn test_empty_items_roundtrip() {
        roundtrip(&[""]);
        roundtrip(&["", "a", ""]);
    }

    #[test]
    fn test_stored_analysis_decodes_row() {
        let row = AnalysisRow {
            id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
            skills: join_list(&["python", "docker"]),
            education: join_list(&["BSc State University 2016"]),
            experience: String::new(),
            score: 23,
            suggestions: join_list(&["a", "b"]),
            wordcloud_path: None,
            vocabulary_version: "2024.1".to_string(),
            text_length: 812,
            created_at: Utc::now(),
        };
        let stored = StoredAnalysis::from(row);
        assert_eq!(stored.features.skills, vec!["python", "docker"]);
        assert_eq!(stored.features.education.len(), 1);
        assert!(stored.features.experience.is_empty());
        assert_eq!(stored.score, 23);
        assert_eq!(stored.text_length, 812);
    }
}
