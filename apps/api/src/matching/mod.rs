//! Job Matching: pluggable, trait-based scorer that measures résumé features
//! against a job requirement.
//!
//! Default: `KeywordJobMatcher` (pure-Rust, deterministic, fully testable).
//! `AppState` holds an `Arc<dyn JobMatcher>`.

pub mod handlers;
pub mod matcher;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::ResumeFeatures;
use crate::models::job::JobPosting;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// What a job asks for. Read-only input to matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated skill labels, e.g. "Python, Java, SQL".
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub required_education: String,
    #[serde(default)]
    pub required_experience: String,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBand {
    High,
    Medium,
    Low,
}

impl MatchBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            MatchBand::High
        } else if score >= 50.0 {
            MatchBand::Medium
        } else {
            MatchBand::Low
        }
    }
}

/// Full match report. `score` is always the sum of the three dimension scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,                  // 0 to 100
    pub details: Vec<String>,        // skills, education, experience
    pub skill_score: f64,            // 0 to 50
    pub education_score: f64,        // 0 or 25
    pub experience_score: f64,       // 0 or 25
    pub matched_skills: Vec<String>,
    pub band: MatchBand,
}

/// One job's result inside a ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    pub job_id: Uuid,
    pub job_title: String,
    #[serde(flatten)]
    pub result: MatchResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The matcher trait. Implement this to swap backends without touching the
/// handlers. Matching never fails; empty requirement fields have defined
/// outcomes.
pub trait JobMatcher: Send + Sync {
    fn match_resume(&self, features: &ResumeFeatures, job: &JobRequirement) -> MatchResult;

    fn backend_name(&self) -> &'static str;
}

/// Matches `features` against every posting, best score first.
/// Ties keep the postings' input order.
pub fn rank_jobs(
    matcher: &dyn JobMatcher,
    features: &ResumeFeatures,
    jobs: &[JobPosting],
) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = jobs
        .iter()
        .map(|job| RankedMatch {
            job_id: job.id,
            job_title: job.requirement.title.clone(),
            result: matcher.match_resume(features, &job.requirement),
        })
        .collect();
    ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::matcher::KeywordJobMatcher;
    use chrono::Utc;

    fn posting(title: &str, skills: &str) -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            requirement: JobRequirement {
                title: title.to_string(),
                required_skills: skills.to_string(),
                ..JobRequirement::default()
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(MatchBand::from_score(75.0), MatchBand::High);
        assert_eq!(MatchBand::from_score(74.99), MatchBand::Medium);
        assert_eq!(MatchBand::from_score(50.0), MatchBand::Medium);
        assert_eq!(MatchBand::from_score(49.9), MatchBand::Low);
    }

    #[test]
    fn test_rank_orders_by_score_and_keeps_ties_stable() {
        let features = ResumeFeatures {
            skills: vec!["python".into(), "sql".into()],
            ..ResumeFeatures::default()
        };
        let jobs = vec![
            posting("tie-a", "go"),
            posting("best", "python, sql"),
            posting("tie-b", "rust"),
            posting("half", "python, java"),
        ];

        let ranked = rank_jobs(&KeywordJobMatcher, &features, &jobs);
        let titles: Vec<_> = ranked.iter().map(|r| r.job_title.as_str()).collect();
        assert_eq!(titles, vec!["best", "half", "tie-a", "tie-b"]);
        assert_eq!(ranked[0].job_id, jobs[1].id);
    }

    #[test]
    fn test_requirement_deserializes_with_defaults() {
        let job: JobRequirement = serde_json::from_str(r#"{"title":"Engineer"}"#).unwrap();
        assert_eq!(job.title, "Engineer");
        assert!(job.required_skills.is_empty());
        assert!(job.owner_id.is_none());
    }
}
