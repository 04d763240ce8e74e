use std::collections::HashSet;

use crate::analysis::ResumeFeatures;
use crate::matching::{JobMatcher, JobRequirement, MatchBand, MatchResult};

const SKILL_WEIGHT: f64 = 50.0;
const EDUCATION_WEIGHT: f64 = 25.0;
const EXPERIENCE_WEIGHT: f64 = 25.0;

// ────────────────────────────────────────────────────────────────────────────
// KeywordJobMatcher (default)
// ────────────────────────────────────────────────────────────────────────────

/// Keyword matcher over the three match dimensions.
///
/// 1. Skills (50): share of the distinct comma-separated required skills the
///    résumé lists.
/// 2. Education (25, all-or-nothing): any required-education word appears in
///    any education snippet. No required words means a pass.
/// 3. Experience (25, all-or-nothing): the résumé has at least one experience
///    snippet. The required-experience text is not inspected.
pub struct KeywordJobMatcher;

impl JobMatcher for KeywordJobMatcher {
    fn match_resume(&self, features: &ResumeFeatures, job: &JobRequirement) -> MatchResult {
        let required = parse_required_skills(&job.required_skills);
        let matched = matched_skills(&features.skills, &required);

        let fraction = if required.is_empty() {
            0.0
        } else {
            matched.len() as f64 / required.len() as f64
        };
        let skill_score = fraction * SKILL_WEIGHT;

        let education_match = education_matches(&features.education, &job.required_education);
        let education_score = if education_match { EDUCATION_WEIGHT } else { 0.0 };

        let experience_match = !features.experience.is_empty();
        let experience_score = if experience_match { EXPERIENCE_WEIGHT } else { 0.0 };

        let score = skill_score + education_score + experience_score;

        let details = vec![
            format!(
                "Skills match: {}/{} ({:.0}%)",
                matched.len(),
                required.len(),
                fraction * 100.0
            ),
            format!("Education match: {}", yes_no(education_match)),
            format!("Experience match: {}", yes_no(experience_match)),
        ];

        MatchResult {
            score,
            details,
            skill_score,
            education_score,
            experience_score,
            matched_skills: matched,
            band: MatchBand::from_score(score),
        }
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

/// Splits on commas, trims, lowercases, and drops empty tokens. Repeated
/// skills keep their first position only, so the result is a set.
pub fn parse_required_skills(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Résumé skills (lowercased) that appear in `required`, each counted once.
fn matched_skills(skills: &[String], required: &[String]) -> Vec<String> {
    let required: HashSet<&str> = required.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| required.contains(s.as_str()))
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn education_matches(snippets: &[String], required_education: &str) -> bool {
    let keywords: Vec<String> = required_education
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if keywords.is_empty() {
        return true;
    }
    snippets.iter().any(|snippet| {
        let lowered = snippet.to_lowercase();
        keywords.iter().any(|k| lowered.contains(k.as_str()))
    })
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}
