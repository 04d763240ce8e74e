//! Résumé score and rule-based feedback.

use serde::{Deserialize, Serialize};

const SKILL_POINTS: u32 = 4;
const SKILL_CAP: u32 = 40;
const EDUCATION_POINTS: u32 = 15;
const EDUCATION_CAP: u32 = 30;
const EXPERIENCE_POINTS: u32 = 10;
const EXPERIENCE_CAP: u32 = 30;

/// Feature counts the score is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub skills: usize,
    pub education: usize,
    pub experience: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NeedsImprovement,
    GoodFoundation,
    Strong,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s < 50 => ScoreBand::NeedsImprovement,
            s if s < 70 => ScoreBand::GoodFoundation,
            _ => ScoreBand::Strong,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::NeedsImprovement => "Your resume needs significant improvement.",
            ScoreBand::GoodFoundation => {
                "Your resume has a good foundation but needs enhancements."
            }
            ScoreBand::Strong => {
                "Your resume is strong, but minor improvements could make it excellent."
            }
        }
    }
}

fn capped(count: usize, points: u32, cap: u32) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count.saturating_mul(points).min(cap)
}

/// `min(4s, 40) + min(15e, 30) + min(10x, 30)`, always in [0, 100].
pub fn compute_resume_score(counts: FeatureCounts) -> u32 {
    capped(counts.skills, SKILL_POINTS, SKILL_CAP)
        + capped(counts.education, EDUCATION_POINTS, EDUCATION_CAP)
        + capped(counts.experience, EXPERIENCE_POINTS, EXPERIENCE_CAP)
}

/// Score-band message first, then at most one message each for skills,
/// education, and experience, in that order.
pub fn improvement_suggestions(counts: FeatureCounts, score: u32) -> Vec<String> {
    let mut suggestions = vec![ScoreBand::from_score(score).message().to_string()];

    match counts.skills {
        n if n < 5 => suggestions
            .push("Add more relevant technical and soft skills to your resume.".to_string()),
        n if n < 10 => suggestions.push(
            "Consider adding more specialized skills that showcase your expertise.".to_string(),
        ),
        _ => {}
    }

    match counts.education {
        0 => suggestions.push(
            "Add your educational background, including degrees and certifications.".to_string(),
        ),
        1 => suggestions.push(
            "Consider adding more educational details or relevant coursework.".to_string(),
        ),
        _ => {}
    }

    match counts.experience {
        0 => suggestions.push(
            "Add work experience section with detailed responsibilities and achievements."
                .to_string(),
        ),
        1 => suggestions.push(
            "Expand your work experience with measurable achievements and results.".to_string(),
        ),
        _ => {}
    }

    suggestions
}
