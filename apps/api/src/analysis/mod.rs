// Résumé analysis pipeline:
// bytes → text → features (skills, education, experience, entities) → score → suggestions.
// The word cloud is a side artifact; its failure never fails an analysis.

pub mod education;
pub mod entities;
pub mod error;
pub mod experience;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod scoring;
pub mod skills;
pub mod vocabulary;
pub mod wordcloud;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::education::EducationExtractor;
use crate::analysis::entities::{Entities, EntityRecognizer};
use crate::analysis::error::AnalysisError;
use crate::analysis::experience::ExperienceExtractor;
use crate::analysis::extract::{extract_text, DocumentKind, RawDocument};
use crate::analysis::normalize::normalize_text;
use crate::analysis::scoring::{compute_resume_score, improvement_suggestions, FeatureCounts};
use crate::analysis::skills::SkillExtractor;
use crate::analysis::vocabulary::Vocabulary;
use crate::analysis::wordcloud::WordCloudRenderer;

/// The three feature lists matching and scoring operate on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFeatures {
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl ResumeFeatures {
    pub fn counts(&self) -> FeatureCounts {
        FeatureCounts {
            skills: self.skills.len(),
            education: self.education.len(),
            experience: self.experience.len(),
        }
    }
}

/// Structured output of one analysis call. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub document_id: Option<String>,
    pub vocabulary_version: String,
    /// Length of the extracted text in characters.
    pub text_length: usize,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    /// Always `compute_resume_score` of the three feature counts.
    pub score: u32,
    pub suggestions: Vec<String>,
    pub wordcloud_path: Option<String>,
    pub entities: Entities,
}

impl AnalysisResult {
    pub fn features(&self) -> ResumeFeatures {
        ResumeFeatures {
            skills: self.skills.clone(),
            education: self.education.clone(),
            experience: self.experience.clone(),
        }
    }
}

/// Owns the compiled extractors. Built once at startup and shared via `Arc`.
pub struct ResumeAnalyzer {
    vocabulary_version: String,
    skills: SkillExtractor,
    education: EducationExtractor,
    experience: ExperienceExtractor,
    entities: Arc<EntityRecognizer>,
    wordcloud: Option<WordCloudRenderer>,
}

impl ResumeAnalyzer {
    pub fn new(
        vocabulary: &Vocabulary,
        entities: Arc<EntityRecognizer>,
        wordcloud: Option<WordCloudRenderer>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            vocabulary_version: vocabulary.version.clone(),
            skills: SkillExtractor::new(vocabulary)?,
            education: EducationExtractor::new(vocabulary),
            experience: ExperienceExtractor::new(vocabulary)?,
            entities,
            wordcloud,
        })
    }

    pub fn vocabulary_version(&self) -> &str {
        &self.vocabulary_version
    }

    pub fn skill_count(&self) -> usize {
        self.skills.vocabulary_size()
    }

    /// Extracts text from the document and analyzes it.
    ///
    /// `persist_id` keys the word-cloud artifact and is echoed on the result.
    pub fn extract_and_analyze(
        &self,
        bytes: &[u8],
        kind: &DocumentKind,
        persist_id: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let text = extract_text(RawDocument { bytes, kind })?;
        Ok(self.analyze_text(&text, persist_id))
    }

    pub fn analyze_text(&self, text: &str, persist_id: Option<&str>) -> AnalysisResult {
        let normalized = normalize_text(text);

        // Skills match the raw text so labels like "node.js" and "ci/cd" survive.
        let features = ResumeFeatures {
            skills: self.skills.extract(text),
            education: self.education.extract(text),
            experience: self.experience.extract(text),
        };
        let counts = features.counts();
        let score = compute_resume_score(counts);
        let suggestions = improvement_suggestions(counts, score);
        let entities = self.entities.recognize(text);
        let wordcloud_path = self.render_wordcloud(&normalized, persist_id);

        info!(
            skills = counts.skills,
            education = counts.education,
            experience = counts.experience,
            score,
            "Analyzed resume"
        );

        AnalysisResult {
            document_id: persist_id.map(str::to_string),
            vocabulary_version: self.vocabulary_version.clone(),
            text_length: text.chars().count(),
            skills: features.skills,
            education: features.education,
            experience: features.experience,
            score,
            suggestions,
            wordcloud_path,
            entities,
        }
    }

    fn render_wordcloud(&self, normalized: &str, persist_id: Option<&str>) -> Option<String> {
        let renderer = self.wordcloud.as_ref()?;
        let key = persist_id
            .map(sanitize_artifact_key)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let file_name = format!("wordcloud_{key}.png");

        match renderer.render(normalized, &file_name) {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                warn!("{e}; continuing without word cloud");
                None
            }
        }
    }
}

fn sanitize_artifact_key(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
