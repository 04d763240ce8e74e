//! Persistence for uploads, analyses, job postings, and matches.
//!
//! `AppState` holds an `Arc<dyn AnalysisStore>`: `PgAnalysisStore` when a
//! database is configured, otherwise `MemoryAnalysisStore`. Analyses are
//! append-only; "the" analysis of a résumé is its most recent one.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::matching::{JobRequirement, MatchResult};
use crate::models::analysis::{join_list, AnalysisRow, StoredAnalysis};
use crate::models::job::JobPosting;
use crate::models::resume::{JobCandidate, NewResume, ResumeRow, StoredMatch};

pub use memory::MemoryAnalysisStore;
pub use postgres::PgAnalysisStore;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts the upload unless a résumé with the same id exists, and returns
    /// the stored row either way. Concurrent calls for one id never fail.
    async fn ensure_resume(&self, resume: NewResume) -> Result<ResumeRow>;

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>>;

    /// Newest first. `owner_id` filters to one user's uploads.
    async fn list_resumes(&self, owner_id: Option<Uuid>) -> Result<Vec<ResumeRow>>;

    async fn save_analysis(&self, resume_id: Uuid, analysis: &AnalysisResult)
        -> Result<StoredAnalysis>;

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<StoredAnalysis>>;

    async fn create_job(&self, job: &JobRequirement) -> Result<JobPosting>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>>;

    /// Newest first. `owner_id` filters to one recruiter's postings.
    async fn list_jobs(&self, owner_id: Option<Uuid>) -> Result<Vec<JobPosting>>;

    async fn save_match(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<StoredMatch>;

    /// Best score first.
    async fn list_matches(&self, resume_id: Uuid) -> Result<Vec<StoredMatch>>;

    /// Résumés matched against one posting, best score first.
    async fn list_matches_for_job(&self, job_id: Uuid) -> Result<Vec<JobCandidate>>;

    fn backend_name(&self) -> &'static str;
}

/// Encodes an analysis into its `analysis_results` row.
pub(crate) fn analysis_row(resume_id: Uuid, analysis: &AnalysisResult) -> AnalysisRow {
    AnalysisRow {
        id: Uuid::new_v4(),
        resume_id,
        skills: join_list(&analysis.skills),
        education: join_list(&analysis.education),
        experience: join_list(&analysis.experience),
        score: i32::try_from(analysis.score).unwrap_or(i32::MAX),
        suggestions: join_list(&analysis.suggestions),
        wordcloud_path: analysis.wordcloud_path.clone(),
        vocabulary_version: analysis.vocabulary_version.clone(),
        text_length: i64::try_from(analysis.text_length).unwrap_or(i64::MAX),
        created_at: chrono::Utc::now(),
    }
}
