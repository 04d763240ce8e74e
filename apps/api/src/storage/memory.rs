use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::matching::{JobRequirement, MatchResult};
use crate::models::analysis::{AnalysisRow, StoredAnalysis};
use crate::models::job::{JobPosting, JobPostingRow};
use crate::models::resume::{
    CandidateRow, JobCandidate, MatchRow, NewResume, ResumeRow, StoredMatch,
};
use crate::storage::{analysis_row, AnalysisStore};

/// In-process store used when no database is configured.
/// Rows are kept in their encoded form so both backends decode identically.
#[derive(Default)]
pub struct MemoryAnalysisStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    resumes: Vec<ResumeRow>,
    analyses: Vec<AnalysisRow>,
    jobs: Vec<JobPostingRow>,
    matches: Vec<MatchRow>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn resume(&self, id: Uuid) -> Option<&ResumeRow> {
        self.resumes.iter().find(|r| r.id == id)
    }

    fn insert_resume(&mut self, resume: NewResume) -> ResumeRow {
        let row = ResumeRow {
            id: resume.id,
            owner_id: resume.owner_id,
            file_name: resume.file_name,
            document_kind: resume.document_kind,
            created_at: Utc::now(),
        };
        self.resumes.push(row.clone());
        info!("Saved resume {} ({})", row.id, row.file_name);
        row
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn ensure_resume(&self, resume: NewResume) -> Result<ResumeRow> {
        // Check and insert under one write lock.
        let mut tables = self.inner.write().await;
        if let Some(existing) = tables.resume(resume.id) {
            return Ok(existing.clone());
        }
        Ok(tables.insert_resume(resume))
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(self.inner.read().await.resume(id).cloned())
    }

    async fn list_resumes(&self, owner_id: Option<Uuid>) -> Result<Vec<ResumeRow>> {
        let tables = self.inner.read().await;
        Ok(tables
            .resumes
            .iter()
            .rev()
            .filter(|r| owner_id.is_none() || r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn save_analysis(
        &self,
        resume_id: Uuid,
        analysis: &AnalysisResult,
    ) -> Result<StoredAnalysis> {
        let mut tables = self.inner.write().await;
        if tables.resume(resume_id).is_none() {
            bail!("resume {resume_id} does not exist");
        }
        let row = analysis_row(resume_id, analysis);
        tables.analyses.push(row.clone());
        info!("Saved analysis {} for resume {resume_id} (score {})", row.id, row.score);
        Ok(row.into())
    }

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<StoredAnalysis>> {
        let tables = self.inner.read().await;
        Ok(tables
            .analyses
            .iter()
            .rev()
            .find(|a| a.resume_id == resume_id)
            .cloned()
            .map(StoredAnalysis::from))
    }

    async fn create_job(&self, job: &JobRequirement) -> Result<JobPosting> {
        let row = JobPostingRow {
            id: Uuid::new_v4(),
            owner_id: job.owner_id,
            title: job.title.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            required_education: job.required_education.clone(),
            required_experience: job.required_experience.clone(),
            created_at: Utc::now(),
        };
        self.inner.write().await.jobs.push(row.clone());
        info!("Created job posting {} '{}'", row.id, row.title);
        Ok(row.into())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        let tables = self.inner.read().await;
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .map(JobPosting::from))
    }

    async fn list_jobs(&self, owner_id: Option<Uuid>) -> Result<Vec<JobPosting>> {
        let tables = self.inner.read().await;
        // Insertion order is creation order, so reversing gives newest first.
        Ok(tables
            .jobs
            .iter()
            .rev()
            .filter(|j| owner_id.is_none() || j.owner_id == owner_id)
            .cloned()
            .map(JobPosting::from)
            .collect())
    }

    async fn save_match(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<StoredMatch> {
        let mut tables = self.inner.write().await;
        if tables.resume(resume_id).is_none() {
            bail!("resume {resume_id} does not exist");
        }
        if !tables.jobs.iter().any(|j| j.id == job_id) {
            bail!("job posting {job_id} does not exist");
        }
        let row = MatchRow::new(resume_id, job_id, result.score, &result.details);
        tables.matches.push(row.clone());
        Ok(row.into())
    }

    async fn list_matches(&self, resume_id: Uuid) -> Result<Vec<StoredMatch>> {
        let tables = self.inner.read().await;
        let mut matches: Vec<StoredMatch> = tables
            .matches
            .iter()
            .filter(|m| m.resume_id == resume_id)
            .cloned()
            .map(StoredMatch::from)
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(matches)
    }

    async fn list_matches_for_job(&self, job_id: Uuid) -> Result<Vec<JobCandidate>> {
        let tables = self.inner.read().await;
        let mut candidates: Vec<JobCandidate> = tables
            .matches
            .iter()
            .filter(|m| m.job_id == job_id)
            .filter_map(|m| {
                let resume = tables.resume(m.resume_id)?;
                Some(JobCandidate::from(CandidateRow {
                    id: m.id,
                    resume_id: m.resume_id,
                    job_id: m.job_id,
                    score: m.score,
                    details: m.details.clone(),
                    created_at: m.created_at,
                    file_name: resume.file_name.clone(),
                }))
            })
            .collect();
        candidates.sort_by(|a, b| b.matched.score.total_cmp(&a.matched.score));
        Ok(candidates)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
