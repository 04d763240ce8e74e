use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
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

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the migrations under `apps/api/migrations`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn ensure_resume(&self, resume: NewResume) -> Result<ResumeRow> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO resumes (id, owner_id, file_name, document_kind)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner_id)
        .bind(&resume.file_name)
        .bind(&resume.document_kind)
        .execute(&self.pool)
        .await?
        .rows_affected();

        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(resume.id)
            .fetch_one(&self.pool)
            .await?;
        if inserted > 0 {
            info!("Saved resume {} ({})", row.id, row.file_name);
        }
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_resumes(&self, owner_id: Option<Uuid>) -> Result<Vec<ResumeRow>> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT * FROM resumes
            WHERE $1::uuid IS NULL OR owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save_analysis(
        &self,
        resume_id: Uuid,
        analysis: &AnalysisResult,
    ) -> Result<StoredAnalysis> {
        let row = analysis_row(resume_id, analysis);

        // Append-only: every analysis is a new row.
        let saved = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO analysis_results
                (id, resume_id, skills, education, experience, score, suggestions,
                 wordcloud_path, vocabulary_version, text_length, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(&row.skills)
        .bind(&row.education)
        .bind(&row.experience)
        .bind(row.score)
        .bind(&row.suggestions)
        .bind(&row.wordcloud_path)
        .bind(&row.vocabulary_version)
        .bind(row.text_length)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved analysis {} for resume {resume_id} (score {})", saved.id, saved.score);
        Ok(saved.into())
    }

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<StoredAnalysis>> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT * FROM analysis_results
            WHERE resume_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoredAnalysis::from))
    }

    async fn create_job(&self, job: &JobRequirement) -> Result<JobPosting> {
        let row = sqlx::query_as::<_, JobPostingRow>(
            r#"
            INSERT INTO job_postings
                (id, owner_id, title, description, required_skills,
                 required_education, required_experience)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.owner_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.required_education)
        .bind(&job.required_experience)
        .fetch_one(&self.pool)
        .await?;

        info!("Created job posting {} '{}'", row.id, row.title);
        Ok(row.into())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        let row = sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(JobPosting::from))
    }

    async fn list_jobs(&self, owner_id: Option<Uuid>) -> Result<Vec<JobPosting>> {
        let rows = sqlx::query_as::<_, JobPostingRow>(
            r#"
            SELECT * FROM job_postings
            WHERE $1::uuid IS NULL OR owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn save_match(
        &self,
        resume_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<StoredMatch> {
        let row = MatchRow::new(resume_id, job_id, result.score, &result.details);
        let saved = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO resume_job_matches (id, resume_id, job_id, score, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.resume_id)
        .bind(row.job_id)
        .bind(row.score)
        .bind(&row.details)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved.into())
    }

    async fn list_matches(&self, resume_id: Uuid) -> Result<Vec<StoredMatch>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT * FROM resume_job_matches
            WHERE resume_id = $1
            ORDER BY score DESC, created_at ASC
            "#,
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredMatch::from).collect())
    }

    async fn list_matches_for_job(&self, job_id: Uuid) -> Result<Vec<JobCandidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT m.*, r.file_name
            FROM resume_job_matches m
            JOIN resumes r ON r.id = m.resume_id
            WHERE m.job_id = $1
            ORDER BY m.score DESC, m.created_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobCandidate::from).collect())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
