use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::ResumeFeatures;
use crate::errors::AppError;
use crate::matching::{rank_jobs, JobRequirement, MatchResult, RankedMatch};
use crate::models::job::JobPosting;
use crate::models::resume::{JobCandidate, StoredMatch};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchRequest {
    pub features: ResumeFeatures,
    pub job: JobRequirement,
}

#[derive(Deserialize)]
pub struct JobListQuery {
    pub owner_id: Option<Uuid>,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    Ok(Json(state.matcher.match_resume(&req.features, &req.job)))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(job): Json<JobRequirement>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("Job title must not be empty".into()));
    }
    let posting = state.store.create_job(&job).await?;
    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.store.list_jobs(params.owner_id).await?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobPosting>, AppError> {
    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))?;
    Ok(Json(job))
}

/// POST /api/v1/resumes/:resume_id/matches
///
/// Matches the latest analysis against every job posting, stores each
/// result, and returns them best first.
pub async fn handle_match_resume_to_jobs(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Vec<RankedMatch>>, AppError> {
    let analysis = state
        .store
        .latest_analysis(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis for resume {resume_id}")))?;
    let jobs = state.store.list_jobs(None).await?;

    let ranked = rank_jobs(state.matcher.as_ref(), &analysis.features, &jobs);
    for m in &ranked {
        state.store.save_match(resume_id, m.job_id, &m.result).await?;
    }

    info!(
        "Matched resume {resume_id} against {} jobs ({} backend)",
        ranked.len(),
        state.matcher.backend_name()
    );
    Ok(Json(ranked))
}

/// GET /api/v1/resumes/:resume_id/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Vec<StoredMatch>>, AppError> {
    if state.store.get_resume(resume_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(Json(state.store.list_matches(resume_id).await?))
}

/// GET /api/v1/jobs/:job_id/matches
pub async fn handle_list_job_matches(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobCandidate>>, AppError> {
    if state.store.get_job(job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job posting {job_id} not found")));
    }
    Ok(Json(state.store.list_matches_for_job(job_id).await?))
}
