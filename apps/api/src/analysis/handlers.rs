use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::extract::DocumentKind;
use crate::analysis::AnalysisResult;
use crate::errors::AppError;
use crate::models::analysis::StoredAnalysis;
use crate::models::resume::{NewResume, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub resume_id: Uuid,
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

#[derive(Deserialize)]
pub struct ResumeListQuery {
    pub owner_id: Option<Uuid>,
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    resume_id: Option<Uuid>,
    owner_id: Option<Uuid>,
}

/// POST /api/v1/resumes/analyze
///
/// Multipart fields: `file` (required), `resume_id` and `owner_id` (optional).
/// A known `resume_id` appends a new analysis to that résumé.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let kind = DocumentKind::from_filename(&upload.file_name);
    if !kind.is_supported() {
        return Err(AppError::UnsupportedFormat(kind.as_str().to_string()));
    }

    let resume_id = upload.resume_id.unwrap_or_else(Uuid::new_v4);
    let analyzer = state.analyzer.clone();
    let persist_id = resume_id.to_string();
    let bytes = upload.bytes;
    let analysis_kind = kind.clone();

    // Extraction and rendering are CPU-bound.
    let analysis = tokio::task::spawn_blocking(move || {
        analyzer.extract_and_analyze(&bytes, &analysis_kind, Some(&persist_id))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))??;

    // A known id keeps its original upload record.
    state
        .store
        .ensure_resume(NewResume {
            id: resume_id,
            owner_id: upload.owner_id,
            file_name: upload.file_name,
            document_kind: kind.as_str().to_string(),
        })
        .await?;
    let stored = state.store.save_analysis(resume_id, &analysis).await?;

    Ok(Json(AnalyzeResponse {
        resume_id,
        analysis_id: stored.id,
        analysis,
    }))
}

/// GET /api/v1/resumes/:resume_id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<StoredAnalysis>, AppError> {
    let analysis = state
        .store
        .latest_analysis(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis for resume {resume_id}")))?;
    Ok(Json(analysis))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ResumeListQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.store.list_resumes(params.owner_id).await?))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut resume_id = None;
    let mut owner_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("file field has no filename".into()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("resume_id") => resume_id = Some(parse_uuid_field("resume_id", field).await?),
            Some("owner_id") => owner_id = Some(parse_uuid_field("owner_id", field).await?),
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".into()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    Ok(Upload {
        file_name,
        bytes,
        resume_id,
        owner_id,
    })
}

async fn parse_uuid_field(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<Uuid, AppError> {
    let raw = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("'{name}' must be a UUID")))
}
