use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::analysis::{join_list, split_list};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub file_name: String,
    pub document_kind: String,
    pub created_at: DateTime<Utc>,
}

/// Upload record to insert. `id` is chosen by the caller so the word-cloud
/// artifact can be named before the row exists.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub file_name: String,
    pub document_kind: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMatch {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub details: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MatchRow> for StoredMatch {
    fn from(row: MatchRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            job_id: row.job_id,
            score: row.score,
            details: split_list(&row.details),
            created_at: row.created_at,
        }
    }
}

/// A stored match joined with the upload it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub score: f64,
    pub details: String,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
}

/// One résumé matched against a job posting, as listed for that posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCandidate {
    #[serde(flatten)]
    pub matched: StoredMatch,
    pub file_name: String,
}

impl From<CandidateRow> for JobCandidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            matched: StoredMatch {
                id: row.id,
                resume_id: row.resume_id,
                job_id: row.job_id,
                score: row.score,
                details: split_list(&row.details),
                created_at: row.created_at,
            },
            file_name: row.file_name,
        }
    }
}

impl MatchRow {
    pub fn new(resume_id: Uuid, job_id: Uuid, score: f64, details: &[String]) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume_id,
            job_id,
            score,
            details: join_list(details),
            created_at: Utc::now(),
        }
    }
}
