use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::JobRequirement;

#[derive(Debug, Clone, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub required_skills: String,
    pub required_education: String,
    pub required_experience: String,
    pub created_at: DateTime<Utc>,
}

/// A stored job posting as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    #[serde(flatten)]
    pub requirement: JobRequirement,
    pub created_at: DateTime<Utc>,
}

impl From<JobPostingRow> for JobPosting {
    fn from(row: JobPostingRow) -> Self {
        Self {
            id: row.id,
            requirement: JobRequirement {
                title: row.title,
                description: row.description,
                required_skills: row.required_skills,
                required_education: row.required_education,
                required_experience: row.required_experience,
                owner_id: row.owner_id,
            },
            created_at: row.created_at,
        }
    }
}
