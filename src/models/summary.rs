use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Free-text daily note, one per user per date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Summary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertSummaryRequest {
    pub date: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub id: Uuid,
    pub date: String,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Summary> for SummaryResponse {
    fn from(s: Summary) -> Self {
        Self {
            id: s.id,
            date: s.date,
            content: s.content,
            updated_at: s.updated_at,
        }
    }
}
