use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Watch marker for one (user, stock code) pair, shared by every snapshot of
/// that code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stock_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterestResponse {
    pub id: Uuid,
    pub stock_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Interest> for InterestResponse {
    fn from(i: Interest) -> Self {
        Self {
            id: i.id,
            stock_code: i.stock_code,
            created_at: i.created_at,
        }
    }
}
