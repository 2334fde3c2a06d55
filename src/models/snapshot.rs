use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Snapshot Models
// ==============================================================================

/// One recorded observation of a stock for one user on one date.
/// `register_date` is the normalized `YYYY-MM-DD` string the user submitted,
/// not a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Snapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub code: String,
    pub current_price: BigDecimal,
    pub previous_close: BigDecimal,
    pub diff_price: BigDecimal,
    pub diff_percent: BigDecimal,
    pub register_date: String,
    pub issue: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload assembled by the reconciler; ids and timestamps come from
/// the storage layer.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub code: String,
    pub current_price: BigDecimal,
    pub previous_close: BigDecimal,
    pub diff_price: BigDecimal,
    pub diff_percent: BigDecimal,
    pub register_date: String,
    pub issue: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitSnapshotRequest {
    pub code: String,
    pub category_name: Option<String>,
    pub register_date: String,
    pub is_interest: bool,
    pub issue: Option<String>,
    // Only honored for past dates; today's prices come from the live quote.
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSnapshotRequest {
    pub category_name: Option<String>,
    pub is_interest: bool,
    pub issue: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub diff_price: f64,
    pub diff_percent: f64,
    pub register_date: String,
    pub issue: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub is_interest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SnapshotResponse {
    pub fn from_parts(s: Snapshot, category_name: Option<String>, is_interest: bool) -> Self {
        Self {
            id: s.id,
            name: s.name,
            code: s.code,
            current_price: price_f64(&s.current_price),
            previous_close: price_f64(&s.previous_close),
            diff_price: price_f64(&s.diff_price),
            diff_percent: price_f64(&s.diff_percent),
            register_date: s.register_date,
            issue: s.issue,
            category_id: s.category_id,
            category_name,
            is_interest,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

pub fn price_f64(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}
