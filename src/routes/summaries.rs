use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use tracing::info;

use crate::auth::AuthUser;
use crate::db::summary_queries;
use crate::errors::AppError;
use crate::models::{SummaryResponse, UpsertSummaryRequest};
use crate::state::AppState;
use crate::utils;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_summaries))
        .route("/", put(upsert_summary))
        .route("/:date", get(get_summary))
}

async fn list_summaries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SummaryResponse>>, AppError> {
    let summaries = summary_queries::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(summaries.into_iter().map(SummaryResponse::from).collect()))
}

async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let date = utils::normalize_date(&date)?;
    let summary = summary_queries::find_by_date(&state.pool, auth.user_id, &date)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(summary.into()))
}

/// One note per day: writing for an existing date replaces the content.
async fn upsert_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpsertSummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let date = utils::normalize_date(&req.date)?;
    info!("PUT /summaries - Saving note for {}", date);
    let summary =
        summary_queries::upsert_summary(&state.pool, auth.user_id, &date, req.content.as_deref())
            .await?;
    Ok(Json(summary.into()))
}
