use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{category_queries, interest_queries, snapshot_queries};
use crate::errors::AppError;
use crate::models::{Snapshot, SnapshotResponse, SubmitSnapshotRequest, UpdateSnapshotRequest};
use crate::services::hangul_search::{build_search_terms, SearchColumn};
use crate::services::snapshot_service;
use crate::state::AppState;
use crate::utils;

const MAX_SEARCH_WORD_CHARS: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        // specific routes BEFORE parameterized routes
        .route("/search", get(search_snapshots))
        .route("/", post(submit_snapshot))
        .route("/", get(list_snapshots))
        .route("/:id", put(update_snapshot))
        .route("/:id", delete(delete_snapshot))
}

// ==============================================================================
// Query Parameters
// ==============================================================================

#[derive(Debug, Deserialize)]
struct ListParams {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    word: String,
    column: Option<String>,
}

// ==============================================================================
// Handlers
// ==============================================================================

async fn submit_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubmitSnapshotRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("POST /stocks - Recording snapshot of {}", req.code);
    let response =
        snapshot_service::submit(&state.pool, state.market.as_ref(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_snapshots(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SnapshotResponse>>, AppError> {
    let date = match params.date.as_deref() {
        Some(raw) => Some(utils::normalize_date(raw)?),
        None => None,
    };
    info!("GET /stocks - Listing snapshots (date: {:?})", date);

    let snapshots =
        snapshot_queries::list_for_user(&state.pool, auth.user_id, date.as_deref()).await?;
    let responses = enrich(&state, auth.user_id, snapshots).await?;
    Ok(Json(responses))
}

async fn search_snapshots(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SnapshotResponse>>, AppError> {
    let column = match params.column.as_deref() {
        None => SearchColumn::Name,
        Some(raw) => SearchColumn::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("unknown search column: {}", raw)))?,
    };

    let word = params.word.trim();
    if word.chars().count() > MAX_SEARCH_WORD_CHARS {
        return Err(AppError::Validation("search word is too long".to_string()));
    }
    info!("GET /stocks/search - word: {:?}", word);

    // An empty word falls through to a plain listing; the predicate builder
    // would render a match-everything clause anyway.
    let snapshots = if word.is_empty() {
        snapshot_queries::list_for_user(&state.pool, auth.user_id, None).await?
    } else {
        let terms = build_search_terms(word);
        snapshot_queries::search_for_user(&state.pool, auth.user_id, column, &terms).await?
    };

    let responses = enrich(&state, auth.user_id, snapshots).await?;
    Ok(Json(responses))
}

async fn update_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSnapshotRequest>,
) -> Result<Json<SnapshotResponse>, AppError> {
    info!("PUT /stocks/{} - Updating snapshot", id);
    let response =
        snapshot_service::update(&state.pool, state.market.as_ref(), auth.user_id, id, req)
            .await?;
    Ok(Json(response))
}

async fn delete_snapshot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /stocks/{} - Deleting snapshot", id);
    snapshot_service::delete(&state.pool, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// Helpers
// ==============================================================================

/// Attaches category names and interest flags to raw snapshot rows. Two
/// keyed lookups cover the whole page; a personal diary never has enough
/// rows to need anything smarter.
async fn enrich(
    state: &AppState,
    user_id: Uuid,
    snapshots: Vec<Snapshot>,
) -> Result<Vec<SnapshotResponse>, AppError> {
    let categories: HashMap<Uuid, String> =
        category_queries::list_for_user(&state.pool, user_id)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
    let interests: HashSet<String> = interest_queries::list_for_user(&state.pool, user_id)
        .await?
        .into_iter()
        .map(|i| i.stock_code)
        .collect();

    Ok(snapshots
        .into_iter()
        .map(|s| {
            let category_name = s.category_id.and_then(|id| categories.get(&id).cloned());
            let is_interest = interests.contains(&s.code);
            SnapshotResponse::from_parts(s, category_name, is_interest)
        })
        .collect())
}
