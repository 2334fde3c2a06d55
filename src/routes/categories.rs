use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::category_queries;
use crate::errors::AppError;
use crate::models::CategoryResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id", delete(delete_category))
}

async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = category_queries::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// Deleting a category orphans its snapshots' category reference; the rows
/// themselves stay.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /categories/{}", id);
    let deleted = category_queries::delete_category(&state.pool, auth.user_id, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
