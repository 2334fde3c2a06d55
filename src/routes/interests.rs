use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::db::interest_queries;
use crate::errors::AppError;
use crate::models::InterestResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_interests))
}

/// Interest markers are toggled through snapshot submissions; this endpoint
/// only lists the watched codes.
async fn list_interests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<InterestResponse>>, AppError> {
    let interests = interest_queries::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(interests.into_iter().map(InterestResponse::from).collect()))
}
