use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{categories, health, interests, snapshots, summaries, users};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/users", users::router())
        .nest("/api/stocks", snapshots::router())
        .nest("/api/categories", categories::router())
        .nest("/api/interests", interests::router())
        .nest("/api/summaries", summaries::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
