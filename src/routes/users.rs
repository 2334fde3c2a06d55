use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::auth::{self, AuthUser};
use crate::db::user_queries;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    info!("POST /users - Registering {}", email);

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if req.password.chars().count() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    if user_queries::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Duplicate(format!("{} is already registered", email)));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = user_queries::create_user(&state.pool, &email, &password_hash).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = user_queries::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::Unauthorized)?;
    auth::verify_password(&req.password, &user.password_hash)?;

    let claims = auth::Claims::new(user.id, &user.email);
    let token = auth::issue_token(&claims, &state.jwt_secret)?;
    info!("🔑 {} logged in", user.email);

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_queries::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user.into()))
}
