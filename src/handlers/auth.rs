use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name must not be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    // bcrypt input limit
    if req.password.len() > 72 {
        return Err(AppError::InvalidInput(
            "Password must be at most 72 characters".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&req.password)?;

    let user_id = {
        let db = state.db.lock().unwrap();
        if queries::get_user_by_email(&db, &req.email)?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        queries::insert_user(&db, name, &req.email, &password_hash)?
    };

    tracing::info!(user_id, "registered new user");

    let access = auth::issue_access_token(user_id, &state.config)?;
    let refresh = auth::issue_refresh_token(user_id, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access,
            refresh,
            user: UserResponse {
                id: user_id,
                name: name.to_string(),
                email: req.email,
            },
        }),
    ))
}

// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, &req.email)?
    }
    .ok_or(AppError::Unauthenticated)?;

    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthenticated);
    }

    let access = auth::issue_access_token(user.id, &state.config)?;
    let refresh = auth::issue_refresh_token(user.id, &state.config)?;

    Ok(Json(TokenResponse {
        access,
        refresh,
        user: UserResponse::from(&user),
    }))
}

// POST /auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let user_id = auth::resolve_refresh(&req.refresh, &state.config)?;

    // The subject may have been deleted since the refresh token was
    // issued; re-check before minting a new access token.
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_id(&db, user_id)?
    }
    .ok_or(AppError::Unauthenticated)?;

    let access = auth::issue_access_token(user.id, &state.config)?;
    Ok(Json(RefreshResponse { access }))
}
