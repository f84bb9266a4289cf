use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;

/// Access tokens authorize protected endpoints; refresh tokens are
/// accepted only by the refresh endpoint. Neither is valid in the
/// other's place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub exp: i64,
}

pub fn issue_access_token(user_id: i64, config: &AppConfig) -> Result<String, AppError> {
    issue_token(
        user_id,
        TokenKind::Access,
        Duration::minutes(config.access_ttl_minutes),
        &config.jwt_secret,
    )
}

pub fn issue_refresh_token(user_id: i64, config: &AppConfig) -> Result<String, AppError> {
    issue_token(
        user_id,
        TokenKind::Refresh,
        Duration::days(config.refresh_ttl_days),
        &config.jwt_secret,
    )
}

fn issue_token(
    user_id: i64,
    kind: TokenKind,
    ttl: Duration,
    secret: &str,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        kind,
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthenticated)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the acting user from an access token. Fails closed: missing
/// header, malformed/expired token, wrong token kind and unknown
/// subject all collapse into `Unauthenticated`.
pub fn current_user(
    conn: &Connection,
    headers: &HeaderMap,
    config: &AppConfig,
) -> Result<User, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthenticated)?;
    let claims = decode_claims(token, &config.jwt_secret)?;
    if claims.kind != TokenKind::Access {
        return Err(AppError::Unauthenticated);
    }
    queries::get_user_by_id(conn, claims.sub)?.ok_or(AppError::Unauthenticated)
}

/// Validate a refresh token and return the subject id. Returns only the
/// id: the caller must re-check the user still exists before issuing a
/// new access token.
pub fn resolve_refresh(token: &str, config: &AppConfig) -> Result<i64, AppError> {
    let claims = decode_claims(token, &config.jwt_secret)?;
    if claims.kind != TokenKind::Refresh {
        return Err(AppError::Unauthenticated);
    }
    Ok(claims.sub)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
