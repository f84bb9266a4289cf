use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

// The admin surface is guarded by a static bearer token from config;
// there is no admin user model.
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthenticated);
    }
    Ok(())
}

// GET /admin/bookings
#[derive(Serialize)]
pub struct AdminBookingResponse {
    pub id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub user_name: String,
    pub date: String,
    pub start_time: String,
    pub status: String,
}

pub async fn all_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminBookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let rows = {
        let db = state.db.lock().unwrap();
        queries::list_all_bookings(&db)?
    };

    let response = rows
        .into_iter()
        .map(|row| AdminBookingResponse {
            id: row.id,
            service_id: row.service_id,
            service_name: row.service_name,
            user_name: row.user_name,
            date: row.date,
            start_time: row.start_time,
            status: row.status.as_str().to_string(),
        })
        .collect();

    Ok(Json(response))
}
