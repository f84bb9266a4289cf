use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::services::auth;
use crate::services::booking;
use crate::state::AppState;

// POST /bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: i64,
    pub date: String,
    pub start_time: String,
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking_id: i64,
    pub status: String,
    pub service_id: i64,
    pub date: String,
    pub start_time: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), AppError> {
    let db = state.db.lock().unwrap();
    let user = auth::current_user(&db, &headers, &state.config)?;

    let confirmation =
        booking::create_booking(&db, user.id, req.service_id, &req.date, &req.start_time)?;

    tracing::info!(
        user_id = user.id,
        booking_id = confirmation.booking_id,
        "created booking"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            booking_id: confirmation.booking_id,
            status: confirmation.status.as_str().to_string(),
            service_id: confirmation.service_id,
            date: confirmation.date,
            start_time: confirmation.start_time,
        }),
    ))
}

// GET /bookings/mine
#[derive(Serialize)]
pub struct BookingDetailResponse {
    pub id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub date: String,
    pub start_time: String,
    pub status: String,
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingDetailResponse>>, AppError> {
    let db = state.db.lock().unwrap();
    let user = auth::current_user(&db, &headers, &state.config)?;

    let rows = queries::list_bookings_for_user(&db, user.id)?;
    let response = rows
        .into_iter()
        .map(|row| BookingDetailResponse {
            id: row.id,
            service_id: row.service_id,
            service_name: row.service_name,
            date: row.date,
            start_time: row.start_time,
            status: row.status.as_str().to_string(),
        })
        .collect();

    Ok(Json(response))
}

// DELETE /bookings/:id
#[derive(Serialize)]
pub struct CancelResponse {
    pub id: i64,
    pub status: String,
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CancelResponse>, AppError> {
    let db = state.db.lock().unwrap();
    let user = auth::current_user(&db, &headers, &state.config)?;

    let status = booking::cancel_booking(&db, user.id, id)?;

    tracing::info!(user_id = user.id, booking_id = id, "cancelled booking");

    Ok(Json(CancelResponse {
        id,
        status: status.as_str().to_string(),
    }))
}
