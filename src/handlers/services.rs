use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Service;
use crate::services::auth;
use crate::services::catalog::{self, SlotAvailability};
use crate::state::AppState;

// GET /services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db.lock().unwrap();
    auth::current_user(&db, &headers, &state.config)?;

    Ok(Json(queries::list_services(&db)?))
}

// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Service>, AppError> {
    let db = state.db.lock().unwrap();
    auth::current_user(&db, &headers, &state.config)?;

    let service = queries::get_service(&db, id)?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
    Ok(Json(service))
}

// GET /services/:id/slots?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub service_id: i64,
    pub date: String,
    pub slots: Vec<SlotAvailability>,
}

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let db = state.db.lock().unwrap();
    auth::current_user(&db, &headers, &state.config)?;

    let slots = catalog::slots_for_day(&db, id, &query.date)?;
    Ok(Json(SlotsResponse {
        service_id: id,
        date: query.date,
        slots,
    }))
}
