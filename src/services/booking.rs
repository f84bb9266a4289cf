use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BookingStatus;

pub struct BookingConfirmation {
    pub booking_id: i64,
    pub status: BookingStatus,
    pub service_id: i64,
    pub date: String,
    pub start_time: String,
}

/// Reserve one seat. Admission is atomic with respect to concurrent
/// callers targeting the same slot: the capacity check and the insert
/// run as one statement in `insert_booking_if_capacity`, so the count
/// of confirmed bookings can never exceed capacity.
///
/// The confirmation echoes the request's date/time strings rather than
/// re-deriving them from storage.
pub fn create_booking(
    conn: &Connection,
    user_id: i64,
    service_id: i64,
    date: &str,
    start_time: &str,
) -> Result<BookingConfirmation, AppError> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err()
        || NaiveTime::parse_from_str(start_time, "%H:%M").is_err()
    {
        return Err(AppError::InvalidInput(
            "Invalid date or time format".to_string(),
        ));
    }

    let service = queries::get_service(conn, service_id)?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    let slot = queries::get_slot(conn, service_id, date, start_time)?
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;

    let booking_id = queries::insert_booking_if_capacity(conn, user_id, &slot)?
        .ok_or_else(|| AppError::Conflict("Slot is full".to_string()))?;

    Ok(BookingConfirmation {
        booking_id,
        status: BookingStatus::Confirmed,
        service_id: service.id,
        date: date.to_string(),
        start_time: start_time.to_string(),
    })
}

/// One-way transition to `cancelled`, allowed only for the owner.
/// Cancelling frees the seat: the capacity count only considers
/// confirmed bookings.
pub fn cancel_booking(
    conn: &Connection,
    user_id: i64,
    booking_id: i64,
) -> Result<BookingStatus, AppError> {
    let booking = queries::get_booking(conn, booking_id)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != user_id {
        return Err(AppError::Forbidden(
            "Not authorized to cancel this booking".to_string(),
        ));
    }

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::Conflict("Booking already cancelled".to_string()));
    }

    queries::update_booking_status(conn, booking_id, BookingStatus::Cancelled)?;
    Ok(BookingStatus::Cancelled)
}
