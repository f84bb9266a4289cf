use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Slot;

#[derive(Debug, Serialize)]
pub struct SlotAvailability {
    pub id: i64,
    pub start_time: String,
    pub capacity: i64,
    pub reserved: i64,
    pub available: i64,
}

/// Slots of a service on one day, ordered by start time, each with its
/// live seat count.
pub fn slots_for_day(
    conn: &Connection,
    service_id: i64,
    date: &str,
) -> Result<Vec<SlotAvailability>, AppError> {
    queries::get_service(conn, service_id)?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;

    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(AppError::InvalidInput(
            "Invalid date format. Use YYYY-MM-DD".to_string(),
        ));
    }

    let slots = queries::list_slots_for_day(conn, service_id, date)?;
    let mut out = Vec::with_capacity(slots.len());
    for slot in &slots {
        out.push(availability(conn, slot)?);
    }
    Ok(out)
}

/// Free seats are capacity minus confirmed bookings, never reported
/// negative. An over-count is a data-integrity problem worth a warning,
/// not a crash.
pub fn availability(conn: &Connection, slot: &Slot) -> Result<SlotAvailability, AppError> {
    let reserved = queries::confirmed_count(conn, slot.id)?;
    if reserved > slot.capacity {
        tracing::warn!(
            slot_id = slot.id,
            reserved,
            capacity = slot.capacity,
            "confirmed bookings exceed slot capacity"
        );
    }
    Ok(SlotAvailability {
        id: slot.id,
        start_time: slot.start_time.clone(),
        capacity: slot.capacity,
        reserved,
        available: (slot.capacity - reserved).max(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::BookingStatus;

    fn setup() -> (Connection, i64) {
        let conn = db::init_db(":memory:").unwrap();
        let service_id = queries::insert_service(&conn, "Morning Yoga", None, 60).unwrap();
        (conn, service_id)
    }

    #[test]
    fn test_unknown_service_rejected() {
        let conn = db::init_db(":memory:").unwrap();
        let result = slots_for_day(&conn, 99, "2025-03-01");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_bad_date_rejected() {
        let (conn, service_id) = setup();
        let result = slots_for_day(&conn, service_id, "03/01/2025");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_slots_ordered_by_start_time() {
        let (conn, service_id) = setup();
        queries::insert_slot(&conn, service_id, "2025-03-01", "18:00", 5).unwrap();
        queries::insert_slot(&conn, service_id, "2025-03-01", "09:00", 5).unwrap();
        queries::insert_slot(&conn, service_id, "2025-03-02", "07:00", 5).unwrap();

        let slots = slots_for_day(&conn, service_id, "2025-03-01").unwrap();
        let times: Vec<&str> = slots.iter().map(|s| s.start_time.as_str()).collect();
        assert_eq!(times, ["09:00", "18:00"]);
    }

    #[test]
    fn test_availability_ignores_cancelled() {
        let (conn, service_id) = setup();
        let user_a = queries::insert_user(&conn, "A", "a@example.com", "x").unwrap();
        let user_b = queries::insert_user(&conn, "B", "b@example.com", "x").unwrap();
        queries::insert_slot(&conn, service_id, "2025-03-01", "09:00", 2).unwrap();
        let slot = queries::get_slot(&conn, service_id, "2025-03-01", "09:00")
            .unwrap()
            .unwrap();

        let first = queries::insert_booking_if_capacity(&conn, user_a, &slot)
            .unwrap()
            .unwrap();
        queries::insert_booking_if_capacity(&conn, user_b, &slot)
            .unwrap()
            .unwrap();

        let info = availability(&conn, &slot).unwrap();
        assert_eq!(info.reserved, 2);
        assert_eq!(info.available, 0);

        queries::update_booking_status(&conn, first, BookingStatus::Cancelled).unwrap();
        let info = availability(&conn, &slot).unwrap();
        assert_eq!(info.reserved, 1);
        assert_eq!(info.available, 1);
    }
}
