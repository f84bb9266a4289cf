use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Booking, BookingStatus, Service, Slot, User};

/// Seats currently held against a slot. Shared between availability
/// reporting and the booking admission guard so the two definitions
/// cannot drift.
const CONFIRMED_COUNT_EXPR: &str =
    "(SELECT COUNT(*) FROM bookings WHERE slot_id = ?1 AND status = 'confirmed')";

fn now_str() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Users ──

pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3)",
        params![name, email, password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?1",
        params![id],
        parse_user_row,
    )
    .optional()
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?1",
        params![email],
        parse_user_row,
    )
    .optional()
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

// ── Services ──

pub fn insert_service(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    duration_minutes: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO services (name, description, duration_minutes) VALUES (?1, ?2, ?3)",
        params![name, description, duration_minutes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_services(conn: &Connection) -> rusqlite::Result<Vec<Service>> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, duration_minutes FROM services ORDER BY id")?;
    let rows = stmt.query_map([], parse_service_row)?;
    rows.collect()
}

pub fn get_service(conn: &Connection, id: i64) -> rusqlite::Result<Option<Service>> {
    conn.query_row(
        "SELECT id, name, description, duration_minutes FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    )
    .optional()
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
    })
}

// ── Slots ──

pub fn insert_slot(
    conn: &Connection,
    service_id: i64,
    date: &str,
    start_time: &str,
    capacity: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO slots (service_id, date, start_time, capacity) VALUES (?1, ?2, ?3, ?4)",
        params![service_id, date, start_time, capacity],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Exact match on (service_id, date, start_time); no fuzzy time matching.
pub fn get_slot(
    conn: &Connection,
    service_id: i64,
    date: &str,
    start_time: &str,
) -> rusqlite::Result<Option<Slot>> {
    conn.query_row(
        "SELECT id, service_id, date, start_time, capacity FROM slots
         WHERE service_id = ?1 AND date = ?2 AND start_time = ?3",
        params![service_id, date, start_time],
        parse_slot_row,
    )
    .optional()
}

pub fn list_slots_for_day(
    conn: &Connection,
    service_id: i64,
    date: &str,
) -> rusqlite::Result<Vec<Slot>> {
    let mut stmt = conn.prepare(
        "SELECT id, service_id, date, start_time, capacity FROM slots
         WHERE service_id = ?1 AND date = ?2 ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map(params![service_id, date], parse_slot_row)?;
    rows.collect()
}

fn parse_slot_row(row: &rusqlite::Row) -> rusqlite::Result<Slot> {
    Ok(Slot {
        id: row.get(0)?,
        service_id: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        capacity: row.get(4)?,
    })
}

// ── Bookings ──

pub fn confirmed_count(conn: &Connection, slot_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        &format!("SELECT {CONFIRMED_COUNT_EXPR}"),
        params![slot_id],
        |row| row.get(0),
    )
}

/// Admit a booking only if the slot still has a free seat. The capacity
/// check and the insert are a single SQL statement, so two concurrent
/// requests for the last seat can never both succeed. Returns the new
/// booking id, or None when the slot is full.
pub fn insert_booking_if_capacity(
    conn: &Connection,
    user_id: i64,
    slot: &Slot,
) -> rusqlite::Result<Option<i64>> {
    let now = now_str();
    let sql = format!(
        "INSERT INTO bookings (user_id, service_id, slot_id, date, start_time, status, created_at, updated_at)
         SELECT ?2, ?3, ?1, ?4, ?5, 'confirmed', ?6, ?6
         WHERE {CONFIRMED_COUNT_EXPR} < ?7"
    );
    let inserted = conn.execute(
        &sql,
        params![
            slot.id,
            user_id,
            slot.service_id,
            slot.date,
            slot.start_time,
            now,
            slot.capacity,
        ],
    )?;

    if inserted == 0 {
        Ok(None)
    } else {
        Ok(Some(conn.last_insert_rowid()))
    }
}

pub fn get_booking(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        "SELECT id, user_id, service_id, slot_id, date, start_time, status, created_at, updated_at
         FROM bookings WHERE id = ?1",
        params![id],
        parse_booking_row,
    )
    .optional()
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(6)?;
    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service_id: row.get(2)?,
        slot_id: row.get(3)?,
        date: row.get(4)?,
        start_time: row.get(5)?,
        status: BookingStatus::parse(&status_str),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// ── Booking read models ──

pub struct BookingRow {
    pub id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub date: String,
    pub start_time: String,
    pub status: BookingStatus,
}

pub fn list_bookings_for_user(
    conn: &Connection,
    user_id: i64,
) -> rusqlite::Result<Vec<BookingRow>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.service_id, s.name, b.date, b.start_time, b.status
         FROM bookings b
         JOIN services s ON s.id = b.service_id
         WHERE b.user_id = ?1
         ORDER BY b.date DESC, b.start_time DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        let status_str: String = row.get(5)?;
        Ok(BookingRow {
            id: row.get(0)?,
            service_id: row.get(1)?,
            service_name: row.get(2)?,
            date: row.get(3)?,
            start_time: row.get(4)?,
            status: BookingStatus::parse(&status_str),
        })
    })?;
    rows.collect()
}

pub struct AdminBookingRow {
    pub id: i64,
    pub service_id: i64,
    pub service_name: String,
    pub user_name: String,
    pub date: String,
    pub start_time: String,
    pub status: BookingStatus,
}

pub fn list_all_bookings(conn: &Connection) -> rusqlite::Result<Vec<AdminBookingRow>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.service_id, s.name, u.name, b.date, b.start_time, b.status
         FROM bookings b
         JOIN services s ON s.id = b.service_id
         JOIN users u ON u.id = b.user_id
         ORDER BY b.date DESC, b.start_time DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        let status_str: String = row.get(6)?;
        Ok(AdminBookingRow {
            id: row.get(0)?,
            service_id: row.get(1)?,
            service_name: row.get(2)?,
            user_name: row.get(3)?,
            date: row.get(4)?,
            start_time: row.get(5)?,
            status: BookingStatus::parse(&status_str),
        })
    })?;
    rows.collect()
}
