use serde::{Deserialize, Serialize};

/// A reservation of one seat in a slot. `date` and `start_time` are
/// copied from the slot at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub slot_id: i64,
    pub date: String,
    pub start_time: String,
    pub status: BookingStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Only `confirmed` bookings count against slot capacity. The only
/// transition is `confirmed -> cancelled`, and it is one-way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Confirmed,
        }
    }
}
