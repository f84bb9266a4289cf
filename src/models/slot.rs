use serde::{Deserialize, Serialize};

/// A specific offering of a service at a date and start time, with a
/// fixed seat capacity. Logical identity is (service_id, date,
/// start_time); slots are created administratively and never mutated
/// by the booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub service_id: i64,
    pub date: String,
    pub start_time: String,
    pub capacity: i64,
}
