use serde::{Deserialize, Serialize};

/// A bookable class definition. Read-only from the booking flow's
/// perspective; slots reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i64,
}
