use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A faculty-declared time window for one calendar day, subdivided into
/// bookable slots exactly once, at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: NaiveDate,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub slot_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub day: NaiveDate,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    /// Slot length in minutes; omitted or non-positive values fall back
    /// to the 30-minute default.
    pub slot_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: NaiveDate,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub slot_minutes: i32,
    /// Number of slots actually inserted. Re-submitting a window that was
    /// already expanded reports 0 here; that is not an error.
    pub slots_created: u64,
    pub created_at: DateTime<Utc>,
}
