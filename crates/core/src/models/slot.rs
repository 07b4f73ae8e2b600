use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a slot. `available` transitions to `booked` through a
/// successful booking transaction; `cancelled` is set out of band. Both
/// `booked` and `cancelled` are terminal here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Cancelled,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "booked" => Ok(SlotStatus::Booked),
            "cancelled" => Ok(SlotStatus::Cancelled),
            other => Err(format!("Unknown slot status: {other}")),
        }
    }
}

/// A discrete bookable interval. The (owner, day, start, end) tuple is
/// unique; the slot is the unit of mutual exclusion for booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub owner_id: Uuid,
    /// Originating availability. Nullable: a slot outlives its window.
    pub availability_id: Option<Uuid>,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSlotsResponse {
    pub slots: Vec<SlotResponse>,
}
