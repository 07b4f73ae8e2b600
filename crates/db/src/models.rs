use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailability {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub day: NaiveDate,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub slot_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub availability_id: Option<Uuid>,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub requester_id: Uuid,
    pub requester_name: String,
    pub requester_contact: Option<String>,
    pub purpose: String,
    pub slot_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}
