use chrono::NaiveDate;
use mockall::mock;
use slotbook_core::{errors::BookingResult, slots::SlotInterval};
use uuid::Uuid;

use crate::models::{DbAppointment, DbAvailability, DbSlot};

// Mock repositories for testing
mock! {
    pub AvailabilityRepo {
        pub async fn create_availability(
            &self,
            owner_id: Uuid,
            day: NaiveDate,
            window_start: chrono::NaiveTime,
            window_end: chrono::NaiveTime,
            slot_minutes: i32,
        ) -> eyre::Result<DbAvailability>;

        pub async fn get_availability_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAvailability>>;
    }
}

mock! {
    pub SlotRepo {
        pub async fn insert_candidate_slots(
            &self,
            owner_id: Uuid,
            availability_id: Uuid,
            day: NaiveDate,
            intervals: Vec<SlotInterval>,
        ) -> eyre::Result<u64>;

        pub async fn list_available_slots(
            &self,
            owner_id: Option<Uuid>,
            from_day: NaiveDate,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn get_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbSlot>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn book_slot(
            &self,
            slot_id: Uuid,
            requester_id: Uuid,
            requester_name: &'static str,
            requester_contact: Option<&'static str>,
            purpose: &'static str,
        ) -> BookingResult<DbAppointment>;

        pub async fn list_appointments_for_requester(
            &self,
            requester_id: Uuid,
        ) -> eyre::Result<Vec<DbAppointment>>;

        pub async fn list_appointments_for_owner(
            &self,
            owner_id: Uuid,
        ) -> eyre::Result<Vec<DbAppointment>>;
    }
}
