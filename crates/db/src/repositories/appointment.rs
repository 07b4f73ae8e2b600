//! # Booking Transaction
//!
//! Atomically converts a selected slot plus requester details into a
//! confirmed appointment. All steps run inside one database transaction:
//!
//! 1. Lock and re-check the slot (`SELECT ... FOR UPDATE`, status must
//!    still be `available` — the client's view may be stale).
//! 2. Insert the appointment row referencing the slot.
//! 3. Flip the slot's status to `booked`.
//!
//! The `UNIQUE (slot_id)` constraint on appointments is the tie-breaker
//! for concurrent claims: whichever insert commits first wins, the loser's
//! transaction rolls back without having created an appointment or touched
//! the slot, and the caller is told to pick a different slot. The row lock
//! serializes most races before they reach the constraint; the constraint
//! catches anything that slips past.

use crate::models::{DbAppointment, DbSlot};
use chrono::{DateTime, Utc};
use eyre::Result;
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::{appointment::AppointmentStatus, slot::SlotStatus},
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Caller-supplied details for a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment<'a> {
    pub requester_id: Uuid,
    pub requester_name: &'a str,
    pub requester_contact: Option<&'a str>,
    pub purpose: &'a str,
}

fn db_err(err: sqlx::Error) -> BookingError {
    BookingError::Database(err.into())
}

/// Maps the appointment insert failure: a unique violation on `slot_id`
/// means another transaction claimed the slot first.
fn insert_err(err: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(db_error) = &err {
        if db_error.is_unique_violation() {
            return BookingError::SlotUnavailable(
                "This slot was just booked - choose another".to_string(),
            );
        }
    }
    db_err(err)
}

pub async fn book_slot(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
    details: &NewAppointment<'_>,
) -> BookingResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    // Step 1: lock the slot row and re-check its status.
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, availability_id, day, start_time, end_time, status, created_at
        FROM slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(slot_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| BookingError::NotFound(format!("Slot with ID {slot_id} not found")))?;

    if slot.status != SlotStatus::Available.as_str() {
        return Err(BookingError::SlotUnavailable(
            "This slot is no longer available - choose another".to_string(),
        ));
    }

    // Meeting times are absolute instants derived from the slot's day and
    // local times, interpreted as UTC.
    let starts_at: DateTime<Utc> = slot.day.and_time(slot.start_time).and_utc();
    let ends_at: DateTime<Utc> = slot.day.and_time(slot.end_time).and_utc();

    // Step 2: insert the appointment. A unique violation here means we
    // lost the race; the transaction is dropped and rolls back.
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments
            (id, owner_id, requester_id, requester_name, requester_contact,
             purpose, slot_id, starts_at, ends_at, status, booked_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, owner_id, requester_id, requester_name, requester_contact,
                  purpose, slot_id, starts_at, ends_at, status, booked_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(slot.owner_id)
    .bind(details.requester_id)
    .bind(details.requester_name)
    .bind(details.requester_contact)
    .bind(details.purpose)
    .bind(slot_id)
    .bind(starts_at)
    .bind(ends_at)
    .bind(AppointmentStatus::Confirmed.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(insert_err)?;

    // Step 3: mark the slot booked in the same transaction, so the status
    // column and the appointment reference can never drift apart.
    sqlx::query("UPDATE slots SET status = $2 WHERE id = $1")
        .bind(slot_id)
        .bind(SlotStatus::Booked.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!(
        "Booked slot {} for requester {}: appointment {}",
        slot_id,
        details.requester_id,
        appointment.id
    );

    Ok(appointment)
}

pub async fn list_appointments_for_requester(
    pool: &Pool<Postgres>,
    requester_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, owner_id, requester_id, requester_name, requester_contact,
               purpose, slot_id, starts_at, ends_at, status, booked_at
        FROM appointments
        WHERE requester_id = $1
        ORDER BY starts_at DESC
        "#,
    )
    .bind(requester_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_appointments_for_owner(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, owner_id, requester_id, requester_name, requester_contact,
               purpose, slot_id, starts_at, ends_at, status, booked_at
        FROM appointments
        WHERE owner_id = $1
        ORDER BY starts_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
