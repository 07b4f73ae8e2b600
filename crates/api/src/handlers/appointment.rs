//! # Booking Handlers
//!
//! Booking delegates the entire claim to the transactional repository: the
//! slot re-check, appointment insert, and status flip either all commit or
//! none do. A conflict (someone else committed first) surfaces as HTTP 409
//! with a message telling the caller to pick a different slot; the losing
//! request leaves no trace in the database.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use slotbook_core::{
    errors::BookingError,
    models::appointment::{
        AppointmentResponse, AppointmentStatus, BookSlotRequest, ListAppointmentsResponse,
    },
};
use uuid::Uuid;

use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    notifications, ApiState,
};

fn to_response(
    appointment: slotbook_db::models::DbAppointment,
) -> Result<AppointmentResponse, AppError> {
    let status: AppointmentStatus = appointment
        .status
        .parse()
        .map_err(|e: String| AppError(BookingError::Internal(e.into())))?;

    Ok(AppointmentResponse {
        id: appointment.id,
        owner_id: appointment.owner_id,
        requester_id: appointment.requester_id,
        requester_name: appointment.requester_name,
        purpose: appointment.purpose,
        slot_id: appointment.slot_id,
        starts_at: appointment.starts_at,
        ends_at: appointment.ends_at,
        status,
        booked_at: appointment.booked_at,
    })
}

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Path(slot_id): Path<Uuid>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    if payload.requester_name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Requester name must not be empty".to_string(),
        )));
    }

    let details = slotbook_db::repositories::appointment::NewAppointment {
        requester_id: caller.id,
        requester_name: &payload.requester_name,
        requester_contact: payload.requester_contact.as_deref(),
        purpose: &payload.purpose,
    };

    // Atomic claim. On conflict this returns SlotUnavailable and nothing
    // has been written.
    let appointment =
        slotbook_db::repositories::appointment::book_slot(&state.db_pool, slot_id, &details)
            .await?;

    // Reminder runs outside the transaction boundary; its failure never
    // affects the committed booking.
    notifications::dispatch_reminder(state.reminders.clone(), appointment.clone());

    Ok(Json(to_response(appointment)?))
}

/// Query parameters for listing appointments
#[derive(Debug, Deserialize)]
pub struct ListAppointmentsQuery {
    /// Which side of the booking to list: "requester" (default) shows the
    /// caller's own bookings, "owner" shows bookings against the caller's
    /// calendar.
    pub view: Option<String>,
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<ListAppointmentsResponse>, AppError> {
    let appointments = match query.view.as_deref() {
        Some("owner") => {
            slotbook_db::repositories::appointment::list_appointments_for_owner(
                &state.db_pool,
                caller.id,
            )
            .await
            .map_err(BookingError::Database)?
        }
        Some("requester") | None => {
            slotbook_db::repositories::appointment::list_appointments_for_requester(
                &state.db_pool,
                caller.id,
            )
            .await
            .map_err(BookingError::Database)?
        }
        Some(other) => {
            return Err(AppError(BookingError::Validation(format!(
                "Unknown view '{other}': expected 'requester' or 'owner'"
            ))));
        }
    };

    let appointments = appointments
        .into_iter()
        .map(to_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListAppointmentsResponse { appointments }))
}
