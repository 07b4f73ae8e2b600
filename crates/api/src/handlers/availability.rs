//! # Availability Handlers
//!
//! Publishing an availability window is the only path that creates slots.
//! The flow is: validate the window, insert the availability record, expand
//! it with the pure slot generator, then bulk-insert the candidates with
//! conflict-absorbing semantics. Generation happens exactly once, here,
//! synchronously with creation; there is no hidden trigger.
//!
//! Re-submitting a window that overlaps earlier submissions is safe and not
//! an error: candidates whose (owner, day, start, end) key already exists
//! are skipped at insert time, and the response simply reports fewer (or
//! zero) slots created.

use axum::{extract::State, Json};
use std::sync::Arc;
use slotbook_core::{
    errors::BookingError,
    models::availability::{CreateAvailabilityRequest, CreateAvailabilityResponse},
    slots::{effective_slot_minutes, generate_slots},
};

use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<ApiState>>,
    caller: Caller,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<Json<CreateAvailabilityResponse>, AppError> {
    // Only calendar owners may publish windows.
    if !caller.can_publish_availability() {
        return Err(AppError(BookingError::Authorization(
            "Only faculty or admins may publish availability".to_string(),
        )));
    }

    // Reject malformed windows before any slot generation is attempted.
    if payload.window_start >= payload.window_end {
        return Err(AppError(BookingError::Validation(
            "Window start must be before window end".to_string(),
        )));
    }

    let slot_minutes = effective_slot_minutes(payload.slot_minutes);

    // Create the availability record in the database
    let db_availability = slotbook_db::repositories::availability::create_availability(
        &state.db_pool,
        caller.id,
        payload.day,
        payload.window_start,
        payload.window_end,
        slot_minutes,
    )
    .await
    .map_err(BookingError::Database)?;

    // Expand the window into candidate slots and persist them, skipping
    // any interval that already exists for this owner.
    let intervals = generate_slots(
        payload.day,
        payload.window_start,
        payload.window_end,
        slot_minutes,
    );

    let slots_created = slotbook_db::repositories::slot::insert_candidate_slots(
        &state.db_pool,
        caller.id,
        db_availability.id,
        payload.day,
        &intervals,
    )
    .await
    .map_err(BookingError::Database)?;

    let response = CreateAvailabilityResponse {
        id: db_availability.id,
        owner_id: db_availability.owner_id,
        day: db_availability.day,
        window_start: db_availability.window_start,
        window_end: db_availability.window_end,
        slot_minutes: db_availability.slot_minutes,
        slots_created,
        created_at: db_availability.created_at,
    };

    Ok(Json(response))
}
