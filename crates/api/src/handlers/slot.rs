use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use slotbook_core::{
    errors::BookingError,
    models::slot::{ListSlotsResponse, SlotResponse},
};
use uuid::Uuid;

use crate::{
    middleware::{auth::Caller, error_handling::AppError},
    ApiState,
};

/// Query parameters for listing bookable slots
#[derive(Debug, Deserialize)]
pub struct ListSlotsQuery {
    /// Restrict to one owner's calendar (optional)
    pub owner_id: Option<Uuid>,

    /// Earliest day to include; defaults to today (UTC)
    pub from: Option<NaiveDate>,
}

/// Lists available slots, earliest first
///
/// Only slots whose status is `available` and whose day is not in the past
/// appear, ordered by day then start time ascending.
#[axum::debug_handler]
pub async fn list_available_slots(
    State(state): State<Arc<ApiState>>,
    _caller: Caller,
    Query(query): Query<ListSlotsQuery>,
) -> Result<Json<ListSlotsResponse>, AppError> {
    let from_day = query.from.unwrap_or_else(|| Utc::now().date_naive());

    let slots = slotbook_db::repositories::slot::list_available_slots(
        &state.db_pool,
        query.owner_id,
        from_day,
    )
    .await
    .map_err(BookingError::Database)?;

    let response = ListSlotsResponse {
        slots: slots
            .into_iter()
            .map(|slot| SlotResponse {
                id: slot.id,
                owner_id: slot.owner_id,
                day: slot.day,
                start: slot.start_time,
                end: slot.end_time,
            })
            .collect(),
    };

    Ok(Json(response))
}
