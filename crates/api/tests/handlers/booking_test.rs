use axum::response::IntoResponse;
use pretty_assertions::assert_eq;
use slotbook_core::{
    errors::BookingError,
    models::appointment::{
        AppointmentResponse, AppointmentStatus, BookSlotRequest, ListAppointmentsResponse,
    },
};
use slotbook_db::models::DbAppointment;
use uuid::Uuid;

use crate::test_utils::{sample_appointment, sample_slot, TestContext};
use slotbook_api::middleware::{
    auth::{Caller, Role},
    error_handling::AppError,
};

fn to_response(appointment: DbAppointment) -> Result<AppointmentResponse, AppError> {
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

// Wrapper mirroring the booking flow against the mock repository: name
// validation, then the atomic claim.
async fn book_slot_wrapper(
    ctx: &mut TestContext,
    caller: Caller,
    slot_id: Uuid,
    request: BookSlotRequest,
) -> Result<AppointmentResponse, AppError> {
    if request.requester_name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Requester name must not be empty".to_string(),
        )));
    }

    // The mock signatures take 'static strs
    let requester_name: &'static str = Box::leak(request.requester_name.clone().into_boxed_str());
    let requester_contact: Option<&'static str> = request
        .requester_contact
        .clone()
        .map(|c| &*Box::leak(c.into_boxed_str()));
    let purpose: &'static str = Box::leak(request.purpose.clone().into_boxed_str());

    let appointment = ctx
        .appointment_repo
        .book_slot(slot_id, caller.id, requester_name, requester_contact, purpose)
        .await?;

    to_response(appointment)
}

fn scholar() -> Caller {
    Caller {
        id: Uuid::new_v4(),
        role: Role::Scholar,
    }
}

fn booking_request() -> BookSlotRequest {
    BookSlotRequest {
        requester_name: "Grace Hopper".to_string(),
        requester_contact: None,
        purpose: "Office hours".to_string(),
    }
}

#[tokio::test]
async fn test_book_slot_empty_name_rejected() {
    let mut ctx = TestContext::new();
    let request = BookSlotRequest {
        requester_name: "   ".to_string(),
        requester_contact: None,
        purpose: "Office hours".to_string(),
    };

    // No repository expectations: validation fails before any claim.
    let result = book_slot_wrapper(&mut ctx, scholar(), Uuid::new_v4(), request).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Validation(_) => {} // Expected
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_book_slot_success() {
    let mut ctx = TestContext::new();
    let caller = scholar();
    let requester_id = caller.id;
    let owner_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    let slot = sample_slot(slot_id, owner_id, "available");
    let appointment = sample_appointment(&slot, requester_id, "Grace Hopper");
    let expected_starts_at = appointment.starts_at;

    ctx.appointment_repo
        .expect_book_slot()
        .times(1)
        .returning(move |_, _, _, _, _| Ok(appointment.clone()));

    let response = book_slot_wrapper(&mut ctx, caller, slot_id, booking_request())
        .await
        .expect("booking should succeed");

    // The appointment references the claimed slot and carries meeting
    // times derived from the slot's day and interval.
    assert_eq!(response.slot_id, Some(slot_id));
    assert_eq!(response.owner_id, owner_id);
    assert_eq!(response.requester_id, requester_id);
    assert_eq!(response.status, AppointmentStatus::Confirmed);
    assert_eq!(response.starts_at, expected_starts_at);
}

#[tokio::test]
async fn test_book_slot_conflict_surfaces_as_slot_unavailable() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    // Another transaction committed its appointment first; the losing
    // claim gets the conflict and must pick a different slot.
    ctx.appointment_repo
        .expect_book_slot()
        .times(1)
        .returning(|_, _, _, _, _| {
            Err(BookingError::SlotUnavailable(
                "This slot was just booked - choose another".to_string(),
            ))
        });

    let result = book_slot_wrapper(&mut ctx, scholar(), slot_id, booking_request()).await;

    assert!(result.is_err());
    let err = result.unwrap_err();
    match &err.0 {
        BookingError::SlotUnavailable(_) => {} // Expected
        e => panic!("Expected SlotUnavailable error, got: {:?}", e),
    }

    // The conflict maps to HTTP 409 so clients can distinguish it from
    // validation failures.
    let response = err.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_slot_not_found() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();

    ctx.appointment_repo
        .expect_book_slot()
        .times(1)
        .returning(move |id, _, _, _, _| {
            Err(BookingError::NotFound(format!("Slot with ID {id} not found")))
        });

    let result = book_slot_wrapper(&mut ctx, scholar(), slot_id, booking_request()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {} // Expected
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

// Wrapper mirroring the appointment-listing flow: view selection then the
// matching repository query.
async fn list_appointments_wrapper(
    ctx: &mut TestContext,
    caller: Caller,
    view: Option<&str>,
) -> Result<ListAppointmentsResponse, AppError> {
    let appointments = match view {
        Some("owner") => ctx
            .appointment_repo
            .list_appointments_for_owner(caller.id)
            .await
            .map_err(BookingError::Database)?,
        Some("requester") | None => ctx
            .appointment_repo
            .list_appointments_for_requester(caller.id)
            .await
            .map_err(BookingError::Database)?,
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

    Ok(ListAppointmentsResponse { appointments })
}

#[tokio::test]
async fn test_list_appointments_defaults_to_requester_view() {
    let mut ctx = TestContext::new();
    let caller = scholar();
    let slot = sample_slot(Uuid::new_v4(), Uuid::new_v4(), "booked");
    let appointment = sample_appointment(&slot, caller.id, "Grace Hopper");

    ctx.appointment_repo
        .expect_list_appointments_for_requester()
        .times(1)
        .returning(move |_| Ok(vec![appointment.clone()]));

    let response = list_appointments_wrapper(&mut ctx, caller, None)
        .await
        .unwrap();

    assert_eq!(response.appointments.len(), 1);
    assert_eq!(response.appointments[0].requester_id, caller.id);
}

#[tokio::test]
async fn test_list_appointments_owner_view() {
    let mut ctx = TestContext::new();
    let caller = Caller {
        id: Uuid::new_v4(),
        role: Role::Faculty,
    };
    let slot = sample_slot(Uuid::new_v4(), caller.id, "booked");
    let appointment = sample_appointment(&slot, Uuid::new_v4(), "Grace Hopper");

    ctx.appointment_repo
        .expect_list_appointments_for_owner()
        .times(1)
        .returning(move |_| Ok(vec![appointment.clone()]));

    let response = list_appointments_wrapper(&mut ctx, caller, Some("owner"))
        .await
        .unwrap();

    assert_eq!(response.appointments.len(), 1);
    assert_eq!(response.appointments[0].owner_id, caller.id);
}

#[tokio::test]
async fn test_list_appointments_unknown_view_rejected() {
    let mut ctx = TestContext::new();

    let result = list_appointments_wrapper(&mut ctx, scholar(), Some("everyone")).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Validation(_) => {} // Expected
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}
