use chrono::Utc;
use pretty_assertions::assert_eq;
use slotbook_core::{
    errors::BookingError,
    models::availability::{CreateAvailabilityRequest, CreateAvailabilityResponse},
    slots::{effective_slot_minutes, generate_slots},
};
use slotbook_db::models::DbAvailability;
use uuid::Uuid;

use crate::test_utils::{day, t, TestContext};
use slotbook_api::middleware::{
    auth::{Caller, Role},
    error_handling::AppError,
};

// Wrapper mirroring the create-availability flow against mock
// repositories: role gate, window validation, generation, idempotent
// persistence.
async fn create_availability_wrapper(
    ctx: &mut TestContext,
    caller: Caller,
    request: CreateAvailabilityRequest,
) -> Result<CreateAvailabilityResponse, AppError> {
    if !caller.can_publish_availability() {
        return Err(AppError(BookingError::Authorization(
            "Only faculty or admins may publish availability".to_string(),
        )));
    }

    if request.window_start >= request.window_end {
        return Err(AppError(BookingError::Validation(
            "Window start must be before window end".to_string(),
        )));
    }

    let slot_minutes = effective_slot_minutes(request.slot_minutes);

    let availability = ctx
        .availability_repo
        .create_availability(
            caller.id,
            request.day,
            request.window_start,
            request.window_end,
            slot_minutes,
        )
        .await
        .map_err(BookingError::Database)?;

    let intervals = generate_slots(
        request.day,
        request.window_start,
        request.window_end,
        slot_minutes,
    );

    let slots_created = ctx
        .slot_repo
        .insert_candidate_slots(caller.id, availability.id, request.day, intervals)
        .await
        .map_err(BookingError::Database)?;

    Ok(CreateAvailabilityResponse {
        id: availability.id,
        owner_id: availability.owner_id,
        day: availability.day,
        window_start: availability.window_start,
        window_end: availability.window_end,
        slot_minutes: availability.slot_minutes,
        slots_created,
        created_at: availability.created_at,
    })
}

fn faculty() -> Caller {
    Caller {
        id: Uuid::new_v4(),
        role: Role::Faculty,
    }
}

fn sample_request() -> CreateAvailabilityRequest {
    CreateAvailabilityRequest {
        day: day(),
        window_start: t(9, 0),
        window_end: t(11, 0),
        slot_minutes: Some(30),
    }
}

#[tokio::test]
async fn test_create_availability_scholar_forbidden() {
    let mut ctx = TestContext::new();
    let scholar = Caller {
        id: Uuid::new_v4(),
        role: Role::Scholar,
    };

    let result = create_availability_wrapper(&mut ctx, scholar, sample_request()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Authorization(_) => {} // Expected
        e => panic!("Expected Authorization error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_availability_inverted_window_rejected() {
    let mut ctx = TestContext::new();
    let request = CreateAvailabilityRequest {
        day: day(),
        window_start: t(11, 0),
        window_end: t(9, 0),
        slot_minutes: Some(30),
    };

    // No repository expectations: validation must fail before any
    // persistence is attempted.
    let result = create_availability_wrapper(&mut ctx, faculty(), request).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Validation(_) => {} // Expected
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_create_availability_generates_slots() {
    let mut ctx = TestContext::new();
    let caller = faculty();
    let owner_id = caller.id;
    let availability_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.availability_repo
        .expect_create_availability()
        .times(1)
        .returning(move |owner_id, day, window_start, window_end, slot_minutes| {
            Ok(DbAvailability {
                id: availability_id,
                owner_id,
                day,
                window_start,
                window_end,
                slot_minutes,
                created_at: now,
            })
        });

    // Report every candidate as newly inserted.
    ctx.slot_repo
        .expect_insert_candidate_slots()
        .times(1)
        .returning(|_, _, _, intervals| Ok(intervals.len() as u64));

    let response = create_availability_wrapper(&mut ctx, caller, sample_request())
        .await
        .expect("create availability should succeed");

    // A two-hour window at 30 minutes yields exactly four slots.
    assert_eq!(response.slots_created, 4);
    assert_eq!(response.owner_id, owner_id);
    assert_eq!(response.slot_minutes, 30);
}

#[tokio::test]
async fn test_create_availability_resubmission_is_idempotent() {
    let mut ctx = TestContext::new();
    let caller = faculty();
    let now = Utc::now();

    ctx.availability_repo
        .expect_create_availability()
        .times(2)
        .returning(move |owner_id, day, window_start, window_end, slot_minutes| {
            Ok(DbAvailability {
                id: Uuid::new_v4(),
                owner_id,
                day,
                window_start,
                window_end,
                slot_minutes,
                created_at: now,
            })
        });

    // First submission creates all candidates; the second finds every
    // interval already present and creates none.
    let mut first_call = true;
    ctx.slot_repo
        .expect_insert_candidate_slots()
        .times(2)
        .returning(move |_, _, _, intervals| {
            if first_call {
                first_call = false;
                Ok(intervals.len() as u64)
            } else {
                Ok(0)
            }
        });

    let first = create_availability_wrapper(&mut ctx, caller, sample_request())
        .await
        .unwrap();
    let second = create_availability_wrapper(&mut ctx, caller, sample_request())
        .await
        .unwrap();

    assert_eq!(first.slots_created, 4);
    // Duplicate submission is not an error; it just creates nothing new.
    assert_eq!(second.slots_created, 0);
}

#[tokio::test]
async fn test_create_availability_default_slot_minutes() {
    let mut ctx = TestContext::new();
    let caller = faculty();
    let now = Utc::now();

    ctx.availability_repo
        .expect_create_availability()
        .times(1)
        .returning(move |owner_id, day, window_start, window_end, slot_minutes| {
            // Omitted duration must have been resolved to the default
            // before reaching persistence.
            assert_eq!(slot_minutes, 30);
            Ok(DbAvailability {
                id: Uuid::new_v4(),
                owner_id,
                day,
                window_start,
                window_end,
                slot_minutes,
                created_at: now,
            })
        });

    ctx.slot_repo
        .expect_insert_candidate_slots()
        .times(1)
        .returning(|_, _, _, intervals| Ok(intervals.len() as u64));

    let request = CreateAvailabilityRequest {
        day: day(),
        window_start: t(9, 0),
        window_end: t(10, 0),
        slot_minutes: None,
    };

    let response = create_availability_wrapper(&mut ctx, caller, request)
        .await
        .unwrap();

    assert_eq!(response.slots_created, 2);
}
