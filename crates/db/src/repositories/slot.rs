use crate::models::DbSlot;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use slotbook_core::{models::slot::SlotStatus, slots::SlotInterval};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Persists generated candidate slots for one availability window.
///
/// Each insert is keyed on (owner_id, day, start_time, end_time) with
/// `ON CONFLICT DO NOTHING`: a candidate whose interval already exists is
/// silently skipped, leaving the existing slot and its status untouched.
/// Returns the number of slots actually created.
pub async fn insert_candidate_slots(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    availability_id: Uuid,
    day: NaiveDate,
    intervals: &[SlotInterval],
) -> Result<u64> {
    let now = Utc::now();
    let mut created = 0;

    for interval in intervals {
        let result = sqlx::query(
            r#"
            INSERT INTO slots (id, owner_id, availability_id, day, start_time, end_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (owner_id, day, start_time, end_time) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(availability_id)
        .bind(day)
        .bind(interval.start)
        .bind(interval.end)
        .bind(SlotStatus::Available.as_str())
        .bind(now)
        .execute(pool)
        .await?;

        created += result.rows_affected();
    }

    tracing::debug!(
        "Inserted {} of {} candidate slots for availability {}",
        created,
        intervals.len(),
        availability_id
    );

    Ok(created)
}

/// Lists bookable slots, earliest first.
///
/// Only slots with status `available` and day >= `from_day` are returned,
/// ordered by day then start time ascending. The booking UI depends on
/// this ordering.
pub async fn list_available_slots(
    pool: &Pool<Postgres>,
    owner_id: Option<Uuid>,
    from_day: NaiveDate,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, availability_id, day, start_time, end_time, status, created_at
        FROM slots
        WHERE status = $1
          AND day >= $2
          AND ($3::uuid IS NULL OR owner_id = $3)
        ORDER BY day ASC, start_time ASC
        "#,
    )
    .bind(SlotStatus::Available.as_str())
    .bind(from_day)
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, owner_id, availability_id, day, start_time, end_time, status, created_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}
