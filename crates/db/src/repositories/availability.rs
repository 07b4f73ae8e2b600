use crate::models::DbAvailability;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_availability(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    day: NaiveDate,
    window_start: NaiveTime,
    window_end: NaiveTime,
    slot_minutes: i32,
) -> Result<DbAvailability> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating availability: id={}, owner_id={}, day={}, window={}..{}, slot_minutes={}",
        id,
        owner_id,
        day,
        window_start,
        window_end,
        slot_minutes
    );

    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        INSERT INTO availabilities (id, owner_id, day, window_start, window_end, slot_minutes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, owner_id, day, window_start, window_end, slot_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(day)
    .bind(window_start)
    .bind(window_end)
    .bind(slot_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(availability)
}

pub async fn get_availability_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAvailability>> {
    let availability = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, owner_id, day, window_start, window_end, slot_minutes, created_at
        FROM availabilities
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}
