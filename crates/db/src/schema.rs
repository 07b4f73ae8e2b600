use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create availabilities table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availabilities (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            day DATE NOT NULL,
            window_start TIME NOT NULL,
            window_end TIME NOT NULL,
            slot_minutes INTEGER NOT NULL DEFAULT 30,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_window CHECK (window_end > window_start),
            CONSTRAINT positive_slot_minutes CHECK (slot_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table. The unique constraint on the interval key is
    // what makes re-submitting overlapping availability windows an
    // idempotent no-op rather than a source of duplicates.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            availability_id UUID REFERENCES availabilities(id) ON DELETE SET NULL,
            day DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'available',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_slot_range CHECK (end_time > start_time),
            CONSTRAINT unique_slot_interval UNIQUE (owner_id, day, start_time, end_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. UNIQUE (slot_id) ignores NULLs in
    // Postgres, so it enforces at most one appointment per claimed slot
    // while allowing any number of appointments whose slot was deleted.
    // This constraint, not application logic, is the last line of defense
    // against concurrent double booking.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            requester_id UUID NOT NULL,
            requester_name VARCHAR(255) NOT NULL,
            requester_contact VARCHAR(255) NULL,
            purpose TEXT NOT NULL,
            slot_id UUID REFERENCES slots(id) ON DELETE SET NULL,
            starts_at TIMESTAMP WITH TIME ZONE NOT NULL,
            ends_at TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            booked_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_meeting_range CHECK (ends_at > starts_at),
            CONSTRAINT one_booking_per_slot UNIQUE (slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_availabilities_owner_id ON availabilities(owner_id);
        CREATE INDEX IF NOT EXISTS idx_slots_owner_id ON slots(owner_id);
        CREATE INDEX IF NOT EXISTS idx_slots_status_day ON slots(status, day);
        CREATE INDEX IF NOT EXISTS idx_slots_availability_id ON slots(availability_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_owner_id ON appointments(owner_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_requester_id ON appointments(requester_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
