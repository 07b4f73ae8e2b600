//! # Slot Generation
//!
//! Pure expansion of an availability window into discrete bookable
//! intervals. Given a window `[start, end)` on a given day and a slot
//! length in minutes, the generator emits the maximal run of contiguous,
//! non-overlapping intervals of exactly that length, starting at the
//! window start. A trailing remainder shorter than one slot is discarded,
//! never truncated or padded.
//!
//! This module performs no I/O and never fails: a window too small to fit
//! a single slot simply yields an empty sequence. All persistence and
//! conflict handling happens in the repository layer.

use chrono::{Duration, NaiveDate, NaiveTime};

/// Slot length used when the caller omits one or supplies a
/// non-positive value.
pub const DEFAULT_SLOT_MINUTES: i32 = 30;

/// A single candidate interval within one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Resolves the slot length to use for generation.
///
/// `None` and values ≤ 0 both fall back to [`DEFAULT_SLOT_MINUTES`].
pub fn effective_slot_minutes(requested: Option<i32>) -> i32 {
    match requested {
        Some(minutes) if minutes > 0 => minutes,
        _ => DEFAULT_SLOT_MINUTES,
    }
}

/// Expands one availability window into candidate slots.
///
/// For a window of length `W` minutes and slot length `D`, the result
/// contains exactly `floor(W / D)` intervals: the first starts at
/// `window_start`, each subsequent one starts where the previous ended,
/// and generation stops as soon as the next interval would run past
/// `window_end`.
///
/// Same inputs always produce the same sequence. An inverted or empty
/// window yields an empty sequence rather than an error; the caller is
/// expected to have validated the window before persisting anything.
pub fn generate_slots(
    day: NaiveDate,
    window_start: NaiveTime,
    window_end: NaiveTime,
    slot_minutes: i32,
) -> Vec<SlotInterval> {
    let step = Duration::minutes(effective_slot_minutes(Some(slot_minutes)) as i64);

    // Anchor on the day so arithmetic cannot wrap around midnight the way
    // raw NaiveTime addition does.
    let window_end = day.and_time(window_end);
    let mut cursor = day.and_time(window_start);

    let mut slots = Vec::new();
    while cursor + step <= window_end {
        let next = cursor + step;
        slots.push(SlotInterval {
            start: cursor.time(),
            end: next.time(),
        });
        cursor = next;
    }

    slots
}
