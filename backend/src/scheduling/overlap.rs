//! Overlap detection between lesson slots.
//!
//! The platform treats two slots as colliding when they share the exact
//! calendar date and start time, mirroring the storage uniqueness key on
//! `(owner, date, time)`. The stricter interval policy additionally catches
//! partially overlapping time windows on the same date.

use chrono::NaiveDate;

use crate::models::{LessonSlot, SlotTime};

/// How strictly two slots are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Collide only on identical `(date, time)`.
    #[default]
    ExactStart,
    /// Collide when the time windows intersect on the same date.
    Interval,
}

/// True when a slot starting at `(date, time)` collides with any slot in
/// `existing` under the exact-start policy.
pub fn has_overlap(date: NaiveDate, time: SlotTime, existing: &[LessonSlot]) -> bool {
    existing
        .iter()
        .any(|slot| slot.date == date && slot.time == time)
}

/// First slot in `existing` that conflicts with an occurrence starting at
/// `(date, time)` and lasting `duration_minutes`.
///
/// # Returns
/// The `(date, time)` key of the conflicting stored slot, so callers can name
/// what was hit.
pub fn find_conflict(
    date: NaiveDate,
    time: SlotTime,
    duration_minutes: u32,
    existing: &[LessonSlot],
    policy: OverlapPolicy,
) -> Option<(NaiveDate, SlotTime)> {
    existing.iter().find_map(|slot| {
        let hit = match policy {
            OverlapPolicy::ExactStart => slot.date == date && slot.time == time,
            OverlapPolicy::Interval => {
                slot.date == date
                    && windows_intersect(time, duration_minutes, slot.time, slot.duration_minutes)
            }
        };
        hit.then_some((slot.date, slot.time))
    })
}

/// Conflict check between two not-yet-persisted occurrences. Used by the
/// expander to validate a staged batch against itself.
pub(crate) fn starts_conflict(
    a: (NaiveDate, SlotTime, u32),
    b: (NaiveDate, SlotTime, u32),
    policy: OverlapPolicy,
) -> bool {
    let (a_date, a_time, a_duration) = a;
    let (b_date, b_time, b_duration) = b;
    if a_date != b_date {
        return false;
    }
    match policy {
        OverlapPolicy::ExactStart => a_time == b_time,
        OverlapPolicy::Interval => windows_intersect(a_time, a_duration, b_time, b_duration),
    }
}

/// Half-open interval intersection in minutes from midnight. Back-to-back
/// lessons do not intersect.
fn windows_intersect(
    a_start: SlotTime,
    a_duration: u32,
    b_start: SlotTime,
    b_duration: u32,
) -> bool {
    let a_from = a_start.minutes_from_midnight();
    let a_to = a_from + a_duration;
    let b_from = b_start.minutes_from_midnight();
    let b_to = b_from + b_duration;
    a_from < b_to && b_from < a_to
}
