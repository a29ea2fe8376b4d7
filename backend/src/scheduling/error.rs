//! Error vocabulary of the scheduling engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{SlotId, SlotTime, StudentId};

pub type SchedulingResult<T> = Result<T, SchedulingError>;

/// Errors surfaced by rule validation, recurrence expansion and seat booking.
///
/// Expansion is all-or-nothing: the first error aborts the whole batch and no
/// slots are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// The input failed structural validation.
    #[error("Invalid recurrence rule: {0}")]
    Validation(String),

    /// A one-off rule points at a date outside its own weekday set.
    #[error("Date {date} does not fall on a selected weekday")]
    WeekdayMismatch { date: NaiveDate },

    /// A recurring rule produced no occurrences in its date range.
    #[error("No dates in the range match the selected weekdays")]
    NoMatchingDates,

    /// An occurrence collides with an existing or staged slot.
    #[error("Slot on {date} at {time} overlaps an existing slot")]
    Overlap { date: NaiveDate, time: SlotTime },

    /// The slot has no free seats left.
    #[error("Slot {slot_id} is full ({max_students} students)")]
    CapacityExceeded { slot_id: SlotId, max_students: u32 },

    /// The student already holds a seat in the slot.
    #[error("Student {student} already booked slot {slot_id}")]
    AlreadyBooked { slot_id: SlotId, student: StudentId },
}
