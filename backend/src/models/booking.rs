//! Booking records linking students to lesson slots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::slot::{SlotId, StudentId};
use super::time::SlotTime;

crate::define_id_type!(i64, BookingId);

/// Lifecycle state of a booking. Cancellation flips the status; the record
/// itself is retained for history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Booked)
    }
}

/// A student's claim on a seat in a lesson slot.
///
/// Date, time and duration are denormalized from the slot at booking time so
/// the record stays meaningful if the slot is later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Storage-assigned identifier.
    pub id: BookingId,
    /// Slot the seat belongs to.
    pub slot_id: SlotId,
    /// Student holding the seat.
    pub student: StudentId,
    /// Lesson date, copied from the slot.
    pub date: NaiveDate,
    /// Lesson start time, copied from the slot.
    pub time: SlotTime,
    /// Lesson length in minutes, copied from the slot.
    pub duration_minutes: u32,
    /// Current lifecycle state.
    pub status: BookingStatus,
}

/// Booking data before the repository assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub slot_id: SlotId,
    pub student: StudentId,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub duration_minutes: u32,
}

impl NewBooking {
    /// Snapshot the lesson details of `slot` for `student`.
    pub fn for_slot(slot: &super::slot::LessonSlot, student: StudentId) -> Self {
        Self {
            slot_id: slot.id,
            student,
            date: slot.date,
            time: slot.time,
            duration_minutes: slot.duration_minutes,
        }
    }

    /// Promote to a stored booking under the id the repository assigned.
    /// New bookings always start out active.
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            slot_id: self.slot_id,
            student: self.student,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
            status: BookingStatus::Booked,
        }
    }
}
