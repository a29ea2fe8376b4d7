//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Domain types that already derive Serialize (slots, bookings, receipts) are
//! returned directly; this module adds the request shapes and the envelope
//! types the endpoints wrap them in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{weekday_index, LessonSlot, RecurrenceRule, SlotTime, WeekdaySet};
use crate::scheduling::SchedulingError;

/// Request body for publishing availability.
///
/// Every field a rule needs is optional at the wire level so that a missing
/// field surfaces as a named validation error instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PublishSlotsRequest {
    /// First date considered for expansion (YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last date considered, inclusive; omit for a one-off lesson
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Wall-clock lesson start (HH:MM)
    #[serde(default)]
    pub time: Option<SlotTime>,
    /// Lesson length in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Weekday indices, Sunday = 0; required for recurring rules
    #[serde(default)]
    pub weekdays: Option<Vec<u8>>,
    /// Seat capacity of each generated slot
    #[serde(default)]
    pub max_students: Option<u32>,
}

fn missing(field: &str) -> SchedulingError {
    SchedulingError::Validation(format!("missing field '{}'", field))
}

impl PublishSlotsRequest {
    /// Assemble the recurrence rule, reporting the first missing field.
    ///
    /// A one-off request without explicit weekdays takes the weekday of its
    /// start date; a recurring request must name its weekdays.
    pub fn into_rule(self) -> Result<RecurrenceRule, SchedulingError> {
        let start_date = self.start_date.ok_or_else(|| missing("start_date"))?;
        let time = self.time.ok_or_else(|| missing("time"))?;
        let duration_minutes = self
            .duration_minutes
            .ok_or_else(|| missing("duration_minutes"))?;
        let max_students = self.max_students.ok_or_else(|| missing("max_students"))?;

        let weekdays = match (&self.weekdays, self.end_date) {
            (Some(indices), _) => WeekdaySet::from_indices(indices)?,
            (None, None) => WeekdaySet::single(weekday_index(start_date)),
            (None, Some(_)) => return Err(missing("weekdays")),
        };

        Ok(RecurrenceRule {
            start_date,
            end_date: self.end_date,
            time,
            duration_minutes,
            weekdays,
            max_students,
        })
    }
}

/// One slot of a publish request that the storage layer refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishFailureDto {
    /// Date of the refused slot
    pub date: NaiveDate,
    /// Start time of the refused slot
    pub time: SlotTime,
    /// Why storage refused it
    pub error: String,
}

/// Response for a publish request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSlotsResponse {
    /// Slots persisted, in ascending date order
    pub created: Vec<LessonSlot>,
    /// Slots refused by storage
    pub failed: Vec<PublishFailureDto>,
    /// Convenience count of `created`
    pub total_created: usize,
}

/// Calendar response shared by the owner schedule and the student view.
///
/// Keys serialize as `YYYY-MM-DD` and iterate in ascending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// Slots bucketed by date, each bucket ordered by start time
    pub days: BTreeMap<NaiveDate, Vec<LessonSlot>>,
    /// Total number of slots across all days
    pub total_slots: usize,
}

impl CalendarResponse {
    pub fn from_days(days: BTreeMap<NaiveDate, Vec<LessonSlot>>) -> Self {
        let total_slots = days.values().map(Vec::len).sum();
        Self { days, total_slots }
    }
}

/// Request body for claiming a seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    /// Slot to book
    pub slot_id: i64,
}

/// Booking history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    /// Bookings newest first, cancelled records included
    pub bookings: Vec<crate::models::Booking>,
    /// Total count
    pub total: usize,
}

/// Request body for cancelling a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// Student who owns the booking
    pub student_id: String,
}

/// Request body for checking out a cart of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Slots in the cart; repeated ids collapse into one line
    pub slot_ids: Vec<i64>,
}

/// Request body for bulk slot deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotsRequest {
    /// Slots to delete; foreign or unknown ids are skipped
    pub slot_ids: Vec<i64>,
}

/// Response for slot deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Number of slots actually deleted
    pub deleted: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}
