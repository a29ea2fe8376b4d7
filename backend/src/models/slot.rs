//! Lesson slot model: the unit of bookable teacher availability.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rule::RecurrenceRule;
use super::time::SlotTime;
use crate::scheduling::error::SchedulingError;

crate::define_id_type!(i64, SlotId);

crate::define_actor_id!(TeacherId);
crate::define_actor_id!(StudentId);

/// A published lesson slot owned by one teacher.
///
/// Equality of the `(owner, date, time)` triple identifies a slot for overlap
/// purposes; `id` is the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSlot {
    /// Storage-assigned identifier.
    pub id: SlotId,
    /// Teacher the slot belongs to.
    pub owner: TeacherId,
    /// Calendar date of the lesson.
    pub date: NaiveDate,
    /// Wall-clock start time.
    pub time: SlotTime,
    /// Lesson length in minutes.
    pub duration_minutes: u32,
    /// Seat capacity.
    pub max_students: u32,
    /// Students holding a seat, kept sorted for stable serialization.
    #[serde(default)]
    pub booked_students: BTreeSet<StudentId>,
}

impl LessonSlot {
    pub fn is_full(&self) -> bool {
        self.booked_students.len() as u32 >= self.max_students
    }

    pub fn has_student(&self, student: &StudentId) -> bool {
        self.booked_students.contains(student)
    }

    pub fn seats_left(&self) -> u32 {
        self.max_students
            .saturating_sub(self.booked_students.len() as u32)
    }

    /// Adds `student` to the slot.
    ///
    /// A repeat booking by the same student is reported before capacity, so a
    /// student sitting in a full slot sees `AlreadyBooked` rather than
    /// `CapacityExceeded`.
    pub fn book(&mut self, student: StudentId) -> Result<(), SchedulingError> {
        if self.has_student(&student) {
            return Err(SchedulingError::AlreadyBooked {
                slot_id: self.id,
                student,
            });
        }
        if self.is_full() {
            return Err(SchedulingError::CapacityExceeded {
                slot_id: self.id,
                max_students: self.max_students,
            });
        }
        self.booked_students.insert(student);
        Ok(())
    }

    /// Frees the seat held by `student`. Returns `false` if they held none.
    pub fn release(&mut self, student: &StudentId) -> bool {
        self.booked_students.remove(student)
    }
}

/// A slot produced by the recurrence expander, not yet persisted.
///
/// Carries everything but the storage-assigned id; the repository turns it
/// into a [`LessonSlot`] on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLessonSlot {
    pub owner: TeacherId,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub duration_minutes: u32,
    pub max_students: u32,
}

impl NewLessonSlot {
    /// One occurrence of `rule` on `date` for `owner`.
    pub fn from_rule(owner: &TeacherId, rule: &RecurrenceRule, date: NaiveDate) -> Self {
        Self {
            owner: owner.clone(),
            date,
            time: rule.time,
            duration_minutes: rule.duration_minutes,
            max_students: rule.max_students,
        }
    }

    /// Promote to a stored slot under the id the repository assigned.
    pub fn into_slot(self, id: SlotId) -> LessonSlot {
        LessonSlot {
            id,
            owner: self.owner,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
            max_students: self.max_students,
            booked_students: BTreeSet::new(),
        }
    }
}
