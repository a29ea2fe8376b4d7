//! Recurrence rules for bulk lesson-slot publishing.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::time::{weekday_index, SlotTime};
use crate::scheduling::error::SchedulingError;

/// Set of weekdays a recurrence rule fires on, Sunday = 0 through Saturday = 6.
///
/// Stored as a 7-bit mask; serialized as a sorted array of weekday indices to
/// match the document shape the platform stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Every day of the week.
    pub const ALL: WeekdaySet = WeekdaySet(0b0111_1111);

    /// Build a set from weekday indices. Indices above 6 are rejected.
    pub fn from_indices(indices: &[u8]) -> Result<Self, SchedulingError> {
        let mut mask = 0u8;
        for &index in indices {
            if index > 6 {
                return Err(SchedulingError::Validation(format!(
                    "weekday index {} out of range 0-6",
                    index
                )));
            }
            mask |= 1 << index;
        }
        Ok(WeekdaySet(mask))
    }

    /// Set containing exactly one weekday. Indices above 6 yield the empty set.
    pub fn single(index: u8) -> Self {
        if index > 6 {
            return WeekdaySet::default();
        }
        WeekdaySet(1 << index)
    }

    pub fn contains(&self, index: u8) -> bool {
        index <= 6 && self.0 & (1 << index) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Selected indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0u8..7).filter(move |index| self.0 & (1 << index) != 0)
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.indices())
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        WeekdaySet::from_indices(&raw).map_err(serde::de::Error::custom)
    }
}

/// Recurrence rule describing a batch of lesson slots to publish.
///
/// A rule is transient input to the expander and is never persisted; only the
/// slots it generates are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// First calendar date considered for expansion.
    pub start_date: NaiveDate,
    /// Last date considered, inclusive. Absent for a single occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Wall-clock start time shared by every generated slot.
    pub time: SlotTime,
    /// Lesson length in minutes.
    pub duration_minutes: u32,
    /// Weekdays the rule fires on.
    pub weekdays: WeekdaySet,
    /// Seat capacity of each generated slot.
    pub max_students: u32,
}

impl RecurrenceRule {
    /// Rule for a one-off lesson on `start_date`.
    pub fn single(
        start_date: NaiveDate,
        time: SlotTime,
        duration_minutes: u32,
        max_students: u32,
    ) -> Self {
        Self {
            start_date,
            end_date: None,
            time,
            duration_minutes,
            weekdays: WeekdaySet::single(weekday_index(start_date)),
            max_students,
        }
    }

    /// Rule repeating on `weekdays` across `start_date..=end_date`.
    pub fn weekly(
        start_date: NaiveDate,
        end_date: NaiveDate,
        time: SlotTime,
        duration_minutes: u32,
        weekdays: WeekdaySet,
        max_students: u32,
    ) -> Self {
        Self {
            start_date,
            end_date: Some(end_date),
            time,
            duration_minutes,
            weekdays,
            max_students,
        }
    }

    /// Check the structural invariants shared by one-off and recurring rules.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        if self.weekdays.is_empty() {
            return Err(SchedulingError::Validation(
                "at least one weekday must be selected".to_string(),
            ));
        }
        if self.duration_minutes == 0 {
            return Err(SchedulingError::Validation(
                "lesson duration must be positive".to_string(),
            ));
        }
        if self.max_students == 0 {
            return Err(SchedulingError::Validation(
                "slot capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_recurring(&self) -> bool {
        self.end_date.is_some()
    }
}
