//! Calendar views over published lesson slots.
//!
//! Pure grouping and filtering helpers. Slots arrive in storage order and
//! come out bucketed by date or by week, each bucket sorted by start time.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{start_of_week, LessonSlot};

/// Buckets `slots` by calendar date, each bucket sorted by start time.
pub fn group_by_date(slots: &[LessonSlot]) -> BTreeMap<NaiveDate, Vec<LessonSlot>> {
    let mut days: BTreeMap<NaiveDate, Vec<LessonSlot>> = BTreeMap::new();
    for slot in slots {
        days.entry(slot.date).or_default().push(slot.clone());
    }
    for bucket in days.values_mut() {
        bucket.sort_by_key(|slot| slot.time);
    }
    days
}

/// Buckets `slots` by the Sunday-based week they fall in, then by date.
pub fn group_by_week(
    slots: &[LessonSlot],
) -> BTreeMap<NaiveDate, BTreeMap<NaiveDate, Vec<LessonSlot>>> {
    let mut weeks: BTreeMap<NaiveDate, BTreeMap<NaiveDate, Vec<LessonSlot>>> = BTreeMap::new();
    for (date, bucket) in group_by_date(slots) {
        weeks.entry(start_of_week(date)).or_default().insert(date, bucket);
    }
    weeks
}

/// Slots with at least one free seat.
pub fn filter_open(slots: &[LessonSlot]) -> Vec<LessonSlot> {
    slots.iter().filter(|slot| !slot.is_full()).cloned().collect()
}

/// Slots nobody has booked yet. This is the view students browse: a lesson
/// with any existing booking is withheld even when seats remain.
pub fn filter_unbooked(slots: &[LessonSlot]) -> Vec<LessonSlot> {
    slots
        .iter()
        .filter(|slot| slot.booked_students.is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SlotId, SlotTime, StudentId, TeacherId};
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(id: i64, d: NaiveDate, t: &str, max_students: u32, booked: &[&str]) -> LessonSlot {
        LessonSlot {
            id: SlotId::new(id),
            owner: TeacherId::from("teacher-1"),
            date: d,
            time: SlotTime::parse(t).unwrap(),
            duration_minutes: 60,
            max_students,
            booked_students: booked.iter().map(|s| StudentId::from(*s)).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_group_by_date_sorts_buckets_by_time() {
        let slots = vec![
            slot(1, date(2025, 6, 4), "16:00", 1, &[]),
            slot(2, date(2025, 6, 2), "10:00", 1, &[]),
            slot(3, date(2025, 6, 4), "09:00", 1, &[]),
        ];
        let days = group_by_date(&slots);
        assert_eq!(days.len(), 2);

        let wednesday = &days[&date(2025, 6, 4)];
        let times: Vec<String> = wednesday.iter().map(|s| s.time.to_string()).collect();
        assert_eq!(times, vec!["09:00", "16:00"]);
    }

    #[test]
    fn test_group_by_date_keys_are_ascending() {
        let slots = vec![
            slot(1, date(2025, 6, 11), "10:00", 1, &[]),
            slot(2, date(2025, 6, 2), "10:00", 1, &[]),
            slot(3, date(2025, 6, 4), "10:00", 1, &[]),
        ];
        let keys: Vec<NaiveDate> = group_by_date(&slots).into_keys().collect();
        assert_eq!(
            keys,
            vec![date(2025, 6, 2), date(2025, 6, 4), date(2025, 6, 11)]
        );
    }

    #[test]
    fn test_group_by_week_uses_sunday_start() {
        // 2025-06-02 (Mon) and 2025-06-04 (Wed) share the week of 2025-06-01;
        // 2025-06-09 falls in the next week.
        let slots = vec![
            slot(1, date(2025, 6, 2), "10:00", 1, &[]),
            slot(2, date(2025, 6, 4), "10:00", 1, &[]),
            slot(3, date(2025, 6, 9), "10:00", 1, &[]),
        ];
        let weeks = group_by_week(&slots);
        let starts: Vec<NaiveDate> = weeks.keys().copied().collect();
        assert_eq!(starts, vec![date(2025, 6, 1), date(2025, 6, 8)]);
        assert_eq!(weeks[&date(2025, 6, 1)].len(), 2);
        assert_eq!(weeks[&date(2025, 6, 8)].len(), 1);
    }

    #[test]
    fn test_filter_open_keeps_under_capacity_slots() {
        let slots = vec![
            slot(1, date(2025, 6, 2), "10:00", 2, &["alice"]),
            slot(2, date(2025, 6, 2), "11:00", 1, &["bob"]),
            slot(3, date(2025, 6, 2), "12:00", 1, &[]),
        ];
        let open: Vec<i64> = filter_open(&slots).iter().map(|s| s.id.value()).collect();
        assert_eq!(open, vec![1, 3]);
    }

    #[test]
    fn test_filter_unbooked_hides_partially_booked_slots() {
        // Slot 1 still has a seat free but is already claimed once, so the
        // student view drops it.
        let slots = vec![
            slot(1, date(2025, 6, 2), "10:00", 2, &["alice"]),
            slot(2, date(2025, 6, 2), "11:00", 1, &[]),
        ];
        let visible: Vec<i64> = filter_unbooked(&slots).iter().map(|s| s.id.value()).collect();
        assert_eq!(visible, vec![2]);
    }

    #[test]
    fn test_empty_input_yields_empty_views() {
        assert!(group_by_date(&[]).is_empty());
        assert!(group_by_week(&[]).is_empty());
        assert!(filter_open(&[]).is_empty());
        assert!(filter_unbooked(&[]).is_empty());
    }
}
