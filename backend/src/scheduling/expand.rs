//! Recurrence expansion: availability rules in, concrete lesson slots out.
//!
//! Expansion is pure and all-or-nothing. Every occurrence is validated
//! against the caller's snapshot of stored slots and against the occurrences
//! already staged in the same call; the first collision aborts the batch with
//! no slots produced. Persisting the returned batch is the caller's concern.

use chrono::NaiveDate;

use super::error::{SchedulingError, SchedulingResult};
use super::overlap::{find_conflict, starts_conflict, OverlapPolicy};
use crate::models::{weekday_index, LessonSlot, NewLessonSlot, RecurrenceRule, TeacherId};

/// Expands `rule` into slot-creation requests for `owner` under the default
/// exact-start overlap policy.
///
/// # Arguments
/// * `owner` - Teacher the generated slots will belong to.
/// * `rule` - Recurrence rule to expand.
/// * `existing` - Snapshot of the owner's stored slots to collide against.
///
/// # Returns
/// The full batch in ascending date order, or the first error encountered.
pub fn expand(
    owner: &TeacherId,
    rule: &RecurrenceRule,
    existing: &[LessonSlot],
) -> SchedulingResult<Vec<NewLessonSlot>> {
    expand_with_policy(owner, rule, existing, OverlapPolicy::default())
}

/// [`expand`] with an explicit overlap policy.
pub fn expand_with_policy(
    owner: &TeacherId,
    rule: &RecurrenceRule,
    existing: &[LessonSlot],
    policy: OverlapPolicy,
) -> SchedulingResult<Vec<NewLessonSlot>> {
    rule.validate()?;

    let Some(end_date) = rule.end_date else {
        return expand_single(owner, rule, existing, policy);
    };

    let mut staged: Vec<NewLessonSlot> = Vec::new();
    for date in rule.start_date.iter_days().take_while(|d| *d <= end_date) {
        if !rule.weekdays.contains(weekday_index(date)) {
            continue;
        }
        ensure_free(rule, date, existing, &staged, policy)?;
        staged.push(NewLessonSlot::from_rule(owner, rule, date));
    }

    if staged.is_empty() {
        return Err(SchedulingError::NoMatchingDates);
    }
    Ok(staged)
}

/// One-off mode: the rule's own weekday set must admit its start date.
fn expand_single(
    owner: &TeacherId,
    rule: &RecurrenceRule,
    existing: &[LessonSlot],
    policy: OverlapPolicy,
) -> SchedulingResult<Vec<NewLessonSlot>> {
    let date = rule.start_date;
    if !rule.weekdays.contains(weekday_index(date)) {
        return Err(SchedulingError::WeekdayMismatch { date });
    }
    ensure_free(rule, date, existing, &[], policy)?;
    Ok(vec![NewLessonSlot::from_rule(owner, rule, date)])
}

/// Checks one occurrence against stored slots and the staged batch.
fn ensure_free(
    rule: &RecurrenceRule,
    date: NaiveDate,
    existing: &[LessonSlot],
    staged: &[NewLessonSlot],
    policy: OverlapPolicy,
) -> SchedulingResult<()> {
    if let Some((date, time)) =
        find_conflict(date, rule.time, rule.duration_minutes, existing, policy)
    {
        return Err(SchedulingError::Overlap { date, time });
    }
    if let Some(hit) = staged.iter().find(|slot| {
        starts_conflict(
            (date, rule.time, rule.duration_minutes),
            (slot.date, slot.time, slot.duration_minutes),
            policy,
        )
    }) {
        return Err(SchedulingError::Overlap {
            date: hit.date,
            time: hit.time,
        });
    }
    Ok(())
}
