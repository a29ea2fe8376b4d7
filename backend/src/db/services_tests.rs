#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::checkout::{PaymentError, SimulatedGateway};
    use crate::db::repo_config::PricingConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::{RepositoryError, SlotRepository};
    use crate::db::services::{
        book_slot, cancel_booking, checkout_cart, health_check, owner_schedule,
        publish_availability, remove_slot, remove_slots, student_availability, student_bookings,
        ServiceError,
    };
    use crate::models::{
        BookingStatus, RecurrenceRule, SlotId, SlotTime, StudentId, TeacherId, WeekdaySet,
    };
    use crate::scheduling::SchedulingError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(s: &str) -> SlotTime {
        SlotTime::parse(s).unwrap()
    }

    /// Mon/Wed at 14:00 over the first two weeks of June 2025.
    fn mon_wed_rule(max_students: u32) -> RecurrenceRule {
        RecurrenceRule::weekly(
            date(2025, 6, 2),
            date(2025, 6, 13),
            time("14:00"),
            60,
            WeekdaySet::from_indices(&[1, 3]).unwrap(),
            max_students,
        )
    }

    /// Test that health check reflects the backend state
    #[tokio::test]
    async fn test_health_check_reflects_backend_state() {
        let repo = LocalRepository::new();
        assert!(health_check(&repo).await.unwrap());

        repo.set_healthy(false);
        assert!(!health_check(&repo).await.unwrap());
    }

    /// Test publishing a weekly rule persists the whole batch
    #[tokio::test]
    async fn test_publish_weekly_rule_persists_batch() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();

        assert!(outcome.failed.is_empty());
        let dates: Vec<NaiveDate> = outcome.created.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 6, 2),
                date(2025, 6, 4),
                date(2025, 6, 9),
                date(2025, 6, 11),
            ]
        );
        assert!(outcome.created.iter().all(|s| s.owner == owner));
        assert_eq!(repo.slot_count(), 4);
    }

    /// Test publishing a one-off rule creates a single slot
    #[tokio::test]
    async fn test_publish_one_off_rule() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        // 2025-06-25 is a Wednesday.
        let rule = RecurrenceRule::single(date(2025, 6, 25), time("09:30"), 45, 1);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();

        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.created[0].date, date(2025, 6, 25));
        assert_eq!(outcome.created[0].duration_minutes, 45);
        assert_eq!(repo.slot_count(), 1);
    }

    /// Test that an overlapping rule is rejected before anything is stored
    #[tokio::test]
    async fn test_publish_overlap_aborts_before_persisting() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let single = RecurrenceRule::single(date(2025, 6, 4), time("14:00"), 60, 4);
        publish_availability(&repo, &owner, &single).await.unwrap();

        let err = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Scheduling(SchedulingError::Overlap { date: d, time: t })
                if d == date(2025, 6, 4) && t == time("14:00")
        ));
        assert_eq!(repo.slot_count(), 1);
    }

    /// Test that rule validation failures persist nothing
    #[tokio::test]
    async fn test_publish_invalid_rule_rejected() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let mut rule = mon_wed_rule(4);
        rule.duration_minutes = 0;

        let err = publish_availability(&repo, &owner, &rule).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Scheduling(SchedulingError::Validation(_))
        ));
        assert_eq!(repo.slot_count(), 0);
    }

    /// Test that slots refused by storage are reported per slot, not as a hard error
    #[tokio::test]
    async fn test_publish_reports_slots_refused_by_storage() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        // Reads still work against an unhealthy repository, so expansion
        // succeeds and every insert is refused.
        repo.set_healthy(false);
        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();

        assert!(outcome.created.is_empty());
        assert_eq!(outcome.failed.len(), 4);
        assert!(outcome.failed.iter().all(|f| matches!(
            f.error,
            ServiceError::Repository(RepositoryError::ConnectionError(_))
        )));
        assert_eq!(outcome.failed[0].slot.date, date(2025, 6, 2));
        assert_eq!(repo.slot_count(), 0);
    }

    /// Test the owner schedule view buckets slots by date, ordered by time
    #[tokio::test]
    async fn test_owner_schedule_buckets_by_date() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        let morning = RecurrenceRule::single(date(2025, 6, 2), time("09:00"), 60, 4);
        publish_availability(&repo, &owner, &morning).await.unwrap();

        let schedule = owner_schedule(&repo, &owner).await.unwrap();
        assert_eq!(schedule.len(), 4);

        let monday = &schedule[&date(2025, 6, 2)];
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].time, time("09:00"));
        assert_eq!(monday[1].time, time("14:00"));
    }

    /// Test the student view hides a slot as soon as one seat is claimed
    #[tokio::test]
    async fn test_student_availability_hides_claimed_slots() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        book_slot(&repo, &student, outcome.created[0].id)
            .await
            .unwrap();

        let available = student_availability(&repo).await.unwrap();
        // Three seats remain in the booked slot, but it is withheld anyway.
        assert!(!available.contains_key(&date(2025, 6, 2)));
        assert_eq!(available.len(), 3);
    }

    /// Test booking a seat stores a denormalized booking record
    #[tokio::test]
    async fn test_book_slot_records_booking() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot = &outcome.created[0];

        let booking = book_slot(&repo, &student, slot.id).await.unwrap();
        assert_eq!(booking.slot_id, slot.id);
        assert_eq!(booking.student, student);
        assert_eq!(booking.date, slot.date);
        assert_eq!(booking.time, slot.time);
        assert_eq!(booking.duration_minutes, 30);
        assert_eq!(booking.status, BookingStatus::Booked);

        let stored = repo.get_slot(slot.id).await.unwrap();
        assert!(stored.has_student(&student));
        assert_eq!(stored.seats_left(), 1);
    }

    /// Test a student cannot claim two seats in the same slot
    #[tokio::test]
    async fn test_book_slot_rejects_double_booking() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        book_slot(&repo, &student, slot_id).await.unwrap();
        let err = book_slot(&repo, &student, slot_id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Scheduling(SchedulingError::AlreadyBooked { .. })
        ));
    }

    /// Test a full slot rejects further students
    #[tokio::test]
    async fn test_book_slot_rejects_when_full() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 1);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        book_slot(&repo, &StudentId::from("student-bo"), slot_id)
            .await
            .unwrap();
        let err = book_slot(&repo, &StudentId::from("student-cy"), slot_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Scheduling(SchedulingError::CapacityExceeded { max_students: 1, .. })
        ));
    }

    /// Test booking a slot that does not exist
    #[tokio::test]
    async fn test_book_missing_slot_not_found() {
        let repo = LocalRepository::new();

        let err = book_slot(&repo, &StudentId::from("student-bo"), SlotId::new(99))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::NotFound(_))
        ));
    }

    /// Test a booking record refused by storage does not keep the seat
    #[tokio::test]
    async fn test_booking_write_failure_frees_the_seat() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        // Slot reads and updates still work against an unhealthy repository,
        // so the flow fails only when the booking record is written.
        repo.set_healthy(false);
        let err = book_slot(&repo, &student, slot_id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::ConnectionError(_))
        ));

        // The seat came back and no booking record was left behind.
        let slot = repo.get_slot(slot_id).await.unwrap();
        assert!(!slot.has_student(&student));
        assert_eq!(slot.seats_left(), 2);
        assert_eq!(repo.booking_count(), 0);

        // Once storage recovers the student can book the slot normally.
        repo.set_healthy(true);
        book_slot(&repo, &student, slot_id).await.unwrap();
        assert_eq!(repo.booking_count(), 1);
    }

    /// Test cancellation frees the seat while keeping the booking record
    #[tokio::test]
    async fn test_cancel_booking_frees_the_seat() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 1);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        let booking = book_slot(&repo, &student, slot_id).await.unwrap();
        let cancelled = cancel_booking(&repo, &student, booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        // Seat is free again: the same student can rebook the slot.
        book_slot(&repo, &student, slot_id).await.unwrap();
        assert_eq!(repo.booking_count(), 2);
    }

    /// Test cancelling twice returns the booking unchanged
    #[tokio::test]
    async fn test_cancel_booking_is_idempotent() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let booking = book_slot(&repo, &student, outcome.created[0].id)
            .await
            .unwrap();

        cancel_booking(&repo, &student, booking.id).await.unwrap();
        let second = cancel_booking(&repo, &student, booking.id).await.unwrap();
        assert_eq!(second.status, BookingStatus::Cancelled);
    }

    /// Test a student cannot cancel another student's booking
    #[tokio::test]
    async fn test_cancel_foreign_booking_not_found() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 30, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let booking = book_slot(&repo, &student, outcome.created[0].id)
            .await
            .unwrap();

        let err = cancel_booking(&repo, &StudentId::from("student-cy"), booking.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::NotFound(_))
        ));

        // The booking is untouched.
        let bookings = student_bookings(&repo, &student).await.unwrap();
        assert_eq!(bookings[0].status, BookingStatus::Booked);
    }

    /// Test the booking history lists newest first
    #[tokio::test]
    async fn test_student_bookings_newest_first() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        let first = book_slot(&repo, &student, outcome.created[0].id)
            .await
            .unwrap();
        let second = book_slot(&repo, &student, outcome.created[1].id)
            .await
            .unwrap();

        let bookings = student_bookings(&repo, &student).await.unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].id, second.id);
        assert_eq!(bookings[1].id, first.id);
    }

    /// Test a settled checkout books every slot and charges the cart total
    #[tokio::test]
    async fn test_checkout_settles_and_books() {
        let repo = LocalRepository::new();
        let gateway = SimulatedGateway::new();
        let pricing = PricingConfig::default();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        let slot_ids: Vec<SlotId> = outcome.created.iter().take(2).map(|s| s.id).collect();

        let checkout = checkout_cart(&repo, &gateway, &pricing, &student, &slot_ids)
            .await
            .unwrap();

        // Two 60-minute lessons at the default 150 cents per minute.
        assert_eq!(checkout.receipt.amount_cents, 18_000);
        assert_eq!(checkout.bookings.len(), 2);
        for slot_id in slot_ids {
            let slot = repo.get_slot(slot_id).await.unwrap();
            assert!(slot.has_student(&student));
        }
    }

    /// Test a declined charge releases every seat taken during checkout
    #[tokio::test]
    async fn test_checkout_declined_releases_every_seat() {
        let repo = LocalRepository::new();
        let gateway = SimulatedGateway::declining("card expired");
        let pricing = PricingConfig::default();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        let slot_ids: Vec<SlotId> = outcome.created.iter().take(2).map(|s| s.id).collect();

        let err = checkout_cart(&repo, &gateway, &pricing, &student, &slot_ids)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Payment(PaymentError::Declined(ref reason)) if reason == "card expired"
        ));

        for slot_id in slot_ids {
            let slot = repo.get_slot(slot_id).await.unwrap();
            assert!(!slot.has_student(&student));
        }
        let bookings = student_bookings(&repo, &student).await.unwrap();
        assert!(bookings.iter().all(|b| b.status == BookingStatus::Cancelled));
    }

    /// Test checkout refuses an empty cart
    #[tokio::test]
    async fn test_checkout_empty_cart_rejected() {
        let repo = LocalRepository::new();
        let gateway = SimulatedGateway::new();
        let pricing = PricingConfig::default();

        let err = checkout_cart(
            &repo,
            &gateway,
            &pricing,
            &StudentId::from("student-bo"),
            &[],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Checkout(_)));
    }

    /// Test repeated slot ids in the request collapse into one cart line
    #[tokio::test]
    async fn test_checkout_duplicate_ids_collapse() {
        let repo = LocalRepository::new();
        let gateway = SimulatedGateway::new();
        let pricing = PricingConfig::default();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 60, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        let checkout = checkout_cart(&repo, &gateway, &pricing, &student, &[slot_id, slot_id])
            .await
            .unwrap();
        assert_eq!(checkout.bookings.len(), 1);
        assert_eq!(checkout.receipt.amount_cents, 9_000);
    }

    /// Test checkout backs out of earlier bookings when a later slot is full
    #[tokio::test]
    async fn test_checkout_aborts_when_a_slot_is_full() {
        let repo = LocalRepository::new();
        let gateway = SimulatedGateway::new();
        let pricing = PricingConfig::default();
        let owner = TeacherId::from("teacher-ana");
        let student = StudentId::from("student-bo");

        let rule = RecurrenceRule::weekly(
            date(2025, 6, 2),
            date(2025, 6, 6),
            time("14:00"),
            60,
            WeekdaySet::from_indices(&[1, 3]).unwrap(),
            1,
        );
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let first = outcome.created[0].id;
        let second = outcome.created[1].id;

        // Another student takes the only seat in the second slot.
        book_slot(&repo, &StudentId::from("student-cy"), second)
            .await
            .unwrap();

        let err = checkout_cart(&repo, &gateway, &pricing, &student, &[first, second])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Scheduling(SchedulingError::CapacityExceeded { .. })
        ));

        // The seat taken in the first slot was given back.
        let slot = repo.get_slot(first).await.unwrap();
        assert!(!slot.has_student(&student));
    }

    /// Test slot removal is scoped to the owner
    #[tokio::test]
    async fn test_remove_slot_scoped_to_owner() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let rule = RecurrenceRule::single(date(2025, 6, 25), time("10:00"), 60, 2);
        let outcome = publish_availability(&repo, &owner, &rule).await.unwrap();
        let slot_id = outcome.created[0].id;

        let err = remove_slot(&repo, &TeacherId::from("teacher-max"), slot_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::NotFound(_))
        ));

        remove_slot(&repo, &owner, slot_id).await.unwrap();
        assert_eq!(repo.slot_count(), 0);
    }

    /// Test bulk removal reports how many slots were actually deleted
    #[tokio::test]
    async fn test_remove_slots_counts_deletions() {
        let repo = LocalRepository::new();
        let owner = TeacherId::from("teacher-ana");

        let outcome = publish_availability(&repo, &owner, &mon_wed_rule(4))
            .await
            .unwrap();
        let mut ids: Vec<SlotId> = outcome.created.iter().map(|s| s.id).collect();
        ids.push(SlotId::new(999));

        let deleted = remove_slots(&repo, &owner, &ids).await.unwrap();
        assert_eq!(deleted, 4);
        assert_eq!(repo.slot_count(), 0);
    }
}
