//! High-level scheduling service layer.
//!
//! This module provides repository-agnostic operations that work with any
//! implementation of the repository traits. These functions contain the
//! business logic of the platform: expanding availability rules, booking and
//! cancelling seats, and running checkout, consistent regardless of the
//! storage backend.
//!
//! # Architecture
//!
//! The platform follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, examples, tests)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Rule expansion and best-effort persistence            │
//! │  - Booking lifecycle and seat accounting                 │
//! │  - Checkout orchestration and compensation               │
//! └─────────┬─────────────────────────────┬─────────────────┘
//!           │                             │
//! ┌─────────▼──────────────────┐  ┌───────▼─────────────────┐
//! │ Scheduling Engine          │  │ Repository Traits       │
//! │ (pure, synchronous)        │  │ - SlotRepository        │
//! │ - expand / overlap         │  │ - BookingRepository     │
//! │ - availability views       │  └───────┬─────────────────┘
//! └────────────────────────────┘          │
//!                                ┌────────▼────────────────┐
//!                                │ Local Repository        │
//!                                │ (in-memory)             │
//!                                └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use cadenza::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create local repository
//!     let repo = LocalRepository::new();
//!
//!     // Use service layer functions
//!     let days = services::student_availability(&repo).await?;
//!     println!("Found {} days with open lessons", days.len());
//!
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{info, warn};

use super::repo_config::PricingConfig;
use super::repository::{FullRepository, RepositoryError};
use crate::checkout::{
    cart_total, CartItem, CheckoutAction, CheckoutError, CheckoutState, PaymentError,
    PaymentGateway, Receipt,
};
use crate::models::{
    Booking, BookingId, BookingStatus, LessonSlot, NewBooking, NewLessonSlot, RecurrenceRule,
    SlotId, StudentId, TeacherId,
};
use crate::scheduling::{expand, filter_unbooked, group_by_date, SchedulingError};

/// Result type for service layer operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service layer operations.
///
/// A transparent wrapper: callers match on the underlying domain error to
/// decide how to respond.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Result of publishing an availability rule.
///
/// Expansion is atomic, but persisting the validated batch is best-effort:
/// individual inserts can still lose a storage race to a concurrent publish.
#[derive(Debug)]
pub struct PublishOutcome {
    /// Slots persisted, in ascending date order.
    pub created: Vec<LessonSlot>,
    /// Slots the storage layer refused, with the reason per slot.
    pub failed: Vec<PublishFailure>,
}

/// One slot of a published batch that could not be persisted.
#[derive(Debug)]
pub struct PublishFailure {
    pub slot: NewLessonSlot,
    pub error: ServiceError,
}

/// Result of a settled checkout.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckoutOutcome {
    pub receipt: Receipt,
    pub bookings: Vec<Booking>,
}

/// Storage conflicts and scheduling overlaps are the same event seen from
/// different layers, so they surface through one channel.
fn fold_conflict(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Conflict { date, time } => {
            ServiceError::Scheduling(SchedulingError::Overlap { date, time })
        }
        other => ServiceError::Repository(other),
    }
}

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
///
/// This is a simple pass-through to the repository's health check.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(true)` if the backend is healthy
/// * `Err` if the check fails
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> ServiceResult<bool> {
    Ok(repo.health_check().await?)
}

// ==================== Availability Operations ====================

/// Expand an availability rule and persist the generated slots.
///
/// This function orchestrates the complete publish process:
/// 1. Snapshot the owner's stored slots
/// 2. Expand the rule against that snapshot (atomic, all-or-nothing)
/// 3. Persist the validated batch in parallel (best-effort per slot)
///
/// A slot that loses a storage race to a concurrent publish is reported in
/// [`PublishOutcome::failed`] rather than failing the whole call; validation
/// already guaranteed the batch contains no internal duplicates.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `owner` - Teacher publishing the availability
/// * `rule` - Recurrence rule to expand
///
/// # Returns
/// * `Ok(PublishOutcome)` - Slots persisted and slots refused by storage
/// * `Err` if validation or expansion fails, before anything is persisted
pub async fn publish_availability<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &TeacherId,
    rule: &RecurrenceRule,
) -> ServiceResult<PublishOutcome> {
    info!(
        "Service layer: publishing availability for {} ({} weekdays, {} - {})",
        owner,
        rule.weekdays.len(),
        rule.start_date,
        rule.end_date
            .map_or_else(|| "one-off".to_string(), |d| d.to_string()),
    );

    let existing = repo.list_slots_for_owner(owner).await?;
    let batch = expand(owner, rule, &existing)?;

    let results = futures::future::join_all(batch.iter().map(|slot| async move {
        let outcome = repo.insert_slot(slot).await;
        (slot, outcome)
    }))
    .await;

    let mut created = Vec::new();
    let mut failed = Vec::new();
    for (slot, outcome) in results {
        match outcome {
            Ok(stored) => created.push(stored),
            Err(err) => {
                warn!(
                    "Service layer: could not persist slot on {} at {}: {}",
                    slot.date, slot.time, err
                );
                failed.push(PublishFailure {
                    slot: slot.clone(),
                    error: fold_conflict(err),
                });
            }
        }
    }

    info!(
        "Service layer: published {} slots for {} ({} failed)",
        created.len(),
        owner,
        failed.len()
    );
    Ok(PublishOutcome { created, failed })
}

/// An owner's full schedule, bucketed by date.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `owner` - Teacher whose schedule to build
///
/// # Returns
/// * `Ok(BTreeMap)` - Dates in ascending order, each bucket sorted by time
pub async fn owner_schedule<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &TeacherId,
) -> ServiceResult<BTreeMap<NaiveDate, Vec<LessonSlot>>> {
    let slots = repo.list_slots_for_owner(owner).await?;
    Ok(group_by_date(&slots))
}

/// The availability calendar students browse, bucketed by date.
///
/// Only slots with no bookings at all are shown; a lesson that has been
/// claimed once is withheld even when seats remain.
///
/// # Arguments
/// * `repo` - Repository implementation
///
/// # Returns
/// * `Ok(BTreeMap)` - Dates in ascending order, each bucket sorted by time
pub async fn student_availability<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<BTreeMap<NaiveDate, Vec<LessonSlot>>> {
    let slots = repo.list_all_slots().await?;
    Ok(group_by_date(&filter_unbooked(&slots)))
}

// ==================== Booking Operations ====================

/// Book a seat in a slot for a student.
///
/// Taking the seat and storing the booking record are two writes. If the
/// record write fails, the seat is released again before the error is
/// returned, so a failed booking does not keep the seat.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `student` - Student claiming the seat
/// * `slot_id` - Slot to book
///
/// # Returns
/// * `Ok(Booking)` - The stored booking
/// * `Err(ServiceError::Scheduling)` - If the student already holds a seat or
///   the slot is full
/// * `Err(ServiceError::Repository)` - If the slot doesn't exist or storage
///   fails
pub async fn book_slot<R: FullRepository + ?Sized>(
    repo: &R,
    student: &StudentId,
    slot_id: SlotId,
) -> ServiceResult<Booking> {
    let mut slot = repo.get_slot(slot_id).await?;
    slot.book(student.clone())?;
    repo.update_slot(&slot).await?;

    let booking = match repo
        .create_booking(&NewBooking::for_slot(&slot, student.clone()))
        .await
    {
        Ok(booking) => booking,
        Err(err) => {
            // A seat persisted without a booking record cannot be freed
            // through cancellation, which needs a booking id.
            slot.release(student);
            if let Err(release_err) = repo.update_slot(&slot).await {
                warn!(
                    "Service layer: could not release the seat on slot {} after a failed booking write: {}",
                    slot_id, release_err
                );
            }
            return Err(err.into());
        }
    };

    info!(
        "Service layer: student {} booked slot {} on {} at {}",
        student, slot_id, slot.date, slot.time
    );
    Ok(booking)
}

/// Cancel a booking and free its seat.
///
/// Cancellation is idempotent: cancelling an already-cancelled booking
/// returns it unchanged. The booking record is kept; only its status flips.
/// Freeing the seat is best-effort, so a slot deleted since the booking was
/// made does not block the cancellation.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `student` - Student who owns the booking
/// * `booking_id` - Booking to cancel
///
/// # Returns
/// * `Ok(Booking)` - The booking after cancellation
/// * `Err(ServiceError::Repository)` - If the booking doesn't exist or
///   belongs to another student
pub async fn cancel_booking<R: FullRepository + ?Sized>(
    repo: &R,
    student: &StudentId,
    booking_id: BookingId,
) -> ServiceResult<Booking> {
    let booking = repo.get_booking(booking_id).await?;
    if &booking.student != student {
        return Err(ServiceError::Repository(RepositoryError::NotFound(
            format!("Booking {} not found", booking_id),
        )));
    }

    if booking.status == BookingStatus::Cancelled {
        info!(
            "Service layer: booking {} is already cancelled",
            booking_id
        );
        return Ok(booking);
    }

    let cancelled = repo
        .set_booking_status(booking_id, BookingStatus::Cancelled)
        .await?;

    match repo.get_slot(cancelled.slot_id).await {
        Ok(mut slot) => {
            if slot.release(student) {
                if let Err(err) = repo.update_slot(&slot).await {
                    warn!(
                        "Service layer: could not free the seat for booking {}: {}",
                        booking_id, err
                    );
                }
            }
        }
        Err(err) => {
            warn!(
                "Service layer: slot {} unavailable while cancelling booking {}: {}",
                cancelled.slot_id, booking_id, err
            );
        }
    }

    info!("Service layer: cancelled booking {}", booking_id);
    Ok(cancelled)
}

/// Every booking a student has made, newest first.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `student` - Student whose bookings to list
pub async fn student_bookings<R: FullRepository + ?Sized>(
    repo: &R,
    student: &StudentId,
) -> ServiceResult<Vec<Booking>> {
    Ok(repo.list_bookings_for_student(student).await?)
}

// ==================== Checkout ====================

/// Run a full checkout: price the cart, book every seat, charge once.
///
/// The checkout state machine guards the flow, which also deduplicates
/// repeated slot ids in the request and rejects an empty cart. Seats are
/// booked sequentially; on any booking failure or a declined charge, the
/// seats already taken are cancelled again before the error is returned, so
/// a failed checkout holds nothing.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `gateway` - Payment gateway to charge through
/// * `pricing` - Per-minute pricing applied to each slot
/// * `student` - Student checking out
/// * `slot_ids` - Slots in the cart
///
/// # Returns
/// * `Ok(CheckoutOutcome)` - Receipt of the settled charge plus the bookings
/// * `Err(ServiceError::Payment)` - If the charge was declined
/// * `Err(ServiceError::Checkout)` - If the cart is empty
pub async fn checkout_cart<R: FullRepository + ?Sized>(
    repo: &R,
    gateway: &dyn PaymentGateway,
    pricing: &PricingConfig,
    student: &StudentId,
    slot_ids: &[SlotId],
) -> ServiceResult<CheckoutOutcome> {
    info!(
        "Service layer: checkout for student {} with {} slots",
        student,
        slot_ids.len()
    );

    let mut state = CheckoutState::Browsing;
    for slot_id in slot_ids {
        let slot = repo.get_slot(*slot_id).await?;
        let item = CartItem::from_slot(&slot, pricing.per_minute_cents);
        state = state.apply(CheckoutAction::SelectSlot(item))?;
    }
    let state = state.apply(CheckoutAction::BeginPurchase)?;

    let mut bookings: Vec<Booking> = Vec::new();
    for item in state.items() {
        match book_slot(repo, student, item.slot_id).await {
            Ok(booking) => bookings.push(booking),
            Err(err) => {
                warn!(
                    "Service layer: aborting checkout, could not book slot {}: {}",
                    item.slot_id, err
                );
                cancel_all(repo, student, &bookings).await;
                return Err(err);
            }
        }
    }

    let total = cart_total(state.items());
    match gateway.charge(student, total).await {
        Ok(receipt) => {
            let state = state.apply(CheckoutAction::PaymentSettled {
                receipt: receipt.clone(),
                bookings: bookings.clone(),
            })?;
            info!(
                "Service layer: checkout {} for student {} ({} bookings, {} cents)",
                state.label(),
                student,
                bookings.len(),
                total
            );
            Ok(CheckoutOutcome { receipt, bookings })
        }
        Err(PaymentError::Declined(reason)) => {
            let state = state.apply(CheckoutAction::PaymentDeclined {
                reason: reason.clone(),
            })?;
            warn!(
                "Service layer: checkout {} for student {}: {}",
                state.label(),
                student,
                reason
            );
            cancel_all(repo, student, &bookings).await;
            Err(PaymentError::Declined(reason).into())
        }
    }
}

/// Compensation path: cancel every booking taken during a failed checkout.
async fn cancel_all<R: FullRepository + ?Sized>(repo: &R, student: &StudentId, bookings: &[Booking]) {
    for booking in bookings {
        if let Err(err) = cancel_booking(repo, student, booking.id).await {
            warn!(
                "Service layer: compensation failed for booking {}: {}",
                booking.id, err
            );
        }
    }
}

// ==================== Slot Removal ====================

/// Delete one of an owner's slots.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `owner` - Teacher requesting the deletion
/// * `slot_id` - Slot to delete
pub async fn remove_slot<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &TeacherId,
    slot_id: SlotId,
) -> ServiceResult<()> {
    repo.delete_slot(owner, slot_id).await?;
    info!("Service layer: deleted slot {} for {}", slot_id, owner);
    Ok(())
}

/// Delete several of an owner's slots; ids that don't exist or belong to
/// someone else are skipped.
///
/// # Arguments
/// * `repo` - Repository implementation
/// * `owner` - Teacher requesting the deletion
/// * `slot_ids` - Slots to delete
///
/// # Returns
/// * `Ok(usize)` - Number of slots actually deleted
pub async fn remove_slots<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &TeacherId,
    slot_ids: &[SlotId],
) -> ServiceResult<usize> {
    let deleted = repo.delete_slots(owner, slot_ids).await?;
    info!(
        "Service layer: deleted {} of {} slots for {}",
        deleted,
        slot_ids.len(),
        owner
    );
    Ok(deleted)
}
