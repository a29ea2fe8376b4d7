//! Booking repository trait.
//!
//! Bookings are append-mostly: cancellation flips the status rather than
//! deleting the record, so a student's history stays intact.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Booking, BookingId, BookingStatus, NewBooking, SlotId, StudentId};

/// Repository trait for booking storage operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking.
    ///
    /// # Arguments
    /// * `booking` - The booking to store, without an id
    ///
    /// # Returns
    /// * `Ok(Booking)` - The stored booking including its assigned id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking>;

    /// Retrieve a single booking by id.
    ///
    /// # Arguments
    /// * `booking_id` - The id of the booking to retrieve
    ///
    /// # Returns
    /// * `Ok(Booking)` - The booking
    /// * `Err(RepositoryError::NotFound)` - If the booking doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking>;

    /// List every booking made by `student`, newest id first.
    ///
    /// # Arguments
    /// * `student` - The student whose bookings to list
    ///
    /// # Returns
    /// * `Ok(Vec<Booking>)` - The student's bookings, cancelled ones included
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_bookings_for_student(
        &self,
        student: &StudentId,
    ) -> RepositoryResult<Vec<Booking>>;

    /// List every booking against a slot, active and cancelled.
    ///
    /// # Arguments
    /// * `slot_id` - The slot whose bookings to list
    ///
    /// # Returns
    /// * `Ok(Vec<Booking>)` - Bookings ordered by id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_bookings_for_slot(&self, slot_id: SlotId) -> RepositoryResult<Vec<Booking>>;

    /// Set the lifecycle status of a booking.
    ///
    /// # Arguments
    /// * `booking_id` - The id of the booking to update
    /// * `status` - The new status
    ///
    /// # Returns
    /// * `Ok(Booking)` - The booking after the update
    /// * `Err(RepositoryError::NotFound)` - If the booking doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn set_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking>;
}
