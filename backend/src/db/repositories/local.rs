//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    Booking, BookingId, BookingStatus, LessonSlot, NewBooking, NewLessonSlot, SlotId, StudentId,
    TeacherId,
};

/// In-memory local repository.
///
/// This implementation stores all data in memory using HashMaps, making it
/// ideal for unit tests and local development that need isolation and speed.
/// The `(owner, date, time)` uniqueness constraint is enforced on insert,
/// exactly like a compound key in a real database.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
///
/// // Pre-populate with test data
/// repo.insert_slot_impl(&new_slot)?;
///
/// let slots = repo.list_all_slots().await?;
/// assert_eq!(slots.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    slots: HashMap<SlotId, LessonSlot>,
    bookings: HashMap<BookingId, Booking>,

    // ID counters
    next_slot_id: i64,
    next_booking_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            bookings: HashMap::new(),
            next_slot_id: 1,
            next_booking_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert a slot, enforcing the `(owner, date, time)` uniqueness key.
    ///
    /// This is also a helper method for seeding test data without going
    /// through the async trait.
    ///
    /// # Arguments
    /// * `slot` - Slot to insert; the id is assigned here
    ///
    /// # Returns
    /// The stored slot including its assigned id
    pub fn insert_slot_impl(&self, slot: &NewLessonSlot) -> RepositoryResult<LessonSlot> {
        let mut data = self.data.write();

        let taken = data
            .slots
            .values()
            .any(|s| s.owner == slot.owner && s.date == slot.date && s.time == slot.time);
        if taken {
            return Err(RepositoryError::Conflict {
                date: slot.date,
                time: slot.time,
            });
        }

        let id = SlotId::new(data.next_slot_id);
        data.next_slot_id += 1;

        let stored = slot.clone().into_slot(id);
        data.slots.insert(id, stored.clone());
        Ok(stored)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of slots stored.
    pub fn slot_count(&self) -> usize {
        self.data.read().slots.len()
    }

    /// Get the number of bookings stored.
    pub fn booking_count(&self) -> usize {
        self.data.read().bookings.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Repository is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    /// Helper to get a slot or return NotFound error.
    fn get_slot_impl(&self, slot_id: SlotId) -> RepositoryResult<LessonSlot> {
        let data = self.data.read();
        data.slots
            .get(&slot_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Slot {} not found", slot_id)))
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        Ok(data.is_healthy)
    }

    async fn insert_slot(&self, slot: &NewLessonSlot) -> RepositoryResult<LessonSlot> {
        self.check_health()?;
        self.insert_slot_impl(slot)
    }

    async fn get_slot(&self, slot_id: SlotId) -> RepositoryResult<LessonSlot> {
        self.get_slot_impl(slot_id)
    }

    async fn list_slots_for_owner(&self, owner: &TeacherId) -> RepositoryResult<Vec<LessonSlot>> {
        let data = self.data.read();

        let mut slots: Vec<LessonSlot> = data
            .slots
            .values()
            .filter(|s| &s.owner == owner)
            .cloned()
            .collect();

        slots.sort_by_key(|s| (s.date, s.time));
        Ok(slots)
    }

    async fn list_all_slots(&self) -> RepositoryResult<Vec<LessonSlot>> {
        let data = self.data.read();

        let mut slots: Vec<LessonSlot> = data.slots.values().cloned().collect();
        slots.sort_by_key(|s| (s.date, s.time));
        Ok(slots)
    }

    async fn update_slot(&self, slot: &LessonSlot) -> RepositoryResult<()> {
        let mut data = self.data.write();

        match data.slots.get_mut(&slot.id) {
            Some(stored) => {
                *stored = slot.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!(
                "Slot {} not found",
                slot.id
            ))),
        }
    }

    async fn delete_slot(&self, owner: &TeacherId, slot_id: SlotId) -> RepositoryResult<()> {
        let mut data = self.data.write();

        let owned = data
            .slots
            .get(&slot_id)
            .is_some_and(|s| &s.owner == owner);
        if !owned {
            return Err(RepositoryError::NotFound(format!(
                "Slot {} not found",
                slot_id
            )));
        }

        data.slots.remove(&slot_id);
        Ok(())
    }

    async fn delete_slots(
        &self,
        owner: &TeacherId,
        slot_ids: &[SlotId],
    ) -> RepositoryResult<usize> {
        let mut data = self.data.write();

        let mut deleted = 0;
        for slot_id in slot_ids {
            let owned = data
                .slots
                .get(slot_id)
                .is_some_and(|s| &s.owner == owner);
            if owned {
                data.slots.remove(slot_id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

// ==================== Booking Repository ====================

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn create_booking(&self, booking: &NewBooking) -> RepositoryResult<Booking> {
        self.check_health()?;
        let mut data = self.data.write();

        let id = BookingId::new(data.next_booking_id);
        data.next_booking_id += 1;

        let stored = booking.clone().into_booking(id);
        data.bookings.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        let data = self.data.read();
        data.bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Booking {} not found", booking_id)))
    }

    async fn list_bookings_for_student(
        &self,
        student: &StudentId,
    ) -> RepositoryResult<Vec<Booking>> {
        let data = self.data.read();

        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| &b.student == student)
            .cloned()
            .collect();

        // Newest first: later bookings get higher ids.
        bookings.sort_by_key(|b| std::cmp::Reverse(b.id));
        Ok(bookings)
    }

    async fn list_bookings_for_slot(&self, slot_id: SlotId) -> RepositoryResult<Vec<Booking>> {
        let data = self.data.read();

        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| b.slot_id == slot_id)
            .cloned()
            .collect();

        bookings.sort_by_key(|b| b.id);
        Ok(bookings)
    }

    async fn set_booking_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking> {
        let mut data = self.data.write();

        match data.bookings.get_mut(&booking_id) {
            Some(booking) => {
                booking.status = status;
                Ok(booking.clone())
            }
            None => Err(RepositoryError::NotFound(format!(
                "Booking {} not found",
                booking_id
            ))),
        }
    }
}
