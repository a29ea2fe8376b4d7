//! Core lesson-slot repository trait for CRUD operations.
//!
//! This trait defines the fundamental storage operations for published lesson
//! slots. Booking records are handled by a separate trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{LessonSlot, NewLessonSlot, SlotId, TeacherId};

/// Repository trait for lesson-slot storage operations.
///
/// Implementations enforce a uniqueness constraint on `(owner, date, time)`
/// and report violations as [`RepositoryError::Conflict`], which the service
/// layer folds into the scheduling overlap channel.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
///
/// [`RepositoryError::Conflict`]: super::error::RepositoryError::Conflict
#[async_trait]
pub trait SlotRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if the backend is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Slot Operations ====================

    /// Store a new lesson slot.
    ///
    /// # Arguments
    /// * `slot` - The slot to store, without an id
    ///
    /// # Returns
    /// * `Ok(LessonSlot)` - The stored slot including its assigned id
    /// * `Err(RepositoryError::Conflict)` - If the owner already has a slot at
    ///   the same date and time
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_slot(&self, slot: &NewLessonSlot) -> RepositoryResult<LessonSlot>;

    /// Retrieve a single slot by id.
    ///
    /// # Arguments
    /// * `slot_id` - The id of the slot to retrieve
    ///
    /// # Returns
    /// * `Ok(LessonSlot)` - The slot with its current bookings
    /// * `Err(RepositoryError::NotFound)` - If the slot doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_slot(&self, slot_id: SlotId) -> RepositoryResult<LessonSlot>;

    /// List every slot owned by `owner`, ordered by date then time.
    ///
    /// # Arguments
    /// * `owner` - The teacher whose slots to list
    ///
    /// # Returns
    /// * `Ok(Vec<LessonSlot>)` - The owner's slots, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_slots_for_owner(&self, owner: &TeacherId) -> RepositoryResult<Vec<LessonSlot>>;

    /// List every stored slot across all owners, ordered by date then time.
    ///
    /// # Returns
    /// * `Ok(Vec<LessonSlot>)` - All slots, possibly empty
    /// * `Err(RepositoryError)` - If the operation fails
    async fn list_all_slots(&self) -> RepositoryResult<Vec<LessonSlot>>;

    /// Replace a stored slot with `slot`, matched by id.
    ///
    /// # Arguments
    /// * `slot` - The new state of the slot
    ///
    /// # Returns
    /// * `Ok(())` - If the slot was updated
    /// * `Err(RepositoryError::NotFound)` - If no slot has this id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn update_slot(&self, slot: &LessonSlot) -> RepositoryResult<()>;

    /// Delete one of `owner`'s slots.
    ///
    /// # Arguments
    /// * `owner` - The teacher requesting the deletion
    /// * `slot_id` - The id of the slot to delete
    ///
    /// # Returns
    /// * `Ok(())` - If the slot was deleted
    /// * `Err(RepositoryError::NotFound)` - If the slot doesn't exist or
    ///   belongs to someone else
    /// * `Err(RepositoryError)` - If the operation fails
    async fn delete_slot(&self, owner: &TeacherId, slot_id: SlotId) -> RepositoryResult<()>;

    /// Delete several of `owner`'s slots in one call.
    ///
    /// # Arguments
    /// * `owner` - The teacher requesting the deletion
    /// * `slot_ids` - The ids of the slots to delete
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of slots actually deleted; ids that don't exist
    ///   or belong to someone else are skipped
    /// * `Err(RepositoryError)` - If the operation fails
    async fn delete_slots(&self, owner: &TeacherId, slot_ids: &[SlotId]) -> RepositoryResult<usize>;
}
