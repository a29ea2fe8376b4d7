//! Repository trait definitions for storage operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract slot and booking storage. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`slots`]: CRUD operations for published lesson slots
//! - [`bookings`]: Booking records and their lifecycle
//!
//! # Trait Composition
//!
//! A complete repository implementation typically implements all traits:
//!
//! ```ignore
//! impl SlotRepository for MyRepo { ... }
//! impl BookingRepository for MyRepo { ... }
//! ```
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> Result<()> {
//!     // Can use any repository method
//!     let slot = repo.get_slot(slot_id).await?;
//!     repo.create_booking(&new_booking).await?;
//!     Ok(())
//! }
//! ```

pub mod bookings;
pub mod error;
pub mod slots;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use bookings::BookingRepository;
pub use slots::SlotRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// both repository traits. Use this as a convenient bound when you need
/// access to all repository operations.
///
/// # Example
///
/// ```ignore
/// async fn claim_seat<R: FullRepository>(
///     repo: &R,
///     slot_id: SlotId,
/// ) -> RepositoryResult<()> {
///     // Can use slot and booking methods together
///     let slot = repo.get_slot(slot_id).await?;
///     repo.update_slot(&slot).await?;
///     Ok(())
/// }
/// ```
pub trait FullRepository: SlotRepository + BookingRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: SlotRepository + BookingRepository {}
