//! Storage module for lesson slots and bookings.
//!
//! This module provides abstractions for storage operations via the
//! Repository pattern, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! The storage module follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, examples, tests)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Rule expansion and persistence                        │
//! │  - Booking lifecycle and checkout                        │
//! │  - Cross-cutting concerns                                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Repository Pattern
//! The module includes:
//! - `services`: High-level business logic functions (use these in your application!)
//! - `repository`: Trait definitions for storage operations
//! - `repositories::local`: In-memory implementation for unit testing and local development
//! - `factory`: Factory for creating repository instances
//!
//! # Recommended Usage
//!
//! **For new code, use the service layer:**
//! ```ignore
//! use cadenza::db::{services, factory::RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env()?;
//!
//!     // Use service layer functions
//!     let days = services::student_availability(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

// ==================== Service Layer (Recommended for new code) ====================
// Use these high-level functions that work with any repository implementation

pub use services::{
    book_slot, cancel_booking, checkout_cart, health_check, owner_schedule, publish_availability,
    remove_slot, remove_slots, student_availability, student_bookings, CheckoutOutcome,
    PublishFailure, PublishOutcome, ServiceError, ServiceResult,
};

// ==================== Repository Pattern Exports ====================

pub use repo_config::{PricingConfig, RepositoryConfig};

// Repository traits and implementations
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    BookingRepository, FullRepository, RepositoryError, RepositoryResult, SlotRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

fn create_selected_repository() -> RepositoryResult<Arc<dyn FullRepository>> {
    RepositoryFactory::from_env()
}

/// Initialize the global repository singleton for the selected backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = create_selected_repository()?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
