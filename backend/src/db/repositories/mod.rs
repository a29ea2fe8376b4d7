//! Repository implementations module.
//!
//! This module contains the implementations of the repository traits:
//! - `local`: In-memory implementation for unit testing and local development
#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
