//! # Cadenza Backend
//!
//! Lesson-slot scheduling and booking engine for a music-lesson platform.
//!
//! This crate provides the Rust backend for Cadenza, a platform where music
//! teachers publish recurring lesson availability and students book and pay
//! for seats. The backend exposes a REST API via Axum for the web frontend.
//!
//! ## Features
//!
//! - **Recurrence Expansion**: Turn a weekly availability rule into concrete
//!   lesson slots, with overlap detection against the published schedule
//! - **Availability Views**: Calendar buckets for the owner schedule and the
//!   student-facing availability page
//! - **Booking Lifecycle**: Seat claiming with capacity and duplicate guards,
//!   idempotent cancellation
//! - **Checkout**: A cart state machine, pricing, and a payment gateway seam
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (slots, bookings, recurrence rules)
//! - [`scheduling`]: The pure slot scheduling engine
//! - [`checkout`]: Cart, purchase state machine, and payment seam
//! - [`db`]: Repository pattern, service layer, and persistence
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod checkout;
pub mod db;
pub mod models;
pub mod scheduling;

#[cfg(feature = "http-server")]
pub mod http;
