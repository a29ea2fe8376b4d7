//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Owner availability
        .route("/owners/{owner_id}/slots", post(handlers::publish_slots))
        .route("/owners/{owner_id}/slots", get(handlers::get_owner_schedule))
        .route("/owners/{owner_id}/slots", delete(handlers::delete_slots))
        .route(
            "/owners/{owner_id}/slots/{slot_id}",
            delete(handlers::delete_slot),
        )
        // Student availability and bookings
        .route("/availability", get(handlers::get_availability))
        .route(
            "/students/{student_id}/bookings",
            post(handlers::create_booking),
        )
        .route(
            "/students/{student_id}/bookings",
            get(handlers::list_bookings),
        )
        .route(
            "/bookings/{booking_id}/cancel",
            post(handlers::cancel_booking),
        )
        // Checkout
        .route("/students/{student_id}/checkout", post(handlers::checkout));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
