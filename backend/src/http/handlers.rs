//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    BookSlotRequest, BookingListResponse, CalendarResponse, CancelBookingRequest, CheckoutRequest,
    DeleteSlotsRequest, DeletedResponse, HealthResponse, PublishFailureDto, PublishSlotsRequest,
    PublishSlotsResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::db::services::CheckoutOutcome;
use crate::models::{Booking, BookingId, SlotId, StudentId, TeacherId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Owner Availability
// =============================================================================

/// POST /v1/owners/{owner_id}/slots
///
/// Publish availability: expand a recurrence rule and store the generated
/// slots. Expansion is all-or-nothing, so an overlap rejects the whole
/// request; slots that individually lose a storage race are reported in the
/// `failed` list of the 201 response.
pub async fn publish_slots(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(request): Json<PublishSlotsRequest>,
) -> Result<(StatusCode, Json<PublishSlotsResponse>), AppError> {
    let owner = TeacherId::new(owner_id);
    let rule = request.into_rule()?;

    let outcome = db_services::publish_availability(state.repository.as_ref(), &owner, &rule)
        .await?;

    let failed: Vec<PublishFailureDto> = outcome
        .failed
        .iter()
        .map(|f| PublishFailureDto {
            date: f.slot.date,
            time: f.slot.time,
            error: f.error.to_string(),
        })
        .collect();
    let total_created = outcome.created.len();

    Ok((
        StatusCode::CREATED,
        Json(PublishSlotsResponse {
            created: outcome.created,
            failed,
            total_created,
        }),
    ))
}

/// GET /v1/owners/{owner_id}/slots
///
/// The owner's full schedule, bucketed by date.
pub async fn get_owner_schedule(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> HandlerResult<CalendarResponse> {
    let owner = TeacherId::new(owner_id);
    let days = db_services::owner_schedule(state.repository.as_ref(), &owner).await?;
    Ok(Json(CalendarResponse::from_days(days)))
}

/// DELETE /v1/owners/{owner_id}/slots/{slot_id}
///
/// Delete a single slot. 404 if the slot does not exist or belongs to
/// another owner.
pub async fn delete_slot(
    State(state): State<AppState>,
    Path((owner_id, slot_id)): Path<(String, i64)>,
) -> HandlerResult<DeletedResponse> {
    let owner = TeacherId::new(owner_id);
    db_services::remove_slot(state.repository.as_ref(), &owner, SlotId::new(slot_id)).await?;
    Ok(Json(DeletedResponse { deleted: 1 }))
}

/// DELETE /v1/owners/{owner_id}/slots
///
/// Delete several slots at once; ids that do not exist or belong to another
/// owner are skipped and the response reports how many were deleted.
pub async fn delete_slots(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Json(request): Json<DeleteSlotsRequest>,
) -> HandlerResult<DeletedResponse> {
    let owner = TeacherId::new(owner_id);
    let ids: Vec<SlotId> = request.slot_ids.into_iter().map(SlotId::new).collect();
    let deleted = db_services::remove_slots(state.repository.as_ref(), &owner, &ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}

// =============================================================================
// Student Availability & Bookings
// =============================================================================

/// GET /v1/availability
///
/// The calendar students browse: slots with no bookings at all, bucketed by
/// date.
pub async fn get_availability(State(state): State<AppState>) -> HandlerResult<CalendarResponse> {
    let days = db_services::student_availability(state.repository.as_ref()).await?;
    Ok(Json(CalendarResponse::from_days(days)))
}

/// POST /v1/students/{student_id}/bookings
///
/// Claim a seat in a slot. 409 if the slot is full or the student already
/// holds a seat in it.
pub async fn create_booking(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<BookSlotRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let student = StudentId::new(student_id);
    let booking = db_services::book_slot(
        state.repository.as_ref(),
        &student,
        SlotId::new(request.slot_id),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /v1/students/{student_id}/bookings
///
/// The student's booking history, newest first, cancelled records included.
pub async fn list_bookings(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> HandlerResult<BookingListResponse> {
    let student = StudentId::new(student_id);
    let bookings = db_services::student_bookings(state.repository.as_ref(), &student).await?;
    let total = bookings.len();
    Ok(Json(BookingListResponse { bookings, total }))
}

/// POST /v1/bookings/{booking_id}/cancel
///
/// Cancel a booking and free its seat. Idempotent: cancelling twice returns
/// the cancelled record again.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<CancelBookingRequest>,
) -> HandlerResult<Booking> {
    let student = StudentId::new(request.student_id);
    let booking = db_services::cancel_booking(
        state.repository.as_ref(),
        &student,
        BookingId::new(booking_id),
    )
    .await?;
    Ok(Json(booking))
}

// =============================================================================
// Checkout
// =============================================================================

/// POST /v1/students/{student_id}/checkout
///
/// Price the slots in the cart, book every seat and charge once. 402 if the
/// charge is declined; any seats taken during the attempt are released again
/// before the error response.
pub async fn checkout(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<CheckoutRequest>,
) -> HandlerResult<CheckoutOutcome> {
    let student = StudentId::new(student_id);
    let slot_ids: Vec<SlotId> = request.slot_ids.into_iter().map(SlotId::new).collect();

    let outcome = db_services::checkout_cart(
        state.repository.as_ref(),
        state.gateway.as_ref(),
        &state.pricing,
        &student,
        &slot_ids,
    )
    .await?;
    Ok(Json(outcome))
}
