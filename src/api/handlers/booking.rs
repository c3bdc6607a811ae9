use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateBookingRequest, responses::ApiResponse};
use crate::api::extractors::json::ValidJson;
use crate::api::handlers::event::load_event;
use crate::domain::models::booking::Booking;
use crate::domain::services::normalizer::normalize_email;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event_id = payload.event_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("Event ID is required".into()))?;
    let email = payload.email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".into()))?;
    let email = normalize_email(&email)?;

    if state.event_repo.find_by_id(&event_id).await?.is_none() {
        warn!("create_booking: rejected, event {} does not exist", event_id);
        return Err(AppError::Integrity(format!("Event with ID {} does not exist", event_id)));
    }

    let booking = Booking::new(event_id, email);
    let created = state.booking_repo.create(&booking).await.map_err(|e| {
        if e.is_missing_reference() {
            // Event removed after the existence check.
            AppError::Integrity(format!("Event with ID {} does not exist", booking.event_id))
        } else {
            e
        }
    })?;

    info!("create_booking: booking {} created for event {}", created.id, created.event_id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with ID {} not found", booking_id)))?;
    Ok(Json(ApiResponse::ok(booking)))
}

pub async fn list_event_bookings(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &slug).await?;
    let bookings = state.booking_repo.list_by_event(&event.id).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}
