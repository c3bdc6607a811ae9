use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::ListEventsQuery, responses::ApiResponse};
use crate::api::extractors::json::ValidJson;
use crate::domain::models::event::{Event, EventInput};
use crate::domain::ports::EventFilter;
use crate::domain::services::normalizer::{apply_event_changes, build_event, is_valid_slug, normalize_date};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Checks a slug taken from the URL before it reaches the database.
pub fn validate_slug_param(raw: &str) -> Result<&str, AppError> {
    let slug = raw.trim();
    if slug.is_empty() {
        return Err(AppError::Validation("Slug parameter is required".into()));
    }
    if !is_valid_slug(slug) {
        return Err(AppError::Validation(
            "Invalid slug format. Slug must contain only lowercase letters, numbers, and hyphens".into(),
        ));
    }
    Ok(slug)
}

pub(crate) async fn load_event(state: &AppState, raw_slug: &str) -> Result<Event, AppError> {
    let slug = validate_slug_param(raw_slug)?;
    state.event_repo.find_by_slug(slug).await?
        .ok_or_else(|| AppError::NotFound(format!("Event with slug \"{}\" not found", slug)))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<EventInput>,
) -> Result<impl IntoResponse, AppError> {
    let event = build_event(payload)?;
    info!("Creating event: {} ({} {})", event.slug, event.date, event.time);

    let created = state.event_repo.create(&event).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = query.date.as_deref().map(normalize_date).transpose()?;
    let tag = query.tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    let events = state.event_repo.list(&EventFilter { tag, date }).await?;
    Ok(Json(ApiResponse::ok(events)))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &slug).await?;
    Ok(Json(ApiResponse::ok(event)))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    ValidJson(payload): ValidJson<EventInput>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &slug).await?;
    let event = apply_event_changes(event, payload)?;

    info!("Updating event: {} (slug now {})", event.id, event.slug);
    let updated = state.event_repo.update(&event).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = load_event(&state, &slug).await?;

    info!("Deleting event: {} ({})", event.slug, event.id);
    state.event_repo.delete(&event.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
