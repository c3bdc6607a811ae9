use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::debug;
use crate::api::dtos::responses::ApiResponse;
use crate::domain::models::post::PostView;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Fetching post {}", id);

    let post = state.post_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Post with ID \"{}\" not found", id)))?;

    Ok(Json(ApiResponse::ok(PostView::from(post))))
}
