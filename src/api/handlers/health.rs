use axum::{extract::State, Json};
use std::sync::Arc;
use crate::api::dtos::responses::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if state.database.is_connected() { "connected" } else { "disconnected" };
    Json(HealthResponse { status: "ok", database })
}
