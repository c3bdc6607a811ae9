use std::sync::Arc;
use crate::domain::ports::{BookingRepository, DatabaseProbe, EventRepository, PostRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub database: Arc<dyn DatabaseProbe>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub post_repo: Arc<dyn PostRepository>,
}
