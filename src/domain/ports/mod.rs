use crate::domain::models::{booking::Booking, event::Event, post::Post};
use crate::error::AppError;
use async_trait::async_trait;

/// Optional filters for event listings. Values are compared verbatim, so
/// callers normalize dates before filling `date`.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub tag: Option<String>,
    pub date: Option<String>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<Post, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, AppError>;
}

/// Type-erased view of the connection manager for health checks and warm-up.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn ensure_connected(&self) -> Result<(), AppError>;
    fn is_connected(&self) -> bool;
}
