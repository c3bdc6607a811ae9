use events_backend::{
    api::router::create_router,
    config::Config,
    infra::factory::bootstrap_state,
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    /// App backed by a fresh SQLite file, already connected and migrated.
    pub async fn new() -> Self {
        let app = Self::lazy();
        app.state.database.ensure_connected().await.expect("Failed to connect to test db");
        app
    }

    /// App whose database connection has not been opened yet.
    pub fn lazy() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        Self::with_database_url(&db_url, db_filename)
    }

    pub fn with_database_url(db_url: &str, db_filename: String) -> Self {
        let config = Config {
            database_url: db_url.to_string(),
            port: 0,
            max_connections: 5,
            log_dir: "./logs".to_string(),
        };

        let state = Arc::new(bootstrap_state(&config));
        let router = create_router(state.clone());

        Self {
            router,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    /// Creates an event and returns the stored record.
    pub async fn create_event(&self, payload: Value) -> Value {
        let (status, body) = self.request("POST", "/api/events", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body["data"].clone()
    }
}

#[allow(dead_code)]
pub fn event_payload(title: &str) -> Value {
    json!({
        "title": title,
        "description": "An evening of talks about systems programming.",
        "overview": "Lightning talks followed by open discussion.",
        "image": "/images/meetup.png",
        "venue": "Community Hall",
        "location": "Berlin, Germany",
        "date": "March 5, 2024",
        "time": "2:30 PM",
        "mode": "Online",
        "audience": "Developers",
        "agenda": ["Opening", "Talks", "Networking"],
        "organizer": "Rust Berlin",
        "tags": ["rust", "meetup"]
    })
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
